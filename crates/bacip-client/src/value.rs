use bacip_core::types::{DataValue, ObjectId, PropertyId, StatusFlags};

/// Owned mirror of [`DataValue`], detached from the receive buffer.
///
/// Consumers pattern-match on the variant they expect; anything the codec
/// does not model arrives as [`Opaque`](Self::Opaque) with the raw payload
/// octets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Real(f32),
    CharacterString(String),
    StatusFlags(StatusFlags),
    Enumerated(u32),
    ObjectId(ObjectId),
    Opaque(Vec<u8>),
    List(Vec<Value>),
}

impl From<DataValue<'_>> for Value {
    fn from(value: DataValue<'_>) -> Self {
        match value {
            DataValue::Null => Self::Null,
            DataValue::Boolean(v) => Self::Boolean(v),
            DataValue::Unsigned(v) => Self::Unsigned(v),
            DataValue::Real(v) => Self::Real(v),
            DataValue::CharacterString(v) => Self::CharacterString(v.to_owned()),
            DataValue::StatusFlags(v) => Self::StatusFlags(v),
            DataValue::Enumerated(v) => Self::Enumerated(v),
            DataValue::ObjectId(v) => Self::ObjectId(v),
            DataValue::Opaque(v) => Self::Opaque(v.to_vec()),
            DataValue::List(vs) => Self::List(vs.into_iter().map(Self::from).collect()),
        }
    }
}

/// One `(property, value)` record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyValue {
    pub property_id: PropertyId,
    pub value: Value,
}

impl From<bacip_core::types::PropertyValue<'_>> for PropertyValue {
    fn from(value: bacip_core::types::PropertyValue<'_>) -> Self {
        Self {
            property_id: value.property_id,
            value: value.value.into(),
        }
    }
}
