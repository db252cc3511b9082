use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::encode_ctx_object_id,
    tag::Tag,
    writer::Writer,
};
use crate::types::{ObjectId, PropertyId};
use crate::EncodeError;

#[cfg(feature = "alloc")]
use crate::encoding::{
    primitives::{decode_unsigned, expect_opening},
    reader::Reader,
};
#[cfg(feature = "alloc")]
use crate::services::value_codec::decode_application_value;
#[cfg(feature = "alloc")]
use crate::types::{DataValue, PropertyValue};
#[cfg(feature = "alloc")]
use crate::DecodeError;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

pub const SERVICE_READ_PROPERTY_MULTIPLE: u8 = 0x0E;

/// One read-access-specification: an object and its requested properties.
///
/// Property references are emitted as single-octet context-0 values inside
/// opening/closing tag 1, the way the target devices expect them; property
/// numbers above 255 cannot be requested through this form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadAccessSpec<'a> {
    pub object_id: ObjectId,
    pub properties: &'a [PropertyId],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPropertyMultipleRequest<'a> {
    pub specs: &'a [ReadAccessSpec<'a>],
    pub invoke_id: u8,
}

impl ReadPropertyMultipleRequest<'_> {
    /// The all-properties form for a single object.
    pub const fn all_properties(object_id: ObjectId) -> ReadAccessSpec<'static> {
        ReadAccessSpec {
            object_id,
            properties: &[PropertyId::All],
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader {
            invoke_id: self.invoke_id,
            service_choice: SERVICE_READ_PROPERTY_MULTIPLE,
        }
        .encode(w)?;

        for spec in self.specs {
            encode_ctx_object_id(w, 0, spec.object_id.raw())?;
            Tag::Opening { tag_num: 1 }.encode(w)?;
            for property in spec.properties {
                let number = property.to_u32();
                if number > u32::from(u8::MAX) {
                    return Err(EncodeError::ValueOutOfRange);
                }
                Tag::Context { tag_num: 0, len: 1 }.encode(w)?;
                w.write_u8(number as u8)?;
            }
            Tag::Closing { tag_num: 1 }.encode(w)?;
        }
        Ok(())
    }
}

/// The decoded properties of one object in a ReadPropertyMultiple ACK.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadAccessResult<'a> {
    pub object_id: ObjectId,
    pub properties: Vec<PropertyValue<'a>>,
}

#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropertyMultipleAck<'a> {
    pub results: Vec<ReadAccessResult<'a>>,
}

#[cfg(feature = "alloc")]
impl<'a> ReadPropertyMultipleAck<'a> {
    pub fn decode_after_header(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let mut results = Vec::new();

        while !r.is_empty() {
            let object_id = match Tag::decode(r)? {
                Tag::Context { tag_num: 0, len } => {
                    ObjectId::from_raw(decode_unsigned(r, len as usize)?)
                }
                _ => return Err(DecodeError::InvalidTag),
            };
            expect_opening(r, 1)?;

            let mut properties = Vec::new();
            loop {
                let tag = Tag::decode(r)?;
                if tag == (Tag::Closing { tag_num: 1 }) {
                    break;
                }

                let property_id = match tag {
                    Tag::Context { tag_num: 2, len } => {
                        PropertyId::from_u32(decode_unsigned(r, len as usize)?)
                    }
                    _ => return Err(DecodeError::InvalidTag),
                };

                expect_opening(r, 4)?;
                let value = decode_bracketed_values(r, 4)?;
                properties.push(PropertyValue { property_id, value });
            }

            results.push(ReadAccessResult {
                object_id,
                properties,
            });
        }

        Ok(Self { results })
    }
}

/// Decodes application values up to the closing tag. One value comes back
/// as itself; two or more collapse into [`DataValue::List`].
///
/// Scans by peeking the next octet: a closing tag octet has the context
/// class bit set, so it can never be confused with the first octet of an
/// application value.
#[cfg(feature = "alloc")]
pub(crate) fn decode_bracketed_values<'a>(
    r: &mut Reader<'a>,
    closing_tag_num: u8,
) -> Result<DataValue<'a>, DecodeError> {
    let closing_octet = (closing_tag_num << 4) | 0x08 | 0x07;
    let mut values = Vec::new();
    loop {
        if r.peek_u8()? == closing_octet {
            let _ = r.read_u8()?;
            break;
        }
        values.push(decode_application_value(r)?);
    }

    Ok(match values.len() {
        1 => values.pop().unwrap_or(DataValue::Null),
        _ => DataValue::List(values),
    })
}
