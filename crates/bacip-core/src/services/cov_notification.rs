#[cfg(feature = "alloc")]
use crate::apdu::UnconfirmedRequestHeader;
#[cfg(feature = "alloc")]
use crate::encoding::{
    primitives::{
        decode_ctx_unsigned, decode_unsigned, encode_ctx_object_id, encode_ctx_unsigned,
        expect_opening,
    },
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
#[cfg(feature = "alloc")]
use crate::services::read_property_multiple::decode_bracketed_values;
#[cfg(feature = "alloc")]
use crate::services::value_codec::encode_application_value;
#[cfg(feature = "alloc")]
use crate::types::{DataValue, ObjectId, PropertyId, PropertyValue};
#[cfg(feature = "alloc")]
use crate::{DecodeError, EncodeError};
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

pub const SERVICE_COV_NOTIFICATION: u8 = 0x01;
pub const SERVICE_EVENT_NOTIFICATION: u8 = 0x02;

/// Which unconfirmed service delivered a notification.
///
/// The deployed devices interleave COV-Notification (0x01) and
/// Event-Notification (0x02) bodies of the same shape; the decoder accepts
/// both and records which one arrived rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotificationKind {
    Cov,
    Event,
}

impl NotificationKind {
    pub const fn from_service_choice(service_choice: u8) -> Option<Self> {
        match service_choice {
            SERVICE_COV_NOTIFICATION => Some(Self::Cov),
            SERVICE_EVENT_NOTIFICATION => Some(Self::Event),
            _ => None,
        }
    }

    pub const fn service_choice(self) -> u8 {
        match self {
            Self::Cov => SERVICE_COV_NOTIFICATION,
            Self::Event => SERVICE_EVENT_NOTIFICATION,
        }
    }
}

/// An unconfirmed COV (or event) notification body.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct CovNotification<'a> {
    pub kind: NotificationKind,
    pub subscriber_process_id: u32,
    pub initiating_device_id: ObjectId,
    pub monitored_object_id: ObjectId,
    pub time_remaining_seconds: u32,
    pub values: Vec<PropertyValue<'a>>,
}

#[cfg(feature = "alloc")]
impl<'a> CovNotification<'a> {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader {
            service_choice: self.kind.service_choice(),
        }
        .encode(w)?;

        encode_ctx_unsigned(w, 0, self.subscriber_process_id)?;
        encode_ctx_object_id(w, 1, self.initiating_device_id.raw())?;
        encode_ctx_object_id(w, 2, self.monitored_object_id.raw())?;
        encode_ctx_unsigned(w, 3, self.time_remaining_seconds)?;

        Tag::Opening { tag_num: 4 }.encode(w)?;
        for property in &self.values {
            let number = property.property_id.to_u32();
            if number > u32::from(u8::MAX) {
                return Err(EncodeError::ValueOutOfRange);
            }
            Tag::Context { tag_num: 0, len: 1 }.encode(w)?;
            w.write_u8(number as u8)?;
            Tag::Opening { tag_num: 2 }.encode(w)?;
            encode_application_value(w, &property.value)?;
            Tag::Closing { tag_num: 2 }.encode(w)?;
        }
        Tag::Closing { tag_num: 4 }.encode(w)
    }

    /// Decodes the body following an Unconfirmed-Request header whose
    /// service choice was already mapped to `kind`.
    pub fn decode_after_header(
        r: &mut Reader<'a>,
        kind: NotificationKind,
    ) -> Result<Self, DecodeError> {
        let subscriber_process_id = decode_ctx_unsigned(r, 0)?;
        let initiating_device_id = ObjectId::from_raw(decode_ctx_unsigned(r, 1)?);
        let monitored_object_id = ObjectId::from_raw(decode_ctx_unsigned(r, 2)?);
        let time_remaining_seconds = decode_ctx_unsigned(r, 3)?;

        expect_opening(r, 4)?;
        let mut values = Vec::new();
        loop {
            let tag = Tag::decode(r)?;
            if tag == (Tag::Closing { tag_num: 4 }) {
                break;
            }

            let property_id = match tag {
                Tag::Context { tag_num: 0, len } => {
                    PropertyId::from_u32(decode_unsigned(r, len as usize)?)
                }
                _ => return Err(DecodeError::InvalidTag),
            };
            expect_opening(r, 2)?;
            let value = decode_bracketed_values(r, 2)?;
            if matches!(value, DataValue::List(ref items) if items.is_empty()) {
                return Err(DecodeError::InvalidValue);
            }
            values.push(PropertyValue { property_id, value });
        }

        Ok(Self {
            kind,
            subscriber_process_id,
            initiating_device_id,
            monitored_object_id,
            time_remaining_seconds,
            values,
        })
    }
}
