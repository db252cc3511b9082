use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{primitives::encode_ctx_object_id, tag::Tag, writer::Writer};
use crate::types::ObjectId;
use crate::EncodeError;

pub const SERVICE_SUBSCRIBE_COV: u8 = 0x05;

/// SubscribeCOV request.
///
/// The subscriber process ID and the lifetime are `u8` on purpose: both
/// travel as single-octet context values, and a narrower API beats a
/// silent truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscribeCovRequest {
    pub subscriber_process_id: u8,
    pub monitored_object_id: ObjectId,
    pub issue_confirmed_notifications: bool,
    pub lifetime_seconds: u8,
    pub invoke_id: u8,
}

impl SubscribeCovRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader {
            invoke_id: self.invoke_id,
            service_choice: SERVICE_SUBSCRIBE_COV,
        }
        .encode(w)?;

        Tag::Context { tag_num: 0, len: 1 }.encode(w)?;
        w.write_u8(self.subscriber_process_id)?;
        encode_ctx_object_id(w, 1, self.monitored_object_id.raw())?;
        Tag::Context { tag_num: 2, len: 1 }.encode(w)?;
        w.write_u8(u8::from(self.issue_confirmed_notifications))?;
        Tag::Context { tag_num: 3, len: 1 }.encode(w)?;
        w.write_u8(self.lifetime_seconds)
    }
}
