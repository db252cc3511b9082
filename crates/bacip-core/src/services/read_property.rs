use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{encode_ctx_object_id, encode_ctx_unsigned},
    writer::Writer,
};
use crate::types::{ObjectId, PropertyId};
use crate::EncodeError;

#[cfg(feature = "alloc")]
use crate::encoding::{
    primitives::{decode_unsigned, expect_opening},
    reader::Reader,
    tag::{AppTag, Tag},
};
#[cfg(feature = "alloc")]
use crate::DecodeError;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

pub const SERVICE_READ_PROPERTY: u8 = 0x0C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub invoke_id: u8,
}

impl ReadPropertyRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader {
            invoke_id: self.invoke_id,
            service_choice: SERVICE_READ_PROPERTY,
        }
        .encode(w)?;

        encode_ctx_object_id(w, 0, self.object_id.raw())?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())
    }
}

/// ReadProperty ACK for an array-valued property such as `object-list`:
/// context-0 object identifier, context-1 property identifier, then the
/// identifiers bracketed by opening/closing tag 3.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectListAck {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub objects: Vec<ObjectId>,
}

#[cfg(feature = "alloc")]
impl ObjectListAck {
    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let object_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 0, len } => {
                ObjectId::from_raw(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        let property_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 1, len } => {
                PropertyId::from_u32(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        expect_opening(r, 3)?;

        let mut objects = Vec::new();
        loop {
            match Tag::decode(r)? {
                Tag::Closing { tag_num: 3 } => break,
                Tag::Application {
                    tag: AppTag::ObjectId,
                    len: 4,
                } => objects.push(ObjectId::from_raw(r.read_u32()?)),
                _ => return Err(DecodeError::InvalidTag),
            }
        }

        Ok(Self {
            object_id,
            property_id,
            objects,
        })
    }
}
