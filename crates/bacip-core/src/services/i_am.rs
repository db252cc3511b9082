use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    primitives::encode_app_object_id,
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError};

pub const SERVICE_I_AM: u8 = 0x00;

/// I-Am announcement.
///
/// The decoder is deliberately strict: the four fields arrive in fixed
/// order with fixed tag octets (object identifier `C4`, max-APDU `22`,
/// segmentation `91`, vendor `22`), and any deviation is a parse failure
/// rather than a best-effort guess. Discovery relies on that strictness to
/// drop unrelated broadcast traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IAmRequest {
    pub device_id: ObjectId,
    pub max_apdu: u16,
    pub segmentation: u8,
    pub vendor_id: u16,
}

impl IAmRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader {
            service_choice: SERVICE_I_AM,
        }
        .encode(w)?;

        encode_app_object_id(w, self.device_id.raw())?;
        Tag::Application {
            tag: AppTag::Unsigned,
            len: 2,
        }
        .encode(w)?;
        w.write_u16(self.max_apdu)?;
        Tag::Application {
            tag: AppTag::Enumerated,
            len: 1,
        }
        .encode(w)?;
        w.write_u8(self.segmentation)?;
        Tag::Application {
            tag: AppTag::Unsigned,
            len: 2,
        }
        .encode(w)?;
        w.write_u16(self.vendor_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_tag(r, AppTag::ObjectId, 4)?;
        let device_id = ObjectId::from_raw(r.read_u32()?);
        expect_tag(r, AppTag::Unsigned, 2)?;
        let max_apdu = r.read_u16()?;
        expect_tag(r, AppTag::Enumerated, 1)?;
        let segmentation = r.read_u8()?;
        expect_tag(r, AppTag::Unsigned, 2)?;
        let vendor_id = r.read_u16()?;

        Ok(Self {
            device_id,
            max_apdu,
            segmentation,
            vendor_id,
        })
    }
}

fn expect_tag(r: &mut Reader<'_>, tag: AppTag, len: u32) -> Result<(), DecodeError> {
    match Tag::decode(r)? {
        Tag::Application { tag: t, len: l } if t == tag && l == len => Ok(()),
        _ => Err(DecodeError::InvalidTag),
    }
}
