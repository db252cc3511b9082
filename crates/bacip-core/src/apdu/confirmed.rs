use crate::apdu::ApduType;
use crate::encoding::{
    primitives::decode_unsigned,
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::{DecodeError, EncodeError};

/// Flag octet of every confirmed request this client sends:
/// segmented-response-accepted, not segmented, no more-follows.
const CONFIRMED_REQUEST_FLAGS: u8 = 0x02;
/// max-segments 7 (high nibble), max-APDU code 5 = 1476 octets (low nibble).
const MAX_SEGMENTS_MAX_APDU: u8 = 0x75;

/// Header of an outgoing Confirmed-Request APDU.
///
/// Segmented requests are out of scope, so the header is fixed apart from
/// the invoke ID and the service choice: `0x02 0x75 <invoke-id> <service>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedRequestHeader {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl ConfirmedRequestHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(((ApduType::ConfirmedRequest as u8) << 4) | CONFIRMED_REQUEST_FLAGS)?;
        w.write_u8(MAX_SEGMENTS_MAX_APDU)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if (b0 >> 4) != ApduType::ConfirmedRequest as u8 {
            return Err(DecodeError::InvalidValue);
        }
        // Segmented requests carry sequence/window octets we do not handle.
        if (b0 & 0b0000_1000) != 0 {
            return Err(DecodeError::Unsupported);
        }
        let _max_segments_max_apdu = r.read_u8()?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

/// Header of a Complex-ACK APDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexAckHeader {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl ComplexAckHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::ComplexAck as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if (b0 >> 4) != ApduType::ComplexAck as u8 {
            return Err(DecodeError::InvalidValue);
        }
        if (b0 & 0b0000_1000) != 0 {
            return Err(DecodeError::Unsupported);
        }
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleAck {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl SimpleAck {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::SimpleAck as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if (b0 >> 4) != ApduType::SimpleAck as u8 {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

/// A BACnet-Error PDU. The error-class/error-code pair is optional on the
/// wire and appears either context-tagged, application-tagged, or wrapped
/// in an opening tag 0 depending on the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPdu {
    pub invoke_id: u8,
    pub service_choice: u8,
    pub error_class: Option<u32>,
    pub error_code: Option<u32>,
}

impl ErrorPdu {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if (b0 >> 4) != ApduType::Error as u8 {
            return Err(DecodeError::InvalidValue);
        }
        let invoke_id = r.read_u8()?;
        let service_choice = r.read_u8()?;

        let mut error_class = None;
        let mut error_code = None;
        if !r.is_empty() {
            match Tag::decode(r)? {
                Tag::Opening { tag_num: 0 } => {
                    error_class = Some(decode_error_value(r, 0)?);
                    error_code = Some(decode_error_value(r, 1)?);
                    match Tag::decode(r)? {
                        Tag::Closing { tag_num: 0 } => {}
                        _ => return Err(DecodeError::InvalidTag),
                    }
                }
                first => {
                    error_class = Some(decode_error_value_from_tag(r, first, 0)?);
                    error_code = Some(decode_error_value(r, 1)?);
                }
            }
        }

        Ok(Self {
            invoke_id,
            service_choice,
            error_class,
            error_code,
        })
    }
}

fn decode_error_value(r: &mut Reader<'_>, expected_ctx: u8) -> Result<u32, DecodeError> {
    let tag = Tag::decode(r)?;
    decode_error_value_from_tag(r, tag, expected_ctx)
}

fn decode_error_value_from_tag(
    r: &mut Reader<'_>,
    tag: Tag,
    expected_ctx: u8,
) -> Result<u32, DecodeError> {
    match tag {
        Tag::Context { tag_num, len } if tag_num == expected_ctx => decode_unsigned(r, len as usize),
        Tag::Application {
            tag: AppTag::Enumerated,
            len,
        } => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectPdu {
    pub invoke_id: u8,
    pub reason: u8,
}

impl RejectPdu {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if (b0 >> 4) != ApduType::Reject as u8 {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortPdu {
    pub server: bool,
    pub invoke_id: u8,
    pub reason: u8,
}

impl AbortPdu {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if (b0 >> 4) != ApduType::Abort as u8 {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            server: (b0 & 0x01) != 0,
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}
