use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// BACnet network layer protocol version (always `0x01`).
pub const NPDU_VERSION: u8 = 0x01;

/// Control byte for unconfirmed requests and broadcasts.
pub const CONTROL_NORMAL: u8 = 0x00;
/// Control byte for confirmed requests ("expecting reply").
pub const CONTROL_EXPECTING_REPLY: u8 = 0x04;

const CONTROL_NETWORK_MESSAGE: u8 = 0x80;
const CONTROL_HAS_DESTINATION: u8 = 0x20;
const CONTROL_HAS_SOURCE: u8 = 0x08;

/// The two-octet NPDU this client emits: version 1 plus a control byte.
///
/// Encoding never produces destination or source specifiers. Decoding
/// tolerates routed packets by parsing the control byte and skipping the
/// DNET/SNET address blocks and hop count, so an APDU that arrives through
/// a router is still found at the right offset. Network-layer messages are
/// not application traffic and are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Npdu {
    pub control: u8,
}

impl Npdu {
    pub const fn new(control: u8) -> Self {
        Self { control }
    }

    pub const fn expecting_reply() -> Self {
        Self::new(CONTROL_EXPECTING_REPLY)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(NPDU_VERSION)?;
        w.write_u8(self.control)
    }

    /// Decodes the header and leaves the reader positioned at the APDU.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? != NPDU_VERSION {
            return Err(DecodeError::InvalidValue);
        }
        let control = r.read_u8()?;
        if (control & CONTROL_NETWORK_MESSAGE) != 0 {
            return Err(DecodeError::Unsupported);
        }

        let has_destination = (control & CONTROL_HAS_DESTINATION) != 0;
        if has_destination {
            skip_address(r)?;
        }
        if (control & CONTROL_HAS_SOURCE) != 0 {
            skip_address(r)?;
        }
        if has_destination {
            let _hop_count = r.read_u8()?;
        }

        Ok(Self { control })
    }
}

fn skip_address(r: &mut Reader<'_>) -> Result<(), DecodeError> {
    let _network = r.read_u16()?;
    let mac_len = r.read_u8()?;
    if mac_len > 6 {
        return Err(DecodeError::InvalidLength);
    }
    r.read_slice(usize::from(mac_len))?;
    Ok(())
}
