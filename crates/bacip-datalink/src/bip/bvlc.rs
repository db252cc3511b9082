use bacip_core::encoding::{reader::Reader, writer::Writer};
use bacip_core::{DecodeError, EncodeError};

/// BVLC type octet identifying BACnet/IP.
pub const BVLC_TYPE_BACNET_IP: u8 = 0x81;

/// BVLC functions. This client emits and accepts only the two original-NPDU
/// forms; anything else on the wire is surfaced as `Unknown` and rejected
/// by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvlcFunction {
    OriginalUnicastNpdu,
    OriginalBroadcastNpdu,
    Unknown(u8),
}

impl BvlcFunction {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x0A => Self::OriginalUnicastNpdu,
            0x0B => Self::OriginalBroadcastNpdu,
            v => Self::Unknown(v),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::OriginalUnicastNpdu => 0x0A,
            Self::OriginalBroadcastNpdu => 0x0B,
            Self::Unknown(v) => v,
        }
    }
}

/// The 4-octet BVLC header: type, function, and the total datagram length
/// including the header itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvlcHeader {
    pub function: BvlcFunction,
    pub length: u16,
}

impl BvlcHeader {
    pub const LEN: usize = 4;

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(BVLC_TYPE_BACNET_IP)?;
        w.write_u8(self.function.to_u8())?;
        w.write_u16(self.length)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? != BVLC_TYPE_BACNET_IP {
            return Err(DecodeError::InvalidValue);
        }
        let function = BvlcFunction::from_u8(r.read_u8()?);
        let length = r.read_u16()?;
        if (length as usize) < Self::LEN {
            return Err(DecodeError::InvalidLength);
        }
        Ok(Self { function, length })
    }
}

#[cfg(test)]
mod tests {
    use super::{BvlcFunction, BvlcHeader, BVLC_TYPE_BACNET_IP};
    use bacip_core::encoding::{reader::Reader, writer::Writer};
    use bacip_core::DecodeError;

    #[test]
    fn broadcast_who_is_header_bytes() {
        let header = BvlcHeader {
            function: BvlcFunction::OriginalBroadcastNpdu,
            length: 8,
        };
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        header.encode(&mut w).unwrap();
        assert_eq!(w.written(), &[0x81, 0x0B, 0x00, 0x08]);
    }

    #[test]
    fn header_roundtrip() {
        let header = BvlcHeader {
            function: BvlcFunction::OriginalUnicastNpdu,
            length: 21,
        };
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        header.encode(&mut w).unwrap();
        let mut r = Reader::new(w.written());
        assert_eq!(BvlcHeader::decode(&mut r).unwrap(), header);
    }

    #[test]
    fn foreign_functions_decode_as_unknown() {
        let mut r = Reader::new(&[BVLC_TYPE_BACNET_IP, 0x04, 0x00, 0x0A]);
        let header = BvlcHeader::decode(&mut r).unwrap();
        assert_eq!(header.function, BvlcFunction::Unknown(0x04));
    }

    #[test]
    fn rejects_non_bacnet_ip_type() {
        let mut r = Reader::new(&[0x82, 0x0A, 0x00, 0x04]);
        assert_eq!(
            BvlcHeader::decode(&mut r).unwrap_err(),
            DecodeError::InvalidValue
        );
    }

    #[test]
    fn rejects_length_shorter_than_the_header() {
        let mut r = Reader::new(&[0x81, 0x0A, 0x00, 0x03]);
        assert_eq!(
            BvlcHeader::decode(&mut r).unwrap_err(),
            DecodeError::InvalidLength
        );
    }
}
