/// APDU type, carried in the high nibble of the first APDU octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ApduType {
    ConfirmedRequest = 0x0,
    UnconfirmedRequest = 0x1,
    SimpleAck = 0x2,
    ComplexAck = 0x3,
    Error = 0x5,
    Reject = 0x6,
    Abort = 0x7,
}

impl ApduType {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x0 => Some(Self::ConfirmedRequest),
            0x1 => Some(Self::UnconfirmedRequest),
            0x2 => Some(Self::SimpleAck),
            0x3 => Some(Self::ComplexAck),
            0x5 => Some(Self::Error),
            0x6 => Some(Self::Reject),
            0x7 => Some(Self::Abort),
            _ => None,
        }
    }

    /// The type nibble of `first_octet`.
    pub const fn of_octet(first_octet: u8) -> Option<Self> {
        Self::from_u8(first_octet >> 4)
    }
}
