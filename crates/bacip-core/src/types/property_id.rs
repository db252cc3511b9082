/// BACnet property identifiers.
///
/// Named variants are the properties the client operations touch; anything
/// else round-trips through [`Proprietary`](Self::Proprietary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyId {
    /// The `ALL` property reference used by ReadPropertyMultiple.
    All,
    Description,
    ObjectIdentifier,
    ObjectList,
    ObjectName,
    ObjectType,
    PresentValue,
    StatusFlags,
    Units,
    VendorName,
    Proprietary(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::All => 8,
            Self::Description => 28,
            Self::ObjectIdentifier => 75,
            Self::ObjectList => 76,
            Self::ObjectName => 77,
            Self::ObjectType => 79,
            Self::PresentValue => 85,
            Self::StatusFlags => 111,
            Self::Units => 117,
            Self::VendorName => 121,
            Self::Proprietary(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            8 => Self::All,
            28 => Self::Description,
            75 => Self::ObjectIdentifier,
            76 => Self::ObjectList,
            77 => Self::ObjectName,
            79 => Self::ObjectType,
            85 => Self::PresentValue,
            111 => Self::StatusFlags,
            117 => Self::Units,
            121 => Self::VendorName,
            v => Self::Proprietary(v),
        }
    }
}
