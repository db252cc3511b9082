use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Application tag numbers.
///
/// Only the tags a BACnet/IP client actually exchanges are named; anything
/// else decodes as [`Other`](Self::Other) and its payload surfaces as an
/// opaque value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppTag {
    Null,
    Boolean,
    Unsigned,
    Real,
    CharacterString,
    BitString,
    Enumerated,
    ObjectId,
    Other(u8),
}

impl AppTag {
    pub const fn from_number(number: u8) -> Self {
        match number {
            0 => Self::Null,
            1 => Self::Boolean,
            2 => Self::Unsigned,
            4 => Self::Real,
            7 => Self::CharacterString,
            8 => Self::BitString,
            9 => Self::Enumerated,
            12 => Self::ObjectId,
            n => Self::Other(n),
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean => 1,
            Self::Unsigned => 2,
            Self::Real => 4,
            Self::CharacterString => 7,
            Self::BitString => 8,
            Self::Enumerated => 9,
            Self::ObjectId => 12,
            Self::Other(n) => n,
        }
    }
}

/// A decoded tag octet.
///
/// Bit 3 of the octet selects the class (application vs context-specific);
/// the low three bits carry either a direct length (0..=4), the one-octet
/// extended-length escape (5), or the opening/closing markers (6/7). The
/// extended tag-number escape (high nibble 15) and the multi-octet length
/// escapes (254/255) never occur in this profile and are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Application { tag: AppTag, len: u32 },
    Context { tag_num: u8, len: u32 },
    Opening { tag_num: u8 },
    Closing { tag_num: u8 },
}

const CLASS_CONTEXT: u8 = 0b0000_1000;
const LVT_EXTENDED: u8 = 5;
const LVT_OPENING: u8 = 6;
const LVT_CLOSING: u8 = 7;
const MAX_EXTENDED_LEN: u8 = 253;

impl Tag {
    pub fn encode(self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Tag::Application { tag, len } => encode_value_tag(w, tag.number(), 0, len),
            Tag::Context { tag_num, len } => encode_value_tag(w, tag_num, CLASS_CONTEXT, len),
            Tag::Opening { tag_num } => encode_marker(w, tag_num, LVT_OPENING),
            Tag::Closing { tag_num } => encode_marker(w, tag_num, LVT_CLOSING),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let octet = r.read_u8()?;
        let tag_num = octet >> 4;
        if tag_num == 0x0F {
            return Err(DecodeError::InvalidTag);
        }

        let is_context = (octet & CLASS_CONTEXT) != 0;
        let lvt = octet & 0x07;

        if is_context && lvt == LVT_OPENING {
            return Ok(Tag::Opening { tag_num });
        }
        if is_context && lvt == LVT_CLOSING {
            return Ok(Tag::Closing { tag_num });
        }

        let len = match lvt {
            0..=4 => u32::from(lvt),
            LVT_EXTENDED => {
                let ext = r.read_u8()?;
                if ext > MAX_EXTENDED_LEN {
                    return Err(DecodeError::InvalidLength);
                }
                u32::from(ext)
            }
            _ => return Err(DecodeError::InvalidLength),
        };

        if is_context {
            Ok(Tag::Context { tag_num, len })
        } else {
            Ok(Tag::Application {
                tag: AppTag::from_number(tag_num),
                len,
            })
        }
    }
}

fn encode_value_tag(w: &mut Writer<'_>, tag_num: u8, class: u8, len: u32) -> Result<(), EncodeError> {
    if tag_num > 14 {
        return Err(EncodeError::ValueOutOfRange);
    }
    if len > u32::from(MAX_EXTENDED_LEN) {
        return Err(EncodeError::InvalidLength);
    }

    if len <= 4 {
        w.write_u8((tag_num << 4) | class | len as u8)
    } else {
        w.write_u8((tag_num << 4) | class | LVT_EXTENDED)?;
        w.write_u8(len as u8)
    }
}

fn encode_marker(w: &mut Writer<'_>, tag_num: u8, lvt: u8) -> Result<(), EncodeError> {
    if tag_num > 14 {
        return Err(EncodeError::ValueOutOfRange);
    }
    w.write_u8((tag_num << 4) | CLASS_CONTEXT | lvt)
}

#[cfg(test)]
mod tests {
    use super::{AppTag, Tag};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::DecodeError;

    fn roundtrip(tag: Tag) -> Tag {
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        tag.encode(&mut w).unwrap();
        let mut r = Reader::new(w.written());
        Tag::decode(&mut r).unwrap()
    }

    #[test]
    fn application_tag_roundtrip() {
        let tag = Tag::Application {
            tag: AppTag::Unsigned,
            len: 3,
        };
        assert_eq!(roundtrip(tag), tag);
    }

    #[test]
    fn extended_length_roundtrip() {
        let tag = Tag::Context {
            tag_num: 2,
            len: 200,
        };
        assert_eq!(roundtrip(tag), tag);
    }

    #[test]
    fn structural_markers_have_fixed_octets() {
        let mut buf = [0u8; 2];
        let mut w = Writer::new(&mut buf);
        Tag::Opening { tag_num: 1 }.encode(&mut w).unwrap();
        Tag::Closing { tag_num: 4 }.encode(&mut w).unwrap();
        assert_eq!(w.written(), &[0x1E, 0x4F]);
    }

    #[test]
    fn context_tag_octets_match_the_wire() {
        for (octet, tag_num, len) in [(0x09u8, 0u8, 1u32), (0x39, 3, 1), (0x2C, 2, 4)] {
            let buf = [octet, 0, 0, 0, 0];
            let mut r = Reader::new(&buf);
            assert_eq!(Tag::decode(&mut r).unwrap(), Tag::Context { tag_num, len });
        }
    }

    #[test]
    fn rejects_extended_tag_number_escape() {
        let mut r = Reader::new(&[0xF4, 0x10]);
        assert_eq!(Tag::decode(&mut r).unwrap_err(), DecodeError::InvalidTag);
    }

    #[test]
    fn rejects_multi_octet_length_escape() {
        let mut r = Reader::new(&[0x25, 254, 1, 0]);
        assert_eq!(Tag::decode(&mut r).unwrap_err(), DecodeError::InvalidLength);
    }
}
