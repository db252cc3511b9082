use crate::encoding::{
    primitives::{decode_unsigned, encode_unsigned, unsigned_len},
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::{status_flags::STATUS_FLAGS_UNUSED_BITS, DataValue, ObjectId, StatusFlags};
use crate::{DecodeError, EncodeError};

pub fn encode_application_value(
    w: &mut Writer<'_>,
    value: &DataValue<'_>,
) -> Result<(), EncodeError> {
    match value {
        DataValue::Null => Tag::Application {
            tag: AppTag::Null,
            len: 0,
        }
        .encode(w),
        DataValue::Boolean(v) => Tag::Application {
            tag: AppTag::Boolean,
            // The LVT field carries the value; booleans have no data octets.
            len: u32::from(*v),
        }
        .encode(w),
        DataValue::Unsigned(v) => {
            Tag::Application {
                tag: AppTag::Unsigned,
                len: unsigned_len(*v) as u32,
            }
            .encode(w)?;
            encode_unsigned(w, *v)?;
            Ok(())
        }
        DataValue::Real(v) => {
            Tag::Application {
                tag: AppTag::Real,
                len: 4,
            }
            .encode(w)?;
            w.write_u32(v.to_bits())
        }
        DataValue::CharacterString(v) => {
            let bytes = v.as_bytes();
            let len = bytes
                .len()
                .checked_add(1)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(EncodeError::InvalidLength)?;
            Tag::Application {
                tag: AppTag::CharacterString,
                len,
            }
            .encode(w)?;
            // Character set 0 (ANSI X3.4 / UTF-8).
            w.write_u8(0)?;
            w.write_bytes(bytes)
        }
        DataValue::StatusFlags(v) => {
            Tag::Application {
                tag: AppTag::BitString,
                len: 2,
            }
            .encode(w)?;
            w.write_u8(STATUS_FLAGS_UNUSED_BITS)?;
            w.write_u8(v.to_octet())
        }
        DataValue::Enumerated(v) => {
            Tag::Application {
                tag: AppTag::Enumerated,
                len: unsigned_len(*v) as u32,
            }
            .encode(w)?;
            encode_unsigned(w, *v)?;
            Ok(())
        }
        DataValue::ObjectId(v) => {
            Tag::Application {
                tag: AppTag::ObjectId,
                len: 4,
            }
            .encode(w)?;
            w.write_u32(v.raw())
        }
        DataValue::Opaque(_) => Err(EncodeError::ValueOutOfRange),
        #[cfg(feature = "alloc")]
        DataValue::List(_) => Err(EncodeError::ValueOutOfRange),
    }
}

/// Decodes one application-tagged value, tag octet included.
///
/// The decoder owns its tag octet rather than going through [`Tag`]: the
/// Status_Flags shape is fixed at one unused-bit octet plus one flag
/// octet, and field devices disagree on what they put in the length field,
/// so for bit strings the length is never consulted.
pub fn decode_application_value<'a>(r: &mut Reader<'a>) -> Result<DataValue<'a>, DecodeError> {
    let octet = r.read_u8()?;
    if (octet & 0x08) != 0 {
        // Context-specific where an application value was expected.
        return Err(DecodeError::InvalidTag);
    }
    let tag_number = octet >> 4;
    if tag_number == 0x0F {
        return Err(DecodeError::InvalidTag);
    }

    if tag_number == AppTag::BitString.number() {
        let unused = r.read_u8()?;
        if unused != STATUS_FLAGS_UNUSED_BITS {
            return Err(DecodeError::InvalidValue);
        }
        return Ok(DataValue::StatusFlags(StatusFlags::from_octet(r.read_u8()?)));
    }

    let lvt = octet & 0x07;
    let len = match lvt {
        0..=4 => usize::from(lvt),
        5 => {
            let ext = r.read_u8()?;
            if ext > 253 {
                return Err(DecodeError::InvalidLength);
            }
            usize::from(ext)
        }
        _ => return Err(DecodeError::InvalidLength),
    };

    match AppTag::from_number(tag_number) {
        AppTag::Null => Ok(DataValue::Null),
        AppTag::Boolean => Ok(DataValue::Boolean(lvt != 0)),
        AppTag::Unsigned => Ok(DataValue::Unsigned(decode_unsigned(r, len)?)),
        AppTag::Real => {
            if len != 4 {
                return Err(DecodeError::InvalidLength);
            }
            Ok(DataValue::Real(f32::from_bits(r.read_u32()?)))
        }
        AppTag::CharacterString => {
            if len == 0 {
                return Err(DecodeError::InvalidLength);
            }
            let raw = r.read_slice(len)?;
            // The leading character-set octet is consumed and discarded;
            // the payload is treated as UTF-8 either way.
            let s = core::str::from_utf8(&raw[1..]).map_err(|_| DecodeError::InvalidValue)?;
            Ok(DataValue::CharacterString(s))
        }
        AppTag::Enumerated => Ok(DataValue::Enumerated(decode_unsigned(r, len)?)),
        AppTag::ObjectId => {
            if len != 4 {
                return Err(DecodeError::InvalidLength);
            }
            Ok(DataValue::ObjectId(ObjectId::from_raw(r.read_u32()?)))
        }
        // Bit strings were consumed before length resolution.
        AppTag::BitString => Err(DecodeError::InvalidTag),
        AppTag::Other(_) => Ok(DataValue::Opaque(r.read_slice(len)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_application_value, encode_application_value};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{DataValue, ObjectId, ObjectType, StatusFlags};
    use crate::DecodeError;
    use proptest::prelude::*;

    fn roundtrip(value: &DataValue<'_>) -> DataValue<'static> {
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        encode_application_value(&mut w, value).unwrap();
        let mut r = Reader::new(w.written());
        let got = decode_application_value(&mut r).unwrap();
        assert!(r.is_empty());
        owned(got)
    }

    // Detach the borrowed variants so the scratch buffer can go out of scope.
    fn owned(value: DataValue<'_>) -> DataValue<'static> {
        match value {
            DataValue::CharacterString(s) => {
                DataValue::CharacterString(Box::leak(s.to_owned().into_boxed_str()))
            }
            DataValue::Opaque(b) => DataValue::Opaque(Box::leak(b.to_vec().into_boxed_slice())),
            DataValue::Null => DataValue::Null,
            DataValue::Boolean(v) => DataValue::Boolean(v),
            DataValue::Unsigned(v) => DataValue::Unsigned(v),
            DataValue::Real(v) => DataValue::Real(v),
            DataValue::StatusFlags(v) => DataValue::StatusFlags(v),
            DataValue::Enumerated(v) => DataValue::Enumerated(v),
            DataValue::ObjectId(v) => DataValue::ObjectId(v),
            DataValue::List(vs) => DataValue::List(vs.into_iter().map(owned).collect()),
        }
    }

    #[test]
    fn supported_variants_roundtrip() {
        let values = [
            DataValue::Null,
            DataValue::Boolean(true),
            DataValue::Boolean(false),
            DataValue::Unsigned(1476),
            DataValue::Real(21.5),
            DataValue::CharacterString("Zone 4 temp"),
            DataValue::Enumerated(3),
            DataValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 7)),
        ];
        for v in &values {
            assert_eq!(&roundtrip(v), v);
        }
    }

    #[test]
    fn every_status_flags_combination_roundtrips() {
        for octet in 0..16u8 {
            let v = DataValue::StatusFlags(StatusFlags::from_octet(octet));
            assert_eq!(roundtrip(&v), v);
        }
    }

    #[test]
    fn status_flags_fixture() {
        // 0x8A low nibble: in-alarm and overridden set. The length form in
        // the tag octet does not matter for bit strings.
        for fixture in [&[0x85u8, 0x04, 0x8A][..], &[0x82, 0x04, 0x8A][..]] {
            let mut r = Reader::new(fixture);
            let got = decode_application_value(&mut r).unwrap();
            assert_eq!(
                got,
                DataValue::StatusFlags(StatusFlags {
                    in_alarm: true,
                    fault: false,
                    overridden: true,
                    out_of_service: false,
                })
            );
        }
    }

    #[test]
    fn status_flags_rejects_other_unused_bit_counts() {
        for unused in [0u8, 1, 2, 3, 5, 6, 7] {
            let buf = [0x82, unused, 0x0F];
            let mut r = Reader::new(&buf);
            assert_eq!(
                decode_application_value(&mut r).unwrap_err(),
                DecodeError::InvalidValue
            );
        }
    }

    #[test]
    fn character_string_of_only_the_charset_octet_is_empty() {
        let mut r = Reader::new(&[0x71, 0x00]);
        assert_eq!(
            decode_application_value(&mut r).unwrap(),
            DataValue::CharacterString("")
        );
    }

    #[test]
    fn nonzero_charset_octet_is_discarded() {
        let mut r = Reader::new(&[0x73, 0x04, b'o', b'k']);
        assert_eq!(
            decode_application_value(&mut r).unwrap(),
            DataValue::CharacterString("ok")
        );
    }

    #[test]
    fn unknown_tags_decode_as_opaque() {
        // Application tag 10 (Date), four payload octets.
        let mut r = Reader::new(&[0xA4, 124, 2, 3, 6]);
        assert_eq!(
            decode_application_value(&mut r).unwrap(),
            DataValue::Opaque(&[124, 2, 3, 6])
        );
    }

    #[test]
    fn context_tags_are_not_application_values() {
        let mut r = Reader::new(&[0x09, 0x01]);
        assert_eq!(
            decode_application_value(&mut r).unwrap_err(),
            DecodeError::InvalidTag
        );
    }

    proptest! {
        #[test]
        fn unsigned_values_roundtrip(v in any::<u32>()) {
            let value = DataValue::Unsigned(v);
            prop_assert_eq!(roundtrip(&value), value);
        }

        #[test]
        fn object_ids_roundtrip(raw in any::<u32>()) {
            let value = DataValue::ObjectId(ObjectId::from_raw(raw));
            prop_assert_eq!(roundtrip(&value), value);
        }
    }
}
