use crate::encoding::{
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::{DecodeError, EncodeError};

/// Encodes `value` big-endian using the fewest octets (1..=4) and returns
/// the octet count.
pub fn encode_unsigned(w: &mut Writer<'_>, value: u32) -> Result<usize, EncodeError> {
    let len = unsigned_len(value);
    for i in (0..len).rev() {
        w.write_u8(((value >> (i * 8)) & 0xFF) as u8)?;
    }
    Ok(len)
}

pub const fn unsigned_len(value: u32) -> usize {
    if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else if value <= 0xFF_FFFF {
        3
    } else {
        4
    }
}

pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u32, DecodeError> {
    if len == 0 || len > 4 {
        return Err(DecodeError::InvalidLength);
    }
    let mut value = 0u32;
    for _ in 0..len {
        value = (value << 8) | u32::from(r.read_u8()?);
    }
    Ok(value)
}

fn encode_app_number(w: &mut Writer<'_>, tag: AppTag, value: u32) -> Result<(), EncodeError> {
    Tag::Application {
        tag,
        len: unsigned_len(value) as u32,
    }
    .encode(w)?;
    encode_unsigned(w, value)?;
    Ok(())
}

pub fn encode_app_unsigned(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_app_number(w, AppTag::Unsigned, value)
}

pub fn encode_app_enumerated(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_app_number(w, AppTag::Enumerated, value)
}

pub fn encode_app_real(w: &mut Writer<'_>, value: f32) -> Result<(), EncodeError> {
    Tag::Application {
        tag: AppTag::Real,
        len: 4,
    }
    .encode(w)?;
    w.write_u32(value.to_bits())
}

pub fn encode_app_object_id(w: &mut Writer<'_>, raw: u32) -> Result<(), EncodeError> {
    Tag::Application {
        tag: AppTag::ObjectId,
        len: 4,
    }
    .encode(w)?;
    w.write_u32(raw)
}

pub fn decode_app_unsigned(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application {
            tag: AppTag::Unsigned,
            len,
        } => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn encode_ctx_unsigned(w: &mut Writer<'_>, tag_num: u8, value: u32) -> Result<(), EncodeError> {
    Tag::Context {
        tag_num,
        len: unsigned_len(value) as u32,
    }
    .encode(w)?;
    encode_unsigned(w, value)?;
    Ok(())
}

pub fn encode_ctx_object_id(w: &mut Writer<'_>, tag_num: u8, raw: u32) -> Result<(), EncodeError> {
    Tag::Context { tag_num, len: 4 }.encode(w)?;
    w.write_u32(raw)
}

/// Decodes a context-tagged unsigned at the expected tag number.
pub fn decode_ctx_unsigned(r: &mut Reader<'_>, expected_tag_num: u8) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Context { tag_num, len } if tag_num == expected_tag_num => {
            decode_unsigned(r, len as usize)
        }
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn expect_opening(r: &mut Reader<'_>, tag_num: u8) -> Result<(), DecodeError> {
    match Tag::decode(r)? {
        Tag::Opening { tag_num: n } if n == tag_num => Ok(()),
        _ => Err(DecodeError::InvalidTag),
    }
}
