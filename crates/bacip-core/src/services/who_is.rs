use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{primitives::encode_ctx_unsigned, writer::Writer};
use crate::EncodeError;

pub const SERVICE_WHO_IS: u8 = 0x08;

/// Who-Is request. Discovery always broadcasts the global form; the range
/// limits are kept for targeted scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhoIsRequest {
    pub low_limit: Option<u32>,
    pub high_limit: Option<u32>,
}

impl WhoIsRequest {
    pub const fn global() -> Self {
        Self {
            low_limit: None,
            high_limit: None,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader {
            service_choice: SERVICE_WHO_IS,
        }
        .encode(w)?;

        if let Some(low) = self.low_limit {
            encode_ctx_unsigned(w, 0, low)?;
        }
        if let Some(high) = self.high_limit {
            encode_ctx_unsigned(w, 1, high)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::WhoIsRequest;
    use crate::encoding::writer::Writer;

    #[test]
    fn global_form_is_two_octets() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        WhoIsRequest::global().encode(&mut w).unwrap();
        assert_eq!(w.written(), &[0x10, 0x08]);
    }

    #[test]
    fn ranged_form_appends_context_limits() {
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        WhoIsRequest {
            low_limit: Some(100),
            high_limit: Some(200),
        }
        .encode(&mut w)
        .unwrap();
        assert_eq!(w.written(), &[0x10, 0x08, 0x09, 100, 0x19, 200]);
    }
}
