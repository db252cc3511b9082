use bacip_datalink::DataLinkError;
use thiserror::Error;

/// Errors surfaced by the client.
///
/// `Timeout` is distinguishable so callers can retry at their own
/// discretion; the protocol-level variants name the mismatch site and are
/// not worth retrying. The client itself never retries anything.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("datalink error: {0}")]
    DataLink(#[from] DataLinkError),
    #[error("encode error: {0}")]
    Encode(#[from] bacip_core::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] bacip_core::DecodeError),
    #[error("request timed out")]
    Timeout,
    #[error("invoke ID mismatch: sent {sent}, reply carried {received}")]
    InvokeIdMismatch { sent: u8, received: u8 },
    #[error("unexpected APDU type 0x{got:x}")]
    UnexpectedApduType { got: u8 },
    #[error("unexpected service choice: expected 0x{expected:02x}, got 0x{got:02x}")]
    UnexpectedServiceChoice { expected: u8, got: u8 },
    #[error("device returned an error PDU for service 0x{service_choice:02x} (class {error_class:?}, code {error_code:?})")]
    RemoteError {
        service_choice: u8,
        error_class: Option<u32>,
        error_code: Option<u32>,
    },
    #[error("device rejected the request (reason {reason})")]
    RemoteReject { reason: u8 },
    #[error("device aborted the request (reason {reason}, server={server})")]
    RemoteAbort { reason: u8, server: bool },
    #[error("response shape not understood")]
    UnsupportedResponse,
}

impl ClientError {
    /// Whether a receive-path error must terminate a subscription worker.
    /// Socket failures are fatal; malformed datagrams are reported and
    /// skipped.
    pub(crate) fn is_transport(&self) -> bool {
        matches!(self, Self::DataLink(DataLinkError::Io(_)))
    }
}
