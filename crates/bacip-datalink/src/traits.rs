use std::net::SocketAddr;
use thiserror::Error;

/// Errors that can occur at the data-link layer.
#[derive(Debug, Error)]
pub enum DataLinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame too large")]
    FrameTooLarge,
    #[error("invalid frame")]
    InvalidFrame,
    #[error("unsupported BVLC function 0x{0:02x}")]
    UnsupportedBvlcFunction(u8),
}

/// Async trait for exchanging raw NPDU+APDU payloads.
///
/// [`BacnetIpTransport`](crate::BacnetIpTransport) implements it over UDP;
/// client tests implement it over channels.
pub trait DataLink: Send + Sync {
    /// Sends `payload` to `address`, adding datalink framing.
    async fn send(&self, address: SocketAddr, payload: &[u8]) -> Result<(), DataLinkError>;

    /// Receives one payload into `buf`, returning `(length, source)`.
    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), DataLinkError>;
}
