//! BACnet/IP data link layer.
//!
//! Wraps NPDU+APDU payloads in the 4-octet BVLC header and moves them over
//! UDP. The [`DataLink`] trait is the seam the client is generic over, so
//! tests can substitute an in-memory transport for the socket.

#![allow(async_fn_in_trait)]

pub mod bip;
pub mod traits;

pub use bip::transport::BacnetIpTransport;
pub use traits::{DataLink, DataLinkError};

/// The IANA-registered BACnet/IP UDP port (0xBAC0).
pub const BACNET_DEFAULT_PORT: u16 = 47808;
