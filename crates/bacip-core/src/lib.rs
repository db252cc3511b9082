//! BACnet/IP protocol encoding and decoding in pure Rust.
//!
//! `bacip-core` provides zero-copy, `no_std`-compatible codecs for the
//! BACnet tag-length-value body, the NPDU wrapper, APDU headers, and the
//! service payloads a BACnet/IP client exchanges: Who-Is / I-Am,
//! ReadProperty, ReadPropertyMultiple, SubscribeCOV, and COV/Event
//! notifications. The `bacip-client` crate builds the transaction engine
//! on top of it.
//!
//! # Feature flags
//!
//! - **`std`** (default) — enables `std::error::Error` implementations.
//! - **`alloc`** (default) — enables service decoders that allocate
//!   (ReadPropertyMultiple, object lists, notifications).
//! - **`serde`** — derives `Serialize`/`Deserialize` on core types.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// APDU header codecs for requests, acknowledgements, and fault PDUs.
pub mod apdu;
/// Binary encoding primitives, the tag system, and the zero-copy reader/writer.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// NPDU (Network Protocol Data Unit) encoding and decoding.
pub mod npdu;
/// BACnet service request and acknowledgement codecs.
pub mod services;
/// Core BACnet data types: object identifiers, property identifiers, values.
pub mod types;

pub use error::{DecodeError, EncodeError};
