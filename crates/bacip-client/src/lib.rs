//! Async BACnet/IP client.
//!
//! Discovers devices with Who-Is, reads properties with ReadProperty and
//! ReadPropertyMultiple, and maintains Change-of-Value subscriptions that
//! renew themselves before their lifetime expires.
//!
//! ```no_run
//! use bacip_client::{BacnetClient, ClientConfig};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), bacip_client::ClientError> {
//! let client = BacnetClient::bind(ClientConfig::default()).await?;
//! let devices = client
//!     .discover("255.255.255.255:47808".parse().unwrap(), Duration::from_secs(3))
//!     .await?;
//! for device in &devices {
//!     let objects = client.read_object_list(device).await?;
//!     println!("device {} has {} objects", device.device_id, objects.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod cov;
pub mod discovery;
pub mod error;
pub mod invoke_id;
pub mod subscription;
pub mod value;

#[cfg(test)]
mod testing;

pub use bacip_core::services::cov_notification::NotificationKind;
pub use bacip_core::types::{ObjectId, ObjectType, PropertyId, StatusFlags};
pub use client::{BacnetClient, ClientConfig};
pub use cov::CovNotification;
pub use discovery::DeviceInfo;
pub use error::ClientError;
pub use subscription::CovSubscription;
pub use value::{PropertyValue, Value};
