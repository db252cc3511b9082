use crate::value::PropertyValue;
use bacip_core::services::cov_notification::NotificationKind;
use bacip_core::types::ObjectId;
use std::net::SocketAddr;

/// An owned COV (or event) notification as delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovNotification {
    /// Address the datagram arrived from.
    pub source: SocketAddr,
    /// Which unconfirmed service carried it (COV vs event).
    pub kind: NotificationKind,
    pub subscriber_process_id: u32,
    pub initiating_device_id: ObjectId,
    pub monitored_object_id: ObjectId,
    pub time_remaining_seconds: u32,
    /// Property values in wire order.
    pub values: Vec<PropertyValue>,
}
