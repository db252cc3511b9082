use std::net::SocketAddr;

/// A device discovered through Who-Is / I-Am.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceInfo {
    /// Instance number of the device object announced in I-Am.
    pub device_id: u32,
    /// Transport address the announcement came from.
    pub address: SocketAddr,
    /// Max-APDU-Length-Accepted reported by the device.
    pub max_apdu: u16,
}
