//! Discover BACnet devices on the local network using Who-Is.
//!
//! Usage:
//!   cargo run -p bacip-client --example discover_devices [broadcast-addr]

use bacip_client::{BacnetClient, ClientConfig};
use bacip_datalink::BACNET_DEFAULT_PORT;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let broadcast: SocketAddr = match std::env::args().nth(1) {
        Some(addr) => addr.parse()?,
        None => SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), BACNET_DEFAULT_PORT),
    };

    let client = BacnetClient::bind(ClientConfig::default()).await?;
    let devices = client.discover(broadcast, Duration::from_secs(3)).await?;

    if devices.is_empty() {
        println!("No devices found.");
        return Ok(());
    }

    for device in &devices {
        println!(
            "device {} at {} (max APDU {})",
            device.device_id, device.address, device.max_apdu
        );
    }
    println!("\nDiscovered {} device(s).", devices.len());

    Ok(())
}
