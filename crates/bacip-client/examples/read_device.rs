//! Walk a device: read its object list, then every property of each
//! object.
//!
//! Usage:
//!   cargo run -p bacip-client --example read_device -- 192.168.1.40:47808

use bacip_client::{BacnetClient, ClientConfig, DeviceInfo};
use std::net::SocketAddr;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let target: SocketAddr = std::env::args()
        .nth(1)
        .ok_or("usage: read_device <ip:port>")?
        .parse()?;

    let client = BacnetClient::bind(ClientConfig::default()).await?;

    // Identify the device behind the address first.
    let devices = client.discover(target, Duration::from_secs(2)).await?;
    let device: DeviceInfo = *devices.first().ok_or("no I-Am from target")?;
    println!("device {} at {}", device.device_id, device.address);

    let objects = client.read_object_list(&device).await?;
    println!("{} objects", objects.len());

    for object in objects {
        println!("\n{:?} instance {}:", object.object_type(), object.instance());
        match client.read_all_properties(&device, object).await {
            Ok(properties) => {
                for property in properties {
                    println!("  {:?} = {:?}", property.property_id, property.value);
                }
            }
            Err(err) => println!("  read failed: {err}"),
        }
    }

    Ok(())
}
