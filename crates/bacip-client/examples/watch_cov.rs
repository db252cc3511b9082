//! Subscribe to Change-of-Value notifications for one object and print
//! them until interrupted. The subscription renews itself before its
//! lifetime expires.
//!
//! Usage:
//!   cargo run -p bacip-client --example watch_cov -- 192.168.1.40:47808 0 3
//!   (address, object type number, instance)

use bacip_client::{BacnetClient, ClientConfig, ObjectId, ObjectType};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let target: SocketAddr = args.next().ok_or("usage: watch_cov <ip:port> <type> <instance>")?.parse()?;
    let object_type: u16 = args.next().ok_or("missing object type")?.parse()?;
    let instance: u32 = args.next().ok_or("missing instance")?.parse()?;
    let object = ObjectId::new(ObjectType::from_u16(object_type), instance);

    let client = Arc::new(BacnetClient::bind(ClientConfig::default()).await?);
    let devices = client.discover(target, Duration::from_secs(2)).await?;
    let device = *devices.first().ok_or("no I-Am from target")?;

    let mut subscription = Arc::clone(&client).subscribe_cov(&device, object, 1, false, 120);
    println!("watching {:?} {} on device {}", object.object_type(), instance, device.device_id);

    let (notifications, errors) = subscription.sinks();
    loop {
        tokio::select! {
            notification = notifications.recv() => {
                let Some(notification) = notification else { break };
                println!(
                    "COV from {} ({:?}, {}s remaining):",
                    notification.source, notification.kind, notification.time_remaining_seconds
                );
                for value in &notification.values {
                    println!("  {:?} = {:?}", value.property_id, value.value);
                }
            }
            error = errors.recv() => {
                let Some(error) = error else { break };
                eprintln!("subscription error: {error}");
            }
            _ = tokio::signal::ctrl_c() => {
                println!("cancelling");
                break;
            }
        }
    }
    subscription.stop();

    Ok(())
}
