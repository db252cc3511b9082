use crate::client::BacnetClient;
use crate::cov::CovNotification;
use crate::discovery::DeviceInfo;
use crate::error::ClientError;
use bacip_core::types::ObjectId;
use bacip_datalink::DataLink;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// How long each receive poll holds the socket before yielding, so the
/// worker observes cancellation and the renewal timer promptly and other
/// transactions can interleave.
const RECEIVE_POLL: Duration = Duration::from_millis(100);

/// A running COV subscription.
///
/// The worker task subscribes, renews before the lifetime expires, and
/// feeds two sinks: parsed notifications and errors. Both sinks close when
/// the worker terminates — on cancellation, on a failed (re-)subscription,
/// or on a socket failure.
#[derive(Debug)]
pub struct CovSubscription {
    notifications: mpsc::Receiver<CovNotification>,
    errors: mpsc::Receiver<ClientError>,
    cancel: watch::Sender<bool>,
    worker: Option<std::thread::JoinHandle<()>>,
}

#[derive(Debug, Clone, Copy)]
struct SubscriptionSpec {
    address: SocketAddr,
    object: ObjectId,
    subscriber_process_id: u8,
    confirmed: bool,
    lifetime_seconds: u8,
}

impl CovSubscription {
    /// Starts the subscription worker.
    ///
    /// The initial SubscribeCOV happens inside the worker: if it fails,
    /// the failure arrives on the error sink and both sinks close.
    pub fn spawn<D: DataLink + 'static>(
        client: Arc<BacnetClient<D>>,
        device: &DeviceInfo,
        object: ObjectId,
        subscriber_process_id: u8,
        confirmed: bool,
        lifetime_seconds: u8,
    ) -> Self {
        let (notification_tx, notifications) = mpsc::channel(64);
        let (error_tx, errors) = mpsc::channel(8);
        let (cancel, cancel_rx) = watch::channel(false);
        let spec = SubscriptionSpec {
            address: device.address,
            object,
            subscriber_process_id,
            confirmed,
            lifetime_seconds,
        };

        // The datalink futures are not nameable through the trait, so the
        // worker runs on its own thread driving the shared runtime, the
        // same way long-lived jobs are structured elsewhere in the stack.
        let runtime = tokio::runtime::Handle::current();
        let worker = std::thread::spawn(move || {
            runtime.block_on(run_subscription(
                client,
                spec,
                notification_tx,
                error_tx,
                cancel_rx,
            ));
        });

        Self {
            notifications,
            errors,
            cancel,
            worker: Some(worker),
        }
    }

    /// Next parsed notification; `None` once the worker has terminated.
    pub async fn next(&mut self) -> Option<CovNotification> {
        self.notifications.recv().await
    }

    /// Next error; `None` once the worker has terminated.
    pub async fn next_error(&mut self) -> Option<ClientError> {
        self.errors.recv().await
    }

    /// Both sinks at once, for callers that multiplex over them.
    pub fn sinks(
        &mut self,
    ) -> (
        &mut mpsc::Receiver<CovNotification>,
        &mut mpsc::Receiver<ClientError>,
    ) {
        (&mut self.notifications, &mut self.errors)
    }

    /// Signals cancellation; the worker exits at its next poll boundary.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Cancels and waits for the worker to finish.
    pub fn stop(mut self) {
        let _ = self.cancel.send(true);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for CovSubscription {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}

/// Renewal interval: 80 % of the lifetime, floored at one second.
fn renewal_interval(lifetime_seconds: u8) -> Duration {
    let seconds = (f64::from(lifetime_seconds) * 0.8) as u64;
    Duration::from_secs(seconds.max(1))
}

async fn run_subscription<D: DataLink>(
    client: Arc<BacnetClient<D>>,
    spec: SubscriptionSpec,
    notifications: mpsc::Sender<CovNotification>,
    errors: mpsc::Sender<ClientError>,
    mut cancel: watch::Receiver<bool>,
) {
    if let Err(err) = subscribe(&client, &spec).await {
        log::warn!("initial SubscribeCOV for {:?} failed: {err}", spec.object);
        let _ = errors.send(err).await;
        return;
    }
    log::debug!(
        "subscribed to {:?} at {} (lifetime {}s)",
        spec.object,
        spec.address,
        spec.lifetime_seconds
    );

    let period = renewal_interval(spec.lifetime_seconds);
    let mut renewals = interval_at(Instant::now() + period, period);
    renewals.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    return;
                }
            }
            _ = renewals.tick() => {
                if let Err(err) = subscribe(&client, &spec).await {
                    log::warn!("COV renewal for {:?} failed: {err}", spec.object);
                    let _ = errors.send(err).await;
                    return;
                }
                log::trace!("renewed COV subscription for {:?}", spec.object);
            }
            received = client.recv_notification(RECEIVE_POLL) => match received {
                Ok(Some(notification)) => {
                    if notifications.send(notification).await.is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    let fatal = err.is_transport();
                    let _ = errors.send(err).await;
                    if fatal {
                        return;
                    }
                }
            }
        }
    }
}

async fn subscribe<D: DataLink>(
    client: &BacnetClient<D>,
    spec: &SubscriptionSpec,
) -> Result<(), ClientError> {
    client
        .send_subscribe_cov(
            spec.address,
            spec.object,
            spec.subscriber_process_id,
            spec.confirmed,
            spec.lifetime_seconds,
        )
        .await
}
