use crate::cov::CovNotification;
use crate::discovery::DeviceInfo;
use crate::error::ClientError;
use crate::invoke_id::InvokeIds;
use crate::value::PropertyValue;
use bacip_core::apdu::{
    AbortPdu, ApduType, ComplexAckHeader, ErrorPdu, RejectPdu, SimpleAck, UnconfirmedRequestHeader,
};
use bacip_core::encoding::{reader::Reader, writer::Writer};
use bacip_core::npdu::Npdu;
use bacip_core::services::cov_notification::{CovNotification as WireNotification, NotificationKind};
use bacip_core::services::i_am::{IAmRequest, SERVICE_I_AM};
use bacip_core::services::read_property::{
    ObjectListAck, ReadPropertyRequest, SERVICE_READ_PROPERTY,
};
use bacip_core::services::read_property_multiple::{
    ReadAccessSpec, ReadPropertyMultipleRequest, SERVICE_READ_PROPERTY_MULTIPLE,
};
use bacip_core::services::subscribe_cov::{SubscribeCovRequest, SERVICE_SUBSCRIBE_COV};
use bacip_core::services::who_is::WhoIsRequest;
use bacip_core::types::{ObjectId, ObjectType, PropertyId};
use bacip_core::EncodeError;
use bacip_datalink::{BacnetIpTransport, DataLink, DataLinkError};
use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{timeout, Instant};

const RECV_BUF_LEN: usize = 1500;
/// Largest NPDU+APDU payload that still fits one BVLC frame.
const MAX_TX_LEN: usize = 1476;

/// Client configuration.
#[derive(Debug, Clone, Copy)]
pub struct ClientConfig {
    /// Local address to bind; `None` binds an ephemeral port on all
    /// interfaces.
    pub local_addr: Option<SocketAddr>,
    /// Per-request read deadline.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            local_addr: None,
            timeout: Duration::from_secs(3),
        }
    }
}

/// A BACnet/IP client over one datalink.
///
/// A single mutex serialises every socket use: a transaction sends one
/// datagram, reads one datagram under the configured deadline, and
/// validates it against the invoke ID it sent. There is no receive
/// demultiplexer, so overlapping confirmed requests from one client are
/// not supported; callers issue one transaction at a time and COV intake
/// interleaves through the same lock between transactions.
#[derive(Debug)]
pub struct BacnetClient<D: DataLink> {
    datalink: D,
    invoke_ids: InvokeIds,
    io_lock: Mutex<()>,
    timeout: Duration,
}

impl BacnetClient<BacnetIpTransport> {
    /// Binds a UDP transport and wraps it in a client.
    pub async fn bind(config: ClientConfig) -> Result<Self, ClientError> {
        let local = config
            .local_addr
            .unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0));
        let datalink = BacnetIpTransport::bind(local).await?;
        Ok(Self::with_datalink(datalink, config.timeout))
    }
}

impl<D: DataLink> BacnetClient<D> {
    /// Wraps an existing datalink, e.g. an in-memory one in tests.
    pub fn with_datalink(datalink: D, timeout: Duration) -> Self {
        Self {
            datalink,
            invoke_ids: InvokeIds::new(),
            io_lock: Mutex::new(()),
            timeout,
        }
    }

    /// Broadcasts a global Who-Is and collects I-Am answers until `wait`
    /// elapses. Datagrams that do not parse as I-Am are unrelated traffic
    /// and are dropped; duplicate announcements are kept once.
    pub async fn discover(
        &self,
        broadcast: SocketAddr,
        wait: Duration,
    ) -> Result<Vec<DeviceInfo>, ClientError> {
        let _io = self.io_lock.lock().await;

        let frame = build_frame(|w| {
            Npdu::new(0).encode(w)?;
            WhoIsRequest::global().encode(w)
        })?;
        self.datalink.send(broadcast, &frame).await?;

        let deadline = Instant::now() + wait;
        let mut devices = Vec::new();
        let mut seen = HashSet::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            let mut rx = [0u8; RECV_BUF_LEN];
            let (n, source) = match timeout(remaining, self.datalink.recv(&mut rx)).await {
                Err(_) => break,
                Ok(Err(DataLinkError::Io(e))) => return Err(DataLinkError::Io(e).into()),
                Ok(Err(_)) => continue,
                Ok(Ok(v)) => v,
            };

            let Some(device) = parse_i_am(&rx[..n], source) else {
                continue;
            };
            if seen.insert(device.device_id) {
                log::debug!("discovered device {} at {}", device.device_id, device.address);
                devices.push(device);
            }
        }

        Ok(devices)
    }

    /// Reads the `object-list` property of a device's Device object.
    pub async fn read_object_list(&self, device: &DeviceInfo) -> Result<Vec<ObjectId>, ClientError> {
        let invoke_id = self.invoke_ids.next();
        let frame = build_frame(|w| {
            Npdu::expecting_reply().encode(w)?;
            ReadPropertyRequest {
                object_id: ObjectId::new(ObjectType::Device, device.device_id),
                property_id: PropertyId::ObjectList,
                invoke_id,
            }
            .encode(w)
        })?;

        let apdu = self.exchange(device.address, &frame).await?;
        let payload = expect_complex_ack(&apdu, invoke_id, SERVICE_READ_PROPERTY)?;
        let mut r = Reader::new(payload);
        let ack = ObjectListAck::decode_after_header(&mut r)?;
        Ok(ack.objects)
    }

    /// Reads every property of one object via ReadPropertyMultiple `ALL`.
    pub async fn read_all_properties(
        &self,
        device: &DeviceInfo,
        object: ObjectId,
    ) -> Result<Vec<PropertyValue>, ClientError> {
        let invoke_id = self.invoke_ids.next();
        let specs = [ReadPropertyMultipleRequest::all_properties(object)];
        let frame = build_frame(|w| {
            Npdu::expecting_reply().encode(w)?;
            ReadPropertyMultipleRequest {
                specs: &specs,
                invoke_id,
            }
            .encode(w)
        })?;

        let ack = self.read_property_multiple(device, &frame, invoke_id).await?;
        Ok(ack
            .into_iter()
            .flat_map(|(_, properties)| properties)
            .collect())
    }

    /// Reads the listed properties of one object, keyed by property.
    ///
    /// Duplicate records for the same property keep the last value seen,
    /// so the result has one entry per requested property that the device
    /// answered.
    pub async fn read_properties(
        &self,
        device: &DeviceInfo,
        object: ObjectId,
        properties: &[PropertyId],
    ) -> Result<HashMap<PropertyId, crate::value::Value>, ClientError> {
        let invoke_id = self.invoke_ids.next();
        let specs = [ReadAccessSpec {
            object_id: object,
            properties,
        }];
        let frame = build_frame(|w| {
            Npdu::expecting_reply().encode(w)?;
            ReadPropertyMultipleRequest {
                specs: &specs,
                invoke_id,
            }
            .encode(w)
        })?;

        let ack = self.read_property_multiple(device, &frame, invoke_id).await?;
        let mut out = HashMap::new();
        let mut object_seen = false;
        for (object_id, records) in ack {
            if object_id != object {
                continue;
            }
            object_seen = true;
            for record in records {
                out.insert(record.property_id, record.value);
            }
        }
        if !object_seen {
            return Err(ClientError::UnsupportedResponse);
        }
        Ok(out)
    }

    /// Reads one property from several objects on a device, keyed by
    /// object. Exactly one entry per distinct object in the reply.
    pub async fn read_property_from_objects(
        &self,
        device: &DeviceInfo,
        objects: &[ObjectId],
        property_id: PropertyId,
    ) -> Result<HashMap<ObjectId, crate::value::Value>, ClientError> {
        let invoke_id = self.invoke_ids.next();
        let properties = [property_id];
        let specs: Vec<ReadAccessSpec<'_>> = objects
            .iter()
            .map(|&object_id| ReadAccessSpec {
                object_id,
                properties: &properties,
            })
            .collect();
        let frame = build_frame(|w| {
            Npdu::expecting_reply().encode(w)?;
            ReadPropertyMultipleRequest {
                specs: &specs,
                invoke_id,
            }
            .encode(w)
        })?;

        let ack = self.read_property_multiple(device, &frame, invoke_id).await?;
        let mut out = HashMap::new();
        for (object_id, records) in ack {
            for record in records {
                if record.property_id == property_id {
                    out.insert(object_id, record.value);
                }
            }
        }
        Ok(out)
    }

    /// Starts a self-renewing COV subscription on `object`.
    ///
    /// Returns immediately; the worker performs the initial SubscribeCOV
    /// and delivers notifications and errors through the returned handle.
    pub fn subscribe_cov(
        self: Arc<Self>,
        device: &DeviceInfo,
        object: ObjectId,
        subscriber_process_id: u8,
        confirmed: bool,
        lifetime_seconds: u8,
    ) -> crate::subscription::CovSubscription
    where
        D: 'static,
    {
        crate::subscription::CovSubscription::spawn(
            self,
            device,
            object,
            subscriber_process_id,
            confirmed,
            lifetime_seconds,
        )
    }

    /// Sends a SubscribeCOV and awaits its Simple-ACK. Used for both the
    /// initial subscription and renewals.
    pub(crate) async fn send_subscribe_cov(
        &self,
        address: SocketAddr,
        object: ObjectId,
        subscriber_process_id: u8,
        confirmed: bool,
        lifetime_seconds: u8,
    ) -> Result<(), ClientError> {
        let invoke_id = self.invoke_ids.next();
        let frame = build_frame(|w| {
            Npdu::expecting_reply().encode(w)?;
            SubscribeCovRequest {
                subscriber_process_id,
                monitored_object_id: object,
                issue_confirmed_notifications: confirmed,
                lifetime_seconds,
                invoke_id,
            }
            .encode(w)
        })?;

        let apdu = self.exchange(address, &frame).await?;
        expect_simple_ack(&apdu, invoke_id, SERVICE_SUBSCRIBE_COV)
    }

    /// Polls the socket for one unconfirmed COV/event notification.
    ///
    /// `Ok(None)` on deadline; decode failures come back as errors so a
    /// subscription worker can report and keep going.
    pub async fn recv_notification(
        &self,
        wait: Duration,
    ) -> Result<Option<CovNotification>, ClientError> {
        let _io = self.io_lock.lock().await;

        let mut rx = [0u8; RECV_BUF_LEN];
        let (n, source) = match timeout(wait, self.datalink.recv(&mut rx)).await {
            Err(_) => return Ok(None),
            Ok(v) => v?,
        };

        let mut r = Reader::new(&rx[..n]);
        Npdu::decode(&mut r)?;
        let first = r.peek_u8()?;
        if ApduType::of_octet(first) != Some(ApduType::UnconfirmedRequest) {
            return Err(ClientError::UnexpectedApduType { got: first >> 4 });
        }
        let header = UnconfirmedRequestHeader::decode(&mut r)?;
        let Some(kind) = NotificationKind::from_service_choice(header.service_choice) else {
            return Err(ClientError::UnexpectedServiceChoice {
                expected: bacip_core::services::cov_notification::SERVICE_COV_NOTIFICATION,
                got: header.service_choice,
            });
        };

        let wire = WireNotification::decode_after_header(&mut r, kind)?;
        Ok(Some(CovNotification {
            source,
            kind: wire.kind,
            subscriber_process_id: wire.subscriber_process_id,
            initiating_device_id: wire.initiating_device_id,
            monitored_object_id: wire.monitored_object_id,
            time_remaining_seconds: wire.time_remaining_seconds,
            values: wire.values.into_iter().map(Into::into).collect(),
        }))
    }

    /// One confirmed transaction: send the frame, read one datagram under
    /// the configured deadline, and return its APDU.
    async fn exchange(&self, address: SocketAddr, frame: &[u8]) -> Result<Vec<u8>, ClientError> {
        let _io = self.io_lock.lock().await;
        self.datalink.send(address, frame).await?;

        let mut rx = [0u8; RECV_BUF_LEN];
        let (n, _source) = match timeout(self.timeout, self.datalink.recv(&mut rx)).await {
            Err(_) => return Err(ClientError::Timeout),
            Ok(v) => v?,
        };

        let mut r = Reader::new(&rx[..n]);
        Npdu::decode(&mut r)?;
        Ok(r.read_slice(r.remaining())?.to_vec())
    }

    async fn read_property_multiple(
        &self,
        device: &DeviceInfo,
        frame: &[u8],
        invoke_id: u8,
    ) -> Result<Vec<(ObjectId, Vec<PropertyValue>)>, ClientError> {
        let apdu = self.exchange(device.address, frame).await?;
        let payload = expect_complex_ack(&apdu, invoke_id, SERVICE_READ_PROPERTY_MULTIPLE)?;

        let mut r = Reader::new(payload);
        let ack =
            bacip_core::services::read_property_multiple::ReadPropertyMultipleAck::decode_after_header(
                &mut r,
            )?;
        Ok(ack
            .results
            .into_iter()
            .map(|result| {
                (
                    result.object_id,
                    result.properties.into_iter().map(Into::into).collect(),
                )
            })
            .collect())
    }
}

fn build_frame<F>(encode: F) -> Result<Vec<u8>, ClientError>
where
    F: FnOnce(&mut Writer<'_>) -> Result<(), EncodeError>,
{
    let mut buf = [0u8; MAX_TX_LEN];
    let mut w = Writer::new(&mut buf);
    encode(&mut w)?;
    Ok(w.written().to_vec())
}

fn parse_i_am(payload: &[u8], source: SocketAddr) -> Option<DeviceInfo> {
    let mut r = Reader::new(payload);
    Npdu::decode(&mut r).ok()?;
    let header = UnconfirmedRequestHeader::decode(&mut r).ok()?;
    if header.service_choice != SERVICE_I_AM {
        return None;
    }
    let i_am = IAmRequest::decode_after_header(&mut r).ok()?;
    if i_am.device_id.object_type() != ObjectType::Device {
        return None;
    }
    Some(DeviceInfo {
        device_id: i_am.device_id.instance(),
        address: source,
        max_apdu: i_am.max_apdu,
    })
}

/// Classifies a reply APDU, turning fault PDUs into their errors.
fn classify(apdu: &[u8]) -> Result<ApduType, ClientError> {
    let first = *apdu.first().ok_or(ClientError::UnsupportedResponse)?;
    let Some(apdu_type) = ApduType::of_octet(first) else {
        return Err(ClientError::UnexpectedApduType { got: first >> 4 });
    };

    let mut r = Reader::new(apdu);
    match apdu_type {
        ApduType::Error => {
            let err = ErrorPdu::decode(&mut r)?;
            Err(ClientError::RemoteError {
                service_choice: err.service_choice,
                error_class: err.error_class,
                error_code: err.error_code,
            })
        }
        ApduType::Reject => {
            let rej = RejectPdu::decode(&mut r)?;
            Err(ClientError::RemoteReject { reason: rej.reason })
        }
        ApduType::Abort => {
            let abort = AbortPdu::decode(&mut r)?;
            Err(ClientError::RemoteAbort {
                reason: abort.reason,
                server: abort.server,
            })
        }
        other => Ok(other),
    }
}

fn expect_simple_ack(apdu: &[u8], invoke_id: u8, service_choice: u8) -> Result<(), ClientError> {
    match classify(apdu)? {
        ApduType::SimpleAck => {
            let mut r = Reader::new(apdu);
            let ack = SimpleAck::decode(&mut r)?;
            if ack.invoke_id != invoke_id {
                return Err(ClientError::InvokeIdMismatch {
                    sent: invoke_id,
                    received: ack.invoke_id,
                });
            }
            if ack.service_choice != service_choice {
                return Err(ClientError::UnexpectedServiceChoice {
                    expected: service_choice,
                    got: ack.service_choice,
                });
            }
            Ok(())
        }
        other => Err(ClientError::UnexpectedApduType { got: other as u8 }),
    }
}

/// Validates a Complex-ACK header and returns the service payload that
/// follows it.
fn expect_complex_ack<'a>(
    apdu: &'a [u8],
    invoke_id: u8,
    service_choice: u8,
) -> Result<&'a [u8], ClientError> {
    match classify(apdu)? {
        ApduType::ComplexAck => {
            let mut r = Reader::new(apdu);
            let ack = ComplexAckHeader::decode(&mut r)?;
            if ack.invoke_id != invoke_id {
                return Err(ClientError::InvokeIdMismatch {
                    sent: invoke_id,
                    received: ack.invoke_id,
                });
            }
            if ack.service_choice != service_choice {
                return Err(ClientError::UnexpectedServiceChoice {
                    expected: service_choice,
                    got: ack.service_choice,
                });
            }
            Ok(&apdu[3..])
        }
        other => Err(ClientError::UnexpectedApduType { got: other as u8 }),
    }
}

#[cfg(test)]
mod tests {
    use super::{BacnetClient, ClientConfig};
    use crate::error::ClientError;
    use crate::testing::{respond_once, ChannelDataLink, DEVICE_ADDR};
    use crate::value::Value;
    use crate::DeviceInfo;
    use bacip_core::apdu::{ComplexAckHeader, ConfirmedRequestHeader, SimpleAck};
    use bacip_core::encoding::{reader::Reader, writer::Writer};
    use bacip_core::npdu::Npdu;
    use bacip_core::services::i_am::IAmRequest;
    use bacip_core::services::read_property::SERVICE_READ_PROPERTY;
    use bacip_core::services::read_property_multiple::SERVICE_READ_PROPERTY_MULTIPLE;
    use bacip_core::types::{ObjectId, ObjectType, PropertyId};
    use bacip_datalink::{BacnetIpTransport, DataLink};
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::time::Duration;

    fn device(link_addr: SocketAddr) -> DeviceInfo {
        DeviceInfo {
            device_id: 1234,
            address: link_addr,
            max_apdu: 1476,
        }
    }

    fn test_client(link: ChannelDataLink) -> BacnetClient<ChannelDataLink> {
        BacnetClient::with_datalink(link, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn discover_parses_i_am_over_localhost_udp() {
        let localhost = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
        let peer = BacnetIpTransport::bind(localhost).await.unwrap();
        let peer_addr = peer.local_addr().unwrap();

        let client = BacnetClient::bind(ClientConfig {
            local_addr: Some(localhost),
            timeout: Duration::from_millis(200),
        })
        .await
        .unwrap();

        let responder = tokio::spawn(async move {
            let mut rx = [0u8; 64];
            let (n, source) = peer.recv(&mut rx).await.unwrap();
            assert_eq!(&rx[..n], &[0x01, 0x00, 0x10, 0x08]);

            let mut tx = [0u8; 64];
            let mut w = Writer::new(&mut tx);
            Npdu::new(0).encode(&mut w).unwrap();
            IAmRequest {
                device_id: ObjectId::new(ObjectType::Device, 1234),
                max_apdu: 1476,
                segmentation: 0,
                vendor_id: 42,
            }
            .encode(&mut w)
            .unwrap();
            peer.send(source, w.written()).await.unwrap();
        });

        // The "broadcast" address is caller-supplied, so a unicast
        // localhost peer stands in for the subnet.
        let devices = client
            .discover(peer_addr, Duration::from_millis(300))
            .await
            .unwrap();
        responder.await.unwrap();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_id, 1234);
        assert_eq!(devices[0].max_apdu, 1476);
        assert_eq!(devices[0].address, peer_addr);
    }

    #[tokio::test]
    async fn read_object_list_round_trips() {
        let (link, peer) = ChannelDataLink::pair();
        let client = test_client(link);

        respond_once(peer, |request| {
            let mut r = Reader::new(request);
            Npdu::decode(&mut r).unwrap();
            let header = ConfirmedRequestHeader::decode(&mut r).unwrap();
            assert_eq!(header.service_choice, SERVICE_READ_PROPERTY);

            let mut tx = [0u8; 128];
            let written = {
                let mut w = Writer::new(&mut tx);
                Npdu::new(0).encode(&mut w).unwrap();
                ComplexAckHeader {
                    invoke_id: header.invoke_id,
                    service_choice: SERVICE_READ_PROPERTY,
                }
                .encode(&mut w)
                .unwrap();
                // ctx-0 device, ctx-1 object-list, open-3, one id, close-3
                w.write_bytes(&[0x0C, 0x02, 0x00, 0x04, 0xD2, 0x19, 0x4C, 0x3E]).unwrap();
                w.write_bytes(&[0xC4, 0x00, 0x00, 0x00, 0x07, 0x3F]).unwrap();
                w.written().len()
            };
            tx[..written].to_vec()
        });

        let objects = client.read_object_list(&device(DEVICE_ADDR)).await.unwrap();
        assert_eq!(objects, [ObjectId::new(ObjectType::AnalogInput, 7)]);
    }

    #[tokio::test]
    async fn invoke_id_mismatch_is_a_protocol_error() {
        let (link, peer) = ChannelDataLink::pair();
        let client = test_client(link);

        respond_once(peer, |request| {
            let mut r = Reader::new(request);
            Npdu::decode(&mut r).unwrap();
            let header = ConfirmedRequestHeader::decode(&mut r).unwrap();

            let mut tx = [0u8; 16];
            let written = {
                let mut w = Writer::new(&mut tx);
                Npdu::new(0).encode(&mut w).unwrap();
                SimpleAck {
                    invoke_id: header.invoke_id.wrapping_add(1),
                    service_choice: header.service_choice,
                }
                .encode(&mut w)
                .unwrap();
                w.written().len()
            };
            tx[..written].to_vec()
        });

        let err = client
            .send_subscribe_cov(
                DEVICE_ADDR,
                ObjectId::new(ObjectType::AnalogInput, 0),
                1,
                false,
                60,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvokeIdMismatch { .. }));
    }

    #[tokio::test]
    async fn transaction_times_out_without_a_reply() {
        let (link, _peer) = ChannelDataLink::pair();
        let client = test_client(link);

        let err = client
            .read_object_list(&device(DEVICE_ADDR))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout));
    }

    #[tokio::test]
    async fn read_properties_maps_by_property() {
        let (link, peer) = ChannelDataLink::pair();
        let client = test_client(link);
        let object = ObjectId::new(ObjectType::AnalogInput, 3);

        respond_once(peer, move |request| {
            let mut r = Reader::new(request);
            Npdu::decode(&mut r).unwrap();
            let header = ConfirmedRequestHeader::decode(&mut r).unwrap();
            assert_eq!(header.service_choice, SERVICE_READ_PROPERTY_MULTIPLE);

            let mut tx = [0u8; 128];
            let written = {
                let mut w = Writer::new(&mut tx);
                Npdu::new(0).encode(&mut w).unwrap();
                ComplexAckHeader {
                    invoke_id: header.invoke_id,
                    service_choice: SERVICE_READ_PROPERTY_MULTIPLE,
                }
                .encode(&mut w)
                .unwrap();
                w.write_bytes(&[0x0C]).unwrap();
                w.write_u32(object.raw()).unwrap();
                w.write_bytes(&[0x1E]).unwrap();
                // present-value 21.5, status-flags all clear
                w.write_bytes(&[0x29, 85, 0x4E, 0x44, 0x41, 0xAC, 0x00, 0x00, 0x4F]).unwrap();
                w.write_bytes(&[0x29, 111, 0x4E, 0x85, 0x04, 0x00, 0x4F]).unwrap();
                w.write_bytes(&[0x1F]).unwrap();
                w.written().len()
            };
            tx[..written].to_vec()
        });

        let map = client
            .read_properties(
                &device(DEVICE_ADDR),
                object,
                &[PropertyId::PresentValue, PropertyId::StatusFlags],
            )
            .await
            .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map[&PropertyId::PresentValue], Value::Real(21.5));
        assert!(matches!(map[&PropertyId::StatusFlags], Value::StatusFlags(_)));
    }

    #[tokio::test]
    async fn read_property_from_objects_keeps_one_entry_per_object() {
        let (link, peer) = ChannelDataLink::pair();
        let client = test_client(link);
        let objects = [
            ObjectId::new(ObjectType::AnalogInput, 1),
            ObjectId::new(ObjectType::AnalogInput, 2),
        ];

        respond_once(peer, move |request| {
            let mut r = Reader::new(request);
            Npdu::decode(&mut r).unwrap();
            let header = ConfirmedRequestHeader::decode(&mut r).unwrap();

            let mut tx = [0u8; 128];
            let written = {
                let mut w = Writer::new(&mut tx);
                Npdu::new(0).encode(&mut w).unwrap();
                ComplexAckHeader {
                    invoke_id: header.invoke_id,
                    service_choice: SERVICE_READ_PROPERTY_MULTIPLE,
                }
                .encode(&mut w)
                .unwrap();
                for (object, value) in objects.iter().zip([7u8, 9u8]) {
                    w.write_bytes(&[0x0C]).unwrap();
                    w.write_u32(object.raw()).unwrap();
                    w.write_bytes(&[0x1E, 0x29, 85, 0x4E, 0x21, value, 0x4F, 0x1F]).unwrap();
                }
                w.written().len()
            };
            tx[..written].to_vec()
        });

        let map = client
            .read_property_from_objects(&device(DEVICE_ADDR), &objects, PropertyId::PresentValue)
            .await
            .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map[&objects[0]], Value::Unsigned(7));
        assert_eq!(map[&objects[1]], Value::Unsigned(9));
    }

    #[tokio::test]
    async fn error_pdu_surfaces_as_remote_error() {
        let (link, peer) = ChannelDataLink::pair();
        let client = test_client(link);

        respond_once(peer, |request| {
            let mut r = Reader::new(request);
            Npdu::decode(&mut r).unwrap();
            let header = ConfirmedRequestHeader::decode(&mut r).unwrap();
            // Error PDU: class 2 (property), code 32 (unknown property).
            let mut tx = vec![0x01, 0x00, 0x50, header.invoke_id, header.service_choice];
            tx.extend_from_slice(&[0x09, 0x02, 0x19, 0x20]);
            tx
        });

        let err = client
            .read_object_list(&device(DEVICE_ADDR))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::RemoteError {
                error_class: Some(2),
                error_code: Some(32),
                ..
            }
        ));
    }
}
