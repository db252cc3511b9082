use crate::bip::bvlc::{BvlcFunction, BvlcHeader};
use crate::{DataLink, DataLinkError};
use bacip_core::encoding::{reader::Reader, writer::Writer};
use std::net::{IpAddr, SocketAddr};
use tokio::net::UdpSocket;

const MAX_FRAME_LEN: usize = 1500;

/// BACnet/IP over a single UDP socket.
///
/// `send` prefixes the BVLC header, choosing Original-Broadcast-NPDU for
/// the limited-broadcast address and Original-Unicast-NPDU otherwise.
/// `recv` validates the header — including that the advertised length
/// matches the datagram — strips it, and hands the NPDU upward.
#[derive(Debug)]
pub struct BacnetIpTransport {
    socket: UdpSocket,
}

impl BacnetIpTransport {
    pub async fn bind(bind_addr: SocketAddr) -> Result<Self, DataLinkError> {
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.set_broadcast(true)?;
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DataLinkError> {
        self.socket.local_addr().map_err(DataLinkError::Io)
    }
}

impl DataLink for BacnetIpTransport {
    async fn send(&self, address: SocketAddr, payload: &[u8]) -> Result<(), DataLinkError> {
        let is_broadcast = matches!(address.ip(), IpAddr::V4(v4) if v4.is_broadcast());
        let function = if is_broadcast {
            BvlcFunction::OriginalBroadcastNpdu
        } else {
            BvlcFunction::OriginalUnicastNpdu
        };

        let total_len = BvlcHeader::LEN + payload.len();
        if total_len > MAX_FRAME_LEN {
            return Err(DataLinkError::FrameTooLarge);
        }

        let mut frame = [0u8; MAX_FRAME_LEN];
        let mut w = Writer::new(&mut frame);
        BvlcHeader {
            function,
            length: total_len as u16,
        }
        .encode(&mut w)
        .map_err(|_| DataLinkError::InvalidFrame)?;
        w.write_bytes(payload)
            .map_err(|_| DataLinkError::FrameTooLarge)?;

        log::trace!("-> {address} {total_len} octets ({function:?})");
        self.socket.send_to(w.written(), address).await?;
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), DataLinkError> {
        let mut frame = [0u8; MAX_FRAME_LEN];
        let (n, source) = self.socket.recv_from(&mut frame).await?;

        let mut r = Reader::new(&frame[..n]);
        let header = BvlcHeader::decode(&mut r).map_err(|_| DataLinkError::InvalidFrame)?;
        if usize::from(header.length) != n {
            return Err(DataLinkError::InvalidFrame);
        }

        match header.function {
            BvlcFunction::OriginalUnicastNpdu | BvlcFunction::OriginalBroadcastNpdu => {
                let payload = r
                    .read_slice(n - BvlcHeader::LEN)
                    .map_err(|_| DataLinkError::InvalidFrame)?;
                if payload.len() > buf.len() {
                    return Err(DataLinkError::FrameTooLarge);
                }
                buf[..payload.len()].copy_from_slice(payload);
                Ok((payload.len(), source))
            }
            BvlcFunction::Unknown(v) => {
                log::debug!("<- {source} rejected BVLC function 0x{v:02x}");
                Err(DataLinkError::UnsupportedBvlcFunction(v))
            }
        }
    }
}
