//! In-memory datalink for driving the client against scripted peers.

use bacip_datalink::{DataLink, DataLinkError};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::sync::{mpsc, Mutex};

/// Address the scripted peer pretends to live at.
pub const DEVICE_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 47808);

const CLIENT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 47809);

type Frame = (Vec<u8>, SocketAddr);

/// One half of an in-memory frame pipe. Frames sent on one half arrive at
/// the other, stamped with the sender's address; destination addresses are
/// ignored.
pub struct ChannelDataLink {
    local: SocketAddr,
    tx: mpsc::UnboundedSender<Frame>,
    rx: Mutex<mpsc::UnboundedReceiver<Frame>>,
}

impl ChannelDataLink {
    pub fn pair() -> (ChannelDataLink, ChannelDataLink) {
        let (client_tx, peer_rx) = mpsc::unbounded_channel();
        let (peer_tx, client_rx) = mpsc::unbounded_channel();
        (
            ChannelDataLink {
                local: CLIENT_ADDR,
                tx: client_tx,
                rx: Mutex::new(client_rx),
            },
            ChannelDataLink {
                local: DEVICE_ADDR,
                tx: peer_tx,
                rx: Mutex::new(peer_rx),
            },
        )
    }
}

impl DataLink for ChannelDataLink {
    async fn send(&self, _address: SocketAddr, payload: &[u8]) -> Result<(), DataLinkError> {
        self.tx
            .send((payload.to_vec(), self.local))
            .map_err(|_| DataLinkError::InvalidFrame)
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), DataLinkError> {
        let mut rx = self.rx.lock().await;
        let Some((payload, source)) = rx.recv().await else {
            // Peer gone: behave like a silent network so deadline paths run.
            std::future::pending::<()>().await;
            unreachable!()
        };
        if payload.len() > buf.len() {
            return Err(DataLinkError::FrameTooLarge);
        }
        buf[..payload.len()].copy_from_slice(&payload);
        Ok((payload.len(), source))
    }
}

/// Spawns a peer that answers the next request with `respond`'s frame.
pub fn respond_once<F>(peer: ChannelDataLink, respond: F) -> tokio::task::JoinHandle<()>
where
    F: FnOnce(&[u8]) -> Vec<u8> + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = [0u8; 1500];
        let (n, source) = peer.recv(&mut buf).await.unwrap();
        let reply = respond(&buf[..n]);
        peer.send(source, &reply).await.unwrap();
    })
}
