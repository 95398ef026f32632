//! UDP network channel.

use crate::channel::{SendOutcome, SignalChannel};
use crate::error::{TransportError, TransportResult};
use sigcast_codec::FRAME_LEN;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Connected, nonblocking UDP endpoint.
///
/// Fire-and-forget: a full socket buffer or an unreachable peer drops
/// the frame and never stalls the caller.
pub struct UdpChannel {
    name: String,
    socket: UdpSocket,
    closed: AtomicBool,
}

impl UdpChannel {
    /// Open a channel to `addr` (e.g. "127.0.0.1:40123").
    pub fn open(addr: &str) -> TransportResult<Self> {
        let peer: SocketAddr = addr
            .parse()
            .map_err(|_| TransportError::InvalidAddress(addr.to_string()))?;

        let bind_addr = if peer.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr).map_err(|e| TransportError::Connect {
            name: format!("udp:{addr}"),
            source: e,
        })?;
        socket.connect(peer).map_err(|e| TransportError::Connect {
            name: format!("udp:{addr}"),
            source: e,
        })?;
        socket
            .set_nonblocking(true)
            .map_err(|e| TransportError::Connect {
                name: format!("udp:{addr}"),
                source: e,
            })?;

        info!(endpoint = %addr, "UDP channel opened");
        Ok(Self {
            name: format!("udp:{addr}"),
            socket,
            closed: AtomicBool::new(false),
        })
    }
}

impl SignalChannel for UdpChannel {
    fn send(&self, frame: &[u8; FRAME_LEN]) -> SendOutcome {
        if self.closed.load(Ordering::SeqCst) {
            return SendOutcome::Closed;
        }
        match self.socket.send(frame) {
            Ok(_) => SendOutcome::Sent,
            Err(e) if e.kind() == ErrorKind::WouldBlock => SendOutcome::BufferFull,
            Err(e) => SendOutcome::Error(e.to_string()),
        }
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(channel = %self.name, "UDP channel closed");
        }
        // The socket itself is released on drop.
    }

    fn name(&self) -> &str {
        &self.name
    }
}
