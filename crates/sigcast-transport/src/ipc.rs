//! Local IPC channel over a Unix datagram socket.

#![cfg(unix)]

use crate::channel::{SendOutcome, SignalChannel};
use crate::error::{TransportError, TransportResult};
use sigcast_codec::FRAME_LEN;
use std::io::ErrorKind;
use std::os::unix::net::UnixDatagram;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Connected, nonblocking Unix-datagram endpoint.
///
/// The low-latency local transport: same best-effort semantics as UDP
/// but without the network stack. The consumer owns the socket path;
/// this side only connects to it.
pub struct IpcChannel {
    name: String,
    socket: UnixDatagram,
    closed: AtomicBool,
}

impl IpcChannel {
    /// Open a channel to the datagram socket at `path`.
    pub fn open(path: impl AsRef<Path>) -> TransportResult<Self> {
        let path = path.as_ref();
        let name = format!("ipc:{}", path.display());

        let socket = UnixDatagram::unbound().map_err(|e| TransportError::Connect {
            name: name.clone(),
            source: e,
        })?;
        socket.connect(path).map_err(|e| TransportError::Connect {
            name: name.clone(),
            source: e,
        })?;
        socket
            .set_nonblocking(true)
            .map_err(|e| TransportError::Connect {
                name: name.clone(),
                source: e,
            })?;

        info!(endpoint = %path.display(), "IPC channel opened");
        Ok(Self {
            name,
            socket,
            closed: AtomicBool::new(false),
        })
    }
}

impl SignalChannel for IpcChannel {
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
            debug!(channel = %self.name, "IPC channel closed");
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_fails_without_consumer() {
        let result = IpcChannel::open("/tmp/sigcast-test-nonexistent.sock");
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }

    #[test]
    fn test_send_to_local_consumer() {
        let dir = std::env::temp_dir().join(format!("sigcast-ipc-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("consumer.sock");
        let _ = std::fs::remove_file(&path);

        let consumer = UnixDatagram::bind(&path).unwrap();
        let channel = IpcChannel::open(&path).unwrap();

        let frame = [0x5Au8; FRAME_LEN];
        assert_eq!(channel.send(&frame), SendOutcome::Sent);

        let mut buf = [0u8; FRAME_LEN];
        let n = consumer.recv(&mut buf).unwrap();
        assert_eq!(n, FRAME_LEN);
        assert_eq!(buf, frame);

        let _ = std::fs::remove_file(&path);
    }
}
