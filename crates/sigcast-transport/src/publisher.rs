//! Fan-out publisher: encode once, offer to every channel.

use crate::channel::{SendOutcome, SignalChannel};
use crate::error::TransportResult;
use crate::udp::UdpChannel;
use serde::{Deserialize, Serialize};
use sigcast_codec::{encode_into, FRAME_LEN};
use sigcast_core::Signal;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Which outbound channels the publisher establishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishMode {
    /// No channels; publish is a no-op.
    None,
    IpcOnly,
    UdpOnly,
    #[default]
    IpcAndUdp,
}

impl PublishMode {
    #[must_use]
    pub fn wants_ipc(self) -> bool {
        matches!(self, Self::IpcOnly | Self::IpcAndUdp)
    }

    #[must_use]
    pub fn wants_udp(self) -> bool {
        matches!(self, Self::UdpOnly | Self::IpcAndUdp)
    }
}

/// Publisher channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    #[serde(default)]
    pub mode: PublishMode,
    /// Unix socket path of the local consumer. When unset, derived
    /// from the stream id under the default socket directory.
    #[serde(default)]
    pub ipc_path: Option<String>,
    /// UDP endpoint of the network consumer.
    #[serde(default = "default_udp_addr")]
    pub udp_addr: String,
    /// Stream identifier shared with consumers; parameterizes the
    /// default IPC socket path.
    #[serde(default = "default_stream_id")]
    pub stream_id: u32,
}

fn default_udp_addr() -> String {
    "127.0.0.1:40123".to_string()
}

fn default_stream_id() -> u32 {
    1002
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            mode: PublishMode::default(),
            ipc_path: None,
            udp_addr: default_udp_addr(),
            stream_id: default_stream_id(),
        }
    }
}

impl PublisherConfig {
    /// Socket path used for the IPC channel.
    #[must_use]
    pub fn effective_ipc_path(&self) -> PathBuf {
        match &self.ipc_path {
            Some(path) => PathBuf::from(path),
            None => std::env::temp_dir().join(format!("sigcast-{}.sock", self.stream_id)),
        }
    }
}

/// Per-channel send counters.
#[derive(Debug, Default)]
pub struct ChannelStats {
    pub sent: AtomicU64,
    pub dropped: AtomicU64,
}

impl ChannelStats {
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Owns the configured channels and a reusable encode scratch buffer.
///
/// `publish` takes `&mut self`: the scratch buffer makes a publisher
/// single-threaded by construction, which matches the one-callback-
/// thread-per-strategy driving model. A failure on one channel never
/// prevents the offer to the others.
pub struct Publisher {
    channels: Vec<(Box<dyn SignalChannel>, ChannelStats)>,
    scratch: [u8; FRAME_LEN],
    shut_down: bool,
}

impl Publisher {
    /// Publisher with no channels; every publish is a no-op.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
            scratch: [0u8; FRAME_LEN],
            shut_down: false,
        }
    }

    /// Add an already-open channel.
    pub fn add_channel(&mut self, channel: Box<dyn SignalChannel>) {
        debug!(channel = channel.name(), "Channel registered");
        self.channels.push((channel, ChannelStats::default()));
    }

    /// Establish all channels the config asks for.
    ///
    /// A channel that fails to open is logged and skipped; the others
    /// still come up. The caller can inspect `channel_count` if it
    /// needs to treat "nothing opened" specially.
    pub fn from_config(config: &PublisherConfig) -> TransportResult<Self> {
        let mut publisher = Self::empty();

        if config.mode == PublishMode::None {
            info!("Publish mode is none; signals will not be emitted");
            return Ok(publisher);
        }

        if config.mode.wants_ipc() {
            let path = config.effective_ipc_path();
            #[cfg(unix)]
            match crate::ipc::IpcChannel::open(&path) {
                Ok(channel) => publisher.add_channel(Box::new(channel)),
                Err(e) => warn!(path = %path.display(), error = %e, "IPC channel unavailable"),
            }
            #[cfg(not(unix))]
            warn!(path = %path.display(), "IPC channels are not supported on this platform");
        }

        if config.mode.wants_udp() {
            match UdpChannel::open(&config.udp_addr) {
                Ok(channel) => publisher.add_channel(Box::new(channel)),
                Err(e) => warn!(addr = %config.udp_addr, error = %e, "UDP channel unavailable"),
            }
        }

        info!(
            mode = ?config.mode,
            stream_id = config.stream_id,
            channels = publisher.channel_count(),
            "Publisher started"
        );
        Ok(publisher)
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Encode the signal once and offer the frame to every channel.
    pub fn publish(&mut self, signal: &Signal) {
        if self.channels.is_empty() {
            return;
        }

        encode_into(signal, &mut self.scratch);

        for (channel, stats) in &self.channels {
            match channel.send(&self.scratch) {
                SendOutcome::Sent => {
                    stats.sent.fetch_add(1, Ordering::Relaxed);
                }
                outcome => {
                    stats.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        channel = channel.name(),
                        action = %signal.action,
                        ?outcome,
                        "Frame dropped"
                    );
                }
            }
        }
    }

    /// Per-channel counters, keyed by channel name.
    pub fn stats(&self) -> impl Iterator<Item = (&str, &ChannelStats)> {
        self.channels
            .iter()
            .map(|(channel, stats)| (channel.name(), stats))
    }

    /// Close every channel. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        for (channel, stats) in &self.channels {
            channel.close();
            info!(
                channel = channel.name(),
                sent = stats.sent(),
                dropped = stats.dropped(),
                "Channel shut down"
            );
        }
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
