//! Best-effort outbound channels and the fan-out publisher.
//!
//! A [`SignalChannel`] wraps one outbound endpoint; `send` never blocks
//! beyond a nonblocking-socket buffer-full condition and never raises.
//! The [`Publisher`] encodes a signal once and offers the frame to every
//! configured channel independently.

pub mod channel;
pub mod error;
pub mod ipc;
pub mod publisher;
pub mod udp;

pub use channel::{MockChannel, SendOutcome, SignalChannel};
pub use error::{TransportError, TransportResult};
#[cfg(unix)]
pub use ipc::IpcChannel;
pub use publisher::{ChannelStats, Publisher, PublisherConfig, PublishMode};
pub use udp::UdpChannel;
