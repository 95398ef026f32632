//! The outbound channel abstraction.
//!
//! Trait-based so the publisher can fan out over heterogeneous
//! endpoints and tests can inject mock channels.

use sigcast_codec::FRAME_LEN;

/// Result of a best-effort send.
///
/// None of these variants is an error to the caller; the publisher
/// counts non-`Sent` outcomes and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Frame handed to the endpoint.
    Sent,
    /// Local socket buffer full; frame dropped.
    BufferFull,
    /// Channel already closed; frame dropped.
    Closed,
    /// Endpoint rejected the send; frame dropped.
    Error(String),
}

impl SendOutcome {
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// One outbound signal endpoint.
///
/// Implementations must never block the caller beyond a bounded local
/// buffer-full condition and must never panic on send failure.
pub trait SignalChannel: Send + Sync {
    /// Offer one encoded frame to the endpoint.
    fn send(&self, frame: &[u8; FRAME_LEN]) -> SendOutcome;

    /// Release the endpoint. Idempotent; sends after close return
    /// [`SendOutcome::Closed`].
    fn close(&self);

    /// Short channel name for logs and counters.
    fn name(&self) -> &str;
}

/// In-memory channel for tests.
///
/// Records every offered frame and returns a configurable outcome.
#[derive(Debug)]
pub struct MockChannel {
    name: String,
    frames: parking_lot::Mutex<Vec<[u8; FRAME_LEN]>>,
    next_outcome: parking_lot::Mutex<SendOutcome>,
    closed: std::sync::atomic::AtomicBool,
}

impl MockChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: parking_lot::Mutex::new(Vec::new()),
            next_outcome: parking_lot::Mutex::new(SendOutcome::Sent),
            closed: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Configure the outcome returned by subsequent sends.
    pub fn set_next_outcome(&self, outcome: SendOutcome) {
        *self.next_outcome.lock() = outcome;
    }

    /// Frames offered so far (including ones that "failed").
    pub fn offered(&self) -> Vec<[u8; FRAME_LEN]> {
        self.frames.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl SignalChannel for MockChannel {
    fn send(&self, frame: &[u8; FRAME_LEN]) -> SendOutcome {
        if self.is_closed() {
            return SendOutcome::Closed;
        }
        let outcome = self.next_outcome.lock().clone();
        if outcome.is_sent() {
            self.frames.lock().push(*frame);
        }
        outcome
    }

    fn close(&self) {
        self.closed.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_sent_frames() {
        let channel = MockChannel::new("mock");
        let frame = [7u8; FRAME_LEN];
        assert_eq!(channel.send(&frame), SendOutcome::Sent);
        assert_eq!(channel.offered(), vec![frame]);
    }

    #[test]
    fn test_mock_honours_configured_outcome() {
        let channel = MockChannel::new("mock");
        channel.set_next_outcome(SendOutcome::BufferFull);
        assert_eq!(channel.send(&[0u8; FRAME_LEN]), SendOutcome::BufferFull);
        assert!(channel.offered().is_empty());
    }

    #[test]
    fn test_send_after_close_is_closed() {
        let channel = MockChannel::new("mock");
        channel.close();
        channel.close(); // idempotent
        assert_eq!(channel.send(&[0u8; FRAME_LEN]), SendOutcome::Closed);
    }
}
