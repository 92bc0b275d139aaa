//! Wire messages for the credit-based streaming handshake (§4.9).
//!
//! These travel as ordinary envelope payloads between whatever actors play
//! the source/stage/sink roles — there is no separate transport. A stream
//! session is identified by a [`StreamId`] minted by the downstream side
//! when it opens the stream.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::error::RuntimeError;
use crate::payload::FieldValue;

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one open stream session between a pair of actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(u64);

impl StreamId {
    /// Mints a fresh, process-unique stream id. Always called by the
    /// downstream side of a handshake (§4.9).
    pub fn new() -> Self {
        Self(NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}

/// Sent by the downstream side to open a session, carrying the initial
/// credit it grants upstream.
#[derive(Debug, Clone)]
pub struct OpenStream {
    pub stream: StreamId,
    pub initial_credit: usize,
}

/// Upstream's acknowledgement that a session is open and ready for data.
#[derive(Debug, Clone)]
pub struct StreamAck {
    pub stream: StreamId,
}

/// One batch of elements, debiting `batch.len()` from upstream's running
/// credit balance (§4.9's core invariant: never emit past that balance).
#[derive(Debug, Clone)]
pub struct StreamData<T: FieldValue> {
    pub stream: StreamId,
    pub batch: Vec<T>,
}

/// Grants additional credit to the upstream side, typically sized to the
/// downstream's buffer headroom.
#[derive(Debug, Clone)]
pub struct CreditGrant {
    pub stream: StreamId,
    pub credit: usize,
}

/// Clean end of stream: no more [`StreamData`] will follow.
#[derive(Debug, Clone)]
pub struct EndOfStream {
    pub stream: StreamId,
}

/// Either side may abort with an error; the recipient propagates it onward
/// (upstream sees it as cancellation, downstream as an errored end-of-stream).
#[derive(Debug, Clone)]
pub struct StreamAbort {
    pub stream: StreamId,
    pub error: RuntimeError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_id_is_unique_per_call() {
        let a = StreamId::new();
        let b = StreamId::new();
        assert_ne!(a, b);
    }
}
