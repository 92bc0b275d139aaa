//! The universal message envelope carried through mailboxes and the scheduler.
//!
//! Every message in the system, regardless of its payload's concrete Rust
//! type, travels as an [`Envelope`]. The envelope is what makes the actor
//! model's type erasure (see [`crate::payload`]) tractable: it pairs the
//! opaque [`Payload`] with the routing metadata a mailbox, a behavior match,
//! or a request/response table needs without ever looking inside the payload
//! itself.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::payload::Payload;
use crate::util::ActorId;

/// Mailbox priority band. Urgent envelopes are always dequeued before normal
/// ones; within a band, delivery is FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    /// Ordinary traffic.
    #[default]
    Normal,
    /// System/control traffic (exit signals, down notifications, kill).
    /// Also used to reset an actor's inactivity timeout per the decision in
    /// the timeout-reset design note.
    Urgent,
}

/// A correlation id pairs a request with its eventual response.
///
/// `0` means fire-and-forget: no response is expected and none will be
/// correlated back. Positive values are minted by the sending actor's
/// request table (see [`crate::request`]) and are only unique within that
/// actor's own outstanding requests.
pub type CorrelationId = i64;

/// No correlation — the envelope is a one-way send.
pub const NO_CORRELATION: CorrelationId = 0;

/// A message in flight: an opaque [`Payload`] plus everything the runtime
/// needs to route, match, and correlate it, without interpreting the
/// payload's contents.
///
/// # Forwarding stack
///
/// [`Envelope::forward_to`] pushes the current reply target onto
/// `forwarding_stack` before redirecting the envelope to a new recipient.
/// When that recipient eventually replies, the reply walks back down the
/// stack one frame at a time — this is what makes delegation (§4.8)
/// transparent to the original sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// The type-erased message body.
    pub payload: Payload,
    /// The actor that sent this envelope, if any (a system-originated
    /// envelope, e.g. a scheduled timeout, has no sender).
    pub sender: Option<ActorId>,
    /// Non-zero for requests and their responses; `0` for fire-and-forget.
    pub correlation_id: CorrelationId,
    /// Mailbox priority band.
    pub priority: Priority,
    /// Reply targets pushed by delegation, most recent last.
    pub forwarding_stack: Vec<ActorId>,
    /// When this envelope was created.
    pub timestamp: DateTime<Utc>,
}

impl Envelope {
    /// Builds a fire-and-forget envelope with no sender.
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            sender: None,
            correlation_id: NO_CORRELATION,
            priority: Priority::Normal,
            forwarding_stack: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Builder: attach the sender's id.
    pub fn with_sender(mut self, sender: ActorId) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Builder: mark this envelope as a request awaiting `correlation_id`.
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    /// Builder: set the mailbox priority band.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// `true` if this envelope expects a correlated response.
    pub fn is_request(&self) -> bool {
        self.correlation_id != NO_CORRELATION
    }

    /// Pushes `original_recipient` onto the forwarding stack before the
    /// envelope is redirected elsewhere — see delegation (§4.8).
    pub fn push_forward(&mut self, original_recipient: ActorId) {
        self.forwarding_stack.push(original_recipient);
    }

    /// Pops the most recent forwarding frame, if any.
    pub fn pop_forward(&mut self) -> Option<ActorId> {
        self.forwarding_stack.pop()
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Envelope{{corr={}, priority={:?}, fields={}}}",
            self.correlation_id,
            self.priority,
            self.payload.len()
        )
    }
}
