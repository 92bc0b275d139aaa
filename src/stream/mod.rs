//! Credit-based streaming between actors (§4.9).
//!
//! Three roles compose into a pipeline, each an ordinary [`crate::actor::Actor`]:
//!
//! - [`source::Source`] — no input, produces elements from a generator.
//! - [`stage::Stage`] — one input, one output, transforms each element.
//! - [`sink::Sink`] — input only, no output, finalizes on clean completion
//!   or abort.
//!
//! All three speak the same handshake, defined in [`protocol`]: the
//! downstream side opens a session with [`protocol::OpenStream`] carrying
//! its initial credit, upstream acks with [`protocol::StreamAck`], data
//! flows as [`protocol::StreamData`] batches debited against the running
//! credit balance, and either [`protocol::EndOfStream`] or
//! [`protocol::StreamAbort`] closes the session. Upstream never emits more
//! elements than it currently holds credit for — the core invariant this
//! module exists to enforce.

pub mod protocol;
pub mod sink;
pub mod source;
pub mod stage;

pub use protocol::{
    CreditGrant, EndOfStream, OpenStream, StreamAbort, StreamAck, StreamData, StreamId,
};
pub use sink::Sink;
pub use source::Source;
pub use stage::Stage;
