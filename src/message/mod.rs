//! The universal envelope that carries type-erased payloads between actors.
//!
//! Unlike the generic-over-message-type design this module once had, every
//! message in the system now travels as the same concrete [`Envelope`] type,
//! wrapping a [`crate::payload::Payload`]. Behavior matching (§4.3) inspects
//! the payload's field types at dispatch time instead of Rust's type system
//! picking an overload at compile time.

pub mod envelope;

pub use envelope::{CorrelationId, Envelope, Priority, NO_CORRELATION};
