//! System-originated envelope payloads: down-notifications, exit-messages,
//! and delivery failures synthesized by the supervision graph and the
//! mailbox itself (§3 "Exit Reason", §4.5 step 2, §4.7).
//!
//! These travel as ordinary [`crate::message::Envelope`]s — there is no
//! separate system channel — but their payload is always a single field of
//! one of the types below, sent on the [`crate::message::Priority::Urgent`]
//! band. The execution engine recognizes them by field type before falling
//! through to ordinary behavior matching (§4.5 step 2).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::error::ExitReason;
use crate::util::ActorId;

/// Delivered to every actor monitoring `who` once it terminates (§4.7).
#[derive(Debug, Clone)]
pub struct Down {
    /// The actor that terminated.
    pub who: ActorId,
    /// Its exit reason.
    pub reason: ExitReason,
}

/// Delivered to every actor linked to `who` when it terminates with a
/// non-normal reason (§4.7).
#[derive(Debug, Clone)]
pub struct Exit {
    /// The actor that terminated.
    pub who: ActorId,
    /// Its exit reason.
    pub reason: ExitReason,
}
