//! Deadline bookkeeping for a single actor's outstanding correlated requests
//! (§4.6, §5).
//!
//! Responses are delivered through
//! [`crate::actor::context::ActorContextState`]'s `await_stack`/`then_pending`
//! tables via `resolve_correlation` — this module only tracks *when* an
//! outstanding id should time out, so the scheduler's per-quantum sweep
//! (`scheduler::engine::expire_request_deadlines`) can synthesize the
//! canonical `request_timeout` outcome through that same path once a
//! deadline elapses with no response.

// Layer 1: Standard library imports
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::error::RuntimeError;
use crate::message::CorrelationId;
use crate::payload::Payload;

/// The result a correlated request eventually resolves with.
pub type RequestOutcome = Result<Payload, RuntimeError>;

/// Every request carries a deadline (§5); `ActorContext::issue_request` uses
/// this for every `request_then`/`request_await` send.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-actor min-heap of outstanding request deadlines, keyed by correlation
/// id.
///
/// Holds no response state of its own — every id pushed here is expected to
/// also be tracked in [`crate::actor::context::ActorContextState`]'s
/// await/then tables. An id popped here that `resolve_correlation` no
/// longer recognizes already got a real response before its deadline swept;
/// the caller treats that as a no-op (lazy deletion).
pub(crate) struct DeadlineTable {
    deadlines: BinaryHeap<Reverse<(Instant, CorrelationId)>>,
}

impl DeadlineTable {
    /// Creates an empty table.
    pub(crate) fn new() -> Self {
        Self {
            deadlines: BinaryHeap::new(),
        }
    }

    /// Tracks `id`'s deadline.
    pub(crate) fn track(&mut self, id: CorrelationId, deadline: Instant) {
        self.deadlines.push(Reverse((deadline, id)));
    }

    /// Returns every id whose deadline has elapsed as of `now`, removing
    /// them from the table.
    pub(crate) fn expire_due(&mut self, now: Instant) -> Vec<CorrelationId> {
        let mut due = Vec::new();
        loop {
            match self.deadlines.peek() {
                Some(Reverse((deadline, _))) if *deadline <= now => {
                    if let Some(Reverse((_, id))) = self.deadlines.pop() {
                        due.push(id);
                    }
                }
                _ => break,
            }
        }
        due
    }

    /// Drops every tracked deadline without resolving anything. Used once
    /// the owning actor's await/then bookkeeping has itself been drained
    /// (restart, termination) so stale entries don't linger for a later
    /// sweep to find.
    pub(crate) fn clear(&mut self) {
        self.deadlines.clear();
    }

    /// Number of deadlines still tracked.
    pub(crate) fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// `true` if no deadlines are tracked.
    pub(crate) fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

impl Default for DeadlineTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_due_returns_elapsed_ids() {
        let mut table = DeadlineTable::new();
        let past = Instant::now() - Duration::from_secs(1);
        table.track(1, past);

        let due = table.expire_due(Instant::now());
        assert_eq!(due, vec![1]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_expire_due_ignores_future_deadlines() {
        let mut table = DeadlineTable::new();
        let future = Instant::now() + Duration::from_secs(60);
        table.track(1, future);

        assert!(table.expire_due(Instant::now()).is_empty());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_expire_due_pops_only_elapsed_entries_in_order() {
        let mut table = DeadlineTable::new();
        let now = Instant::now();
        table.track(1, now - Duration::from_secs(2));
        table.track(2, now - Duration::from_secs(1));
        table.track(3, now + Duration::from_secs(60));

        let due = table.expire_due(now);
        assert_eq!(due, vec![1, 2]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut table = DeadlineTable::new();
        table.track(1, Instant::now());
        table.track(2, Instant::now());
        table.clear();
        assert!(table.is_empty());
    }
}
