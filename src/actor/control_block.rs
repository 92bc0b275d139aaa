//! The Actor Control Block (ACB) — everything the scheduler and execution
//! engine need to run one actor, independent of its concrete state type
//! (§3).
//!
//! An ACB owns the actor's mailbox, its type-erased running instance (via
//! [`ActorObject`]), its durable context bookkeeping, and the scheduling
//! flags the work-stealing scheduler reads and writes. The "state handle"
//! the design note in §9 refers to is [`ActorControlBlock::instance`]:
//! dropped the moment the actor terminates, taking its closures and
//! continuation tables with it.

// Layer 1: Standard library imports
use std::time::Instant;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::mailbox::{AtomicMetrics, Mailbox, MailboxSender};
use crate::util::ActorId;

use super::context::ActorContextState;
use super::instance::{ActorInstance, ActorObject};
use super::lifecycle::ActorLifecycle;
use super::traits::Actor;

/// The scheduling state the work-stealing scheduler reads to decide whether
/// an actor's control block belongs on a run queue (§3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingState {
    /// Has work (a non-empty mailbox) and is not currently running.
    Runnable,
    /// Currently executing on a worker.
    Running,
    /// Mailbox empty; nothing to do until the next send wakes it.
    BlockedOnMailbox,
    /// Terminated; eligible for removal from the registry.
    Terminated,
}

/// Everything the scheduler needs to run one actor.
pub(crate) struct ActorControlBlock {
    id: ActorId,
    pub(crate) mailbox: Mailbox<AtomicMetrics>,
    pub(crate) mailbox_sender: MailboxSender<AtomicMetrics>,
    pub(crate) context_state: ActorContextState,
    pub(crate) instance: Box<dyn ActorObject>,
    pub(crate) lifecycle: ActorLifecycle,
    pub(crate) scheduling: SchedulingState,
    /// Last time this actor processed an envelope, used to evaluate its
    /// behavior's inactivity timeout (§4.2) opportunistically when its
    /// mailbox is observed empty.
    pub(crate) last_activity: Instant,
}

impl ActorControlBlock {
    pub(crate) fn new(id: ActorId, instance: Box<dyn ActorObject>) -> Self {
        let (mailbox, mailbox_sender) = Mailbox::with_metrics(AtomicMetrics::new());
        Self {
            id,
            mailbox,
            mailbox_sender,
            context_state: ActorContextState::new(id),
            instance,
            lifecycle: ActorLifecycle::new(),
            scheduling: SchedulingState::Runnable,
            last_activity: Instant::now(),
        }
    }

    /// Allocates a fresh [`ActorId`] and wraps `actor` in an [`ActorInstance`]
    /// behind the type-erased [`ActorObject`] seam.
    pub(crate) fn spawn<A: Actor>(actor: A) -> Self {
        let id = ActorId::new();
        Self::new(id, Box::new(ActorInstance::new(actor)))
    }

    pub(crate) fn id(&self) -> ActorId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::context::ActorContext;
    use crate::actor::instance::ActorInstance;
    use crate::actor::traits::Actor;
    use crate::behavior::{Behavior, HandlerOutcome};

    struct NoOp;
    impl Actor for NoOp {
        fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
            Behavior::new().on0(|_s, _c| Ok(HandlerOutcome::NoReply))
        }
    }

    #[test]
    fn test_new_control_block_is_runnable() {
        let id = ActorId::new();
        let acb = ActorControlBlock::new(id, Box::new(ActorInstance::new(NoOp)));
        assert_eq!(acb.scheduling, SchedulingState::Runnable);
        assert_eq!(acb.id(), id);
    }
}
