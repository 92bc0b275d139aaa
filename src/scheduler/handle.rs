//! [`SchedulerHandle`]: the cloneable, thread-safe face of a running pool
//! that actor code, promises, and the execution engine use to send
//! envelopes and spawn new actors, without seeing any worker internals.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::context::RuntimeHandle;
use crate::actor::control_block::ActorControlBlock;
use crate::actor::traits::Actor;
use crate::error::{ErrorKind, RuntimeError};
use crate::message::Envelope;
use crate::util::ActorId;

use super::pool::Shared;

/// A cheap-to-clone reference to a scheduler pool. Every actor's
/// [`crate::actor::context::ActorContext`] and every [`crate::promise::ResponsePromise`]
/// holds one of these to reach back into the runtime.
#[derive(Clone)]
pub struct SchedulerHandle {
    pub(crate) shared: Arc<Shared>,
}

impl SchedulerHandle {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Registers `acb` with the pool and marks it runnable, without running
    /// its `pre_start`/initial behavior (callers that need that should use
    /// [`super::pool::SchedulerPool::spawn`] instead; this is the low-level
    /// primitive it and detached-actor bootstrap share).
    pub(crate) fn register(&self, acb: ActorControlBlock) {
        self.shared.register(acb);
    }

    /// Spawns `actor` onto this pool's run queues, running `pre_start` and
    /// installing its initial behavior first.
    pub fn spawn<A: Actor>(&self, actor: A) -> ActorId {
        self.shared.spawn(actor, self)
    }

    /// Spawns `actor` onto a dedicated OS thread instead of the shared pool,
    /// for actors whose handler does its own (possibly long) blocking work
    /// (§4.4).
    pub fn spawn_detached<A: Actor>(&self, actor: A) -> ActorId {
        self.shared.spawn_detached(actor, self.clone())
    }

    /// Requests an orderly shutdown of the pool: no further actors are
    /// scheduled once their mailboxes drain, and worker threads exit once
    /// every actor has terminated.
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }

    /// Number of actors currently registered with the pool.
    pub fn actor_count(&self) -> usize {
        self.shared.registry.len()
    }
}

impl RuntimeHandle for SchedulerHandle {
    fn send(&self, target: ActorId, envelope: Envelope) -> Result<(), RuntimeError> {
        let sender = self.shared.registry.sender(target).ok_or_else(|| {
            RuntimeError::with_context(ErrorKind::UnexpectedMessage, format!("unknown actor {target}"))
        })?;
        let was_empty = sender
            .send(envelope)
            .map_err(|_| RuntimeError::with_context(ErrorKind::RequestReceiverDown, format!("actor {target} mailbox closed")))?;
        if was_empty {
            self.shared.schedule(target);
        }
        Ok(())
    }

    fn clone_handle(&self) -> Arc<dyn RuntimeHandle> {
        Arc::new(self.clone())
    }
}
