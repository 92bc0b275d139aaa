//! The scheduler's actor directory: where control blocks live and how a
//! [`super::handle::SchedulerHandle`] finds a mailbox sender to deliver to
//! (§4.4).
//!
//! Two maps share the same key deliberately. `senders` lets `send` reach an
//! actor's mailbox without contending on the control block's lock — sending
//! is the hot path, on every worker, for every message. `blocks` is only
//! touched by the worker currently running that actor (or by `spawn`/removal
//! at the edges), so it pays for a lock but never contends in practice.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::actor::control_block::ActorControlBlock;
use crate::mailbox::{AtomicMetrics, MailboxSender};
use crate::util::ActorId;

/// Shared directory of every actor currently known to the scheduler.
pub(crate) struct ActorRegistry {
    senders: DashMap<ActorId, MailboxSender<AtomicMetrics>>,
    blocks: DashMap<ActorId, Arc<Mutex<ActorControlBlock>>>,
}

impl ActorRegistry {
    pub(crate) fn new() -> Self {
        Self {
            senders: DashMap::new(),
            blocks: DashMap::new(),
        }
    }

    pub(crate) fn insert(&self, id: ActorId, sender: MailboxSender<AtomicMetrics>, block: ActorControlBlock) {
        self.senders.insert(id, sender);
        self.blocks.insert(id, Arc::new(Mutex::new(block)));
    }

    /// Registers a sender without a pooled control block, for a detached
    /// actor whose control block lives on its own dedicated thread instead
    /// of the shared `blocks` map.
    pub(crate) fn insert_sender(&self, id: ActorId, sender: MailboxSender<AtomicMetrics>) {
        self.senders.insert(id, sender);
    }

    pub(crate) fn sender(&self, id: ActorId) -> Option<MailboxSender<AtomicMetrics>> {
        self.senders.get(&id).map(|entry| entry.clone())
    }

    pub(crate) fn block(&self, id: ActorId) -> Option<Arc<Mutex<ActorControlBlock>>> {
        self.blocks.get(&id).map(|entry| Arc::clone(&entry))
    }

    /// Drops both halves of an actor's registration. Called once its
    /// control block has reached [`crate::actor::control_block::SchedulingState::Terminated`].
    pub(crate) fn remove(&self, id: ActorId) {
        self.senders.remove(&id);
        self.blocks.remove(&id);
    }

    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }

    pub(crate) fn contains(&self, id: ActorId) -> bool {
        self.senders.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::traits::Actor;
    use crate::behavior::Behavior;

    struct Noop;
    impl Actor for Noop {
        fn initial_behavior(&mut self, _ctx: &mut crate::actor::context::ActorContext<'_>) -> Behavior<Self> {
            Behavior::new()
        }
    }

    #[test]
    fn test_insert_and_lookup_round_trip() {
        let registry = ActorRegistry::new();
        let block = ActorControlBlock::spawn(Noop);
        let id = block.id();
        let sender = block.mailbox_sender.clone();

        registry.insert(id, sender, block);

        assert!(registry.sender(id).is_some());
        assert!(registry.block(id).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_drops_both_halves() {
        let registry = ActorRegistry::new();
        let block = ActorControlBlock::spawn(Noop);
        let id = block.id();
        let sender = block.mailbox_sender.clone();
        registry.insert(id, sender, block);

        registry.remove(id);

        assert!(registry.sender(id).is_none());
        assert!(registry.block(id).is_none());
        assert!(!registry.contains(id));
    }
}
