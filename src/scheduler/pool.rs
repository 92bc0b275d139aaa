//! The work-stealing worker pool itself: thread lifecycle, the shared state
//! every worker and every [`SchedulerHandle`] reaches into, and the public
//! entry point ([`SchedulerPool::new`]) for starting one (§4.4).

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

// Layer 2: Third-party crate imports
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::info;

// Layer 3: Internal module imports
use crate::actor::control_block::ActorControlBlock;
use crate::actor::traits::Actor;
use crate::util::ActorId;

use super::config::SchedulerConfig;
use super::engine;
use super::handle::SchedulerHandle;
use super::queue::LocalQueue;
use super::registry::ActorRegistry;
use super::worker;

/// State shared by every worker thread and every [`SchedulerHandle`] clone.
pub(crate) struct Shared {
    pub(crate) registry: ActorRegistry,
    pub(crate) queues: Vec<Arc<LocalQueue>>,
    pub(crate) injector_tx: Sender<ActorId>,
    pub(crate) injector_rx: Receiver<ActorId>,
    pub(crate) wake_tx: Sender<()>,
    pub(crate) wake_rx: Receiver<()>,
    pub(crate) shutdown: AtomicBool,
    pub(crate) config: SchedulerConfig,
}

impl Shared {
    pub(crate) fn schedule(&self, id: ActorId) {
        if self.shutdown.load(Ordering::Acquire) {
            return;
        }
        let _ = self.injector_tx.send(id);
        let _ = self.wake_tx.send(());
    }

    pub(crate) fn register(&self, acb: ActorControlBlock) {
        let id = acb.id();
        let sender = acb.mailbox_sender.clone();
        self.registry.insert(id, sender, acb);
    }

    pub(crate) fn spawn<A: Actor>(self: &Arc<Self>, actor: A, runtime: &SchedulerHandle) -> ActorId {
        let acb = ActorControlBlock::spawn(actor);
        let id = acb.id();
        self.register(acb);
        if let Some(block) = self.registry.block(id) {
            let mut guard = block.lock();
            engine::start(&mut guard, runtime);
        }
        id
    }

    pub(crate) fn spawn_detached<A: Actor>(self: &Arc<Self>, actor: A, runtime: SchedulerHandle) -> ActorId {
        let mut acb = ActorControlBlock::spawn(actor);
        let id = acb.id();
        self.registry.insert_sender(id, acb.mailbox_sender.clone());
        engine::start(&mut acb, &runtime);

        let registry_drop = Arc::clone(self);
        std::thread::spawn(move || worker::run_detached(acb, runtime, registry_drop));
        id
    }

    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        for _ in 0..self.queues.len() {
            let _ = self.wake_tx.send(());
        }
    }
}

/// Owns a running pool's worker threads and the [`Shared`] state they share
/// with every [`SchedulerHandle`] cloned from it.
pub struct SchedulerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl SchedulerPool {
    /// Starts `config.worker_count` OS worker threads.
    pub fn new(config: SchedulerConfig) -> Self {
        let worker_count = config.worker_count;
        let (injector_tx, injector_rx) = unbounded();
        let (wake_tx, wake_rx) = unbounded();
        let queues = (0..worker_count).map(|_| Arc::new(LocalQueue::new())).collect();

        let shared = Arc::new(Shared {
            registry: ActorRegistry::new(),
            queues,
            injector_tx,
            injector_rx,
            wake_tx,
            wake_rx,
            shutdown: AtomicBool::new(false),
            config,
        });

        let workers = (0..worker_count)
            .map(|index| Self::spawn_worker_thread(index, Arc::clone(&shared)))
            .collect();

        info!(worker_count, "scheduler pool started");
        Self { shared, workers }
    }

    #[allow(clippy::expect_used)]
    fn spawn_worker_thread(index: usize, shared: Arc<Shared>) -> JoinHandle<()> {
        std::thread::Builder::new()
            .name(format!("airssys-rt-worker-{index}"))
            .spawn(move || worker::run(index, shared))
            .expect("failed to spawn scheduler worker thread")
    }

    /// Produces a cloneable handle into this pool.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle::new(Arc::clone(&self.shared))
    }

    /// Signals shutdown and blocks until every worker thread has exited.
    pub fn shutdown(self) {
        self.shared.shutdown();
        for worker in self.workers {
            let _ = worker.join();
        }
    }

    /// Number of actors currently registered with the pool.
    pub fn actor_count(&self) -> usize {
        self.shared.registry.len()
    }
}
