//! The OS-thread worker loop: pop, steal, run a quantum, park (§4.4).
//!
//! Each pooled worker runs [`run`] for the lifetime of the pool. Detached
//! actors (§4.4's dedicated-thread actors) run [`run_detached`] instead,
//! which owns its control block outright and blocks on the async
//! [`crate::mailbox::Mailbox::recv`] rather than polling a run queue.

// Layer 1: Standard library imports
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

// Layer 2: Third-party crate imports
use rand::seq::SliceRandom;
use rand::thread_rng;
use tracing::trace;

// Layer 3: Internal module imports
use crate::actor::control_block::ActorControlBlock;
use crate::error::ExitReason;
use crate::mailbox::TryRecvError;
use crate::util::ActorId;

use super::engine;
use super::handle::SchedulerHandle;
use super::pool::Shared;

/// Runs worker `index`'s loop until the pool is shut down and drained.
pub(crate) fn run(index: usize, shared: Arc<Shared>) {
    let runtime = SchedulerHandle::new(Arc::clone(&shared));
    loop {
        match next_runnable(index, &shared) {
            Some(id) => run_quantum(index, id, &shared, &runtime),
            None => {
                if shared.shutdown.load(Ordering::Acquire) && shared.registry.len() == 0 {
                    return;
                }
            }
        }
    }
}

/// Finds the next actor id to run: this worker's own queue first, then the
/// global injector, then stealing half of a randomly chosen sibling's
/// queue (K1), then short-sleep retries (K2), then a bounded park (K3).
fn next_runnable(index: usize, shared: &Arc<Shared>) -> Option<ActorId> {
    if let Some(id) = shared.queues[index].pop_own() {
        return Some(id);
    }
    if let Ok(id) = shared.injector_rx.try_recv() {
        return Some(id);
    }

    for _ in 0..shared.config.k1_steal_attempts {
        if let Some(id) = try_steal(index, shared) {
            return Some(id);
        }
        if let Ok(id) = shared.injector_rx.try_recv() {
            return Some(id);
        }
        std::hint::spin_loop();
    }

    for _ in 0..shared.config.k2_attempts {
        std::thread::sleep(shared.config.k2_sleep);
        if let Some(id) = shared.queues[index].pop_own() {
            return Some(id);
        }
        if let Ok(id) = shared.injector_rx.try_recv() {
            return Some(id);
        }
        if let Some(id) = try_steal(index, shared) {
            return Some(id);
        }
    }

    if shared.shutdown.load(Ordering::Acquire) {
        return None;
    }
    match shared.wake_rx.recv_timeout(shared.config.k3_park_timeout) {
        Ok(()) => shared.queues[index]
            .pop_own()
            .or_else(|| shared.injector_rx.try_recv().ok())
            .or_else(|| try_steal(index, shared)),
        Err(_) => None,
    }
}

fn try_steal(index: usize, shared: &Arc<Shared>) -> Option<ActorId> {
    let mut order: Vec<usize> = (0..shared.queues.len()).filter(|&i| i != index).collect();
    order.shuffle(&mut thread_rng());

    for victim in order {
        let mut stolen = shared.queues[victim].steal_half();
        if stolen.is_empty() {
            continue;
        }
        let first = stolen.remove(0);
        for id in stolen {
            shared.queues[index].push(id);
        }
        trace!(victim, worker = index, "stole work");
        return Some(first);
    }
    None
}

/// Runs up to `max_throughput` envelopes through the actor identified by
/// `id`, then returns it to this worker's local queue (preserving affinity)
/// if it still has work, or lets it go idle otherwise.
fn run_quantum(index: usize, id: ActorId, shared: &Arc<Shared>, runtime: &SchedulerHandle) {
    let Some(block) = shared.registry.block(id) else {
        return;
    };
    let mut acb = block.lock();

    let mut drained = false;
    let mut terminated = None;
    for _ in 0..shared.config.max_throughput {
        match acb.mailbox.try_recv() {
            Ok(envelope) => {
                acb.last_activity = Instant::now();
                match engine::step(&mut acb, envelope, runtime) {
                    engine::StepOutcome::Continue => {}
                    engine::StepOutcome::Terminated(reason) => {
                        terminated = Some(reason);
                        break;
                    }
                }
            }
            Err(TryRecvError::Empty) => {
                if let engine::StepOutcome::Terminated(reason) =
                    engine::expire_request_deadlines(&mut acb, runtime)
                {
                    terminated = Some(reason);
                }
                if terminated.is_none() {
                    if let Some(after) = acb.instance.timeout_after() {
                        if acb.last_activity.elapsed() >= after {
                            acb.last_activity = Instant::now();
                            if let engine::StepOutcome::Terminated(reason) = engine::fire_behavior_timeout(&mut acb, runtime) {
                                terminated = Some(reason);
                            }
                        }
                    }
                }
                drained = true;
                break;
            }
            Err(TryRecvError::Closed) => {
                terminated = Some(ExitReason::Unknown);
                drained = true;
                break;
            }
        }
    }

    if let Some(reason) = terminated {
        engine::finalize(&mut acb, reason, runtime);
        drop(acb);
        shared.registry.remove(id);
        return;
    }

    if drained {
        acb.mailbox.mark_idle();
    } else {
        shared.queues[index].push(id);
    }
}

/// Runs a detached actor's entire lifecycle on its own OS thread, blocking
/// on the async mailbox receive rather than sharing a worker pool quantum.
pub(crate) fn run_detached(mut acb: ActorControlBlock, runtime: SchedulerHandle, shared: Arc<Shared>) {
    let rt = match tokio::runtime::Builder::new_current_thread().enable_time().build() {
        Ok(rt) => rt,
        Err(_) => return,
    };

    let id = acb.id();
    rt.block_on(async move {
        loop {
            let envelope = match acb.mailbox.recv().await {
                Some(envelope) => envelope,
                None => break,
            };
            acb.last_activity = Instant::now();
            if let engine::StepOutcome::Terminated(reason) = engine::step(&mut acb, envelope, &runtime) {
                engine::finalize(&mut acb, reason, &runtime);
                break;
            }
        }
    });
    shared.registry.remove(id);
}
