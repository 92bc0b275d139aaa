//! Actor mailbox: a two-band priority queue with a private stash.
//!
//! Each actor owns exactly one [`Mailbox`]; every other actor (and the
//! runtime itself) holds a cloned [`MailboxSender`]. Delivery order:
//!
//! 1. The urgent band, FIFO.
//! 2. Envelopes reinjected at the head of the normal band by
//!    [`Mailbox::reinject_stash`], oldest stashed first.
//! 3. The normal band, FIFO.
//!
//! The stash itself (§4.2 "skip" semantics — envelopes a behavior declined
//! to handle) is never served directly: `stash()` only appends to it, and
//! nothing drains it until [`Mailbox::reinject_stash`] is called on the
//! triggering `become`/rotation event. Serving it on every empty-bands tick
//! instead would make a behavior that re-declines its own stashed envelope
//! busy-loop forever, never reaching the idle/`blocked_on_mailbox` state
//! (§5) — the envelope only deserves another look once the behavior that
//! stashed it has actually changed.
//!
//! # Scheduling signal
//!
//! The scheduler only needs to enqueue an actor for a run when its mailbox
//! transitions from empty to non-empty — enqueueing on every send would
//! flood the run queue with duplicate work items for an actor already
//! scheduled. [`MailboxSender::send`] reports this transition with a single
//! atomic compare-exchange so it fires exactly once per transition.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::sync::mpsc;

// Layer 3: Internal module imports
pub mod metrics;
pub mod traits;

pub use metrics::{AtomicMetrics, MetricsRecorder};
pub use traits::{MailboxError, TryRecvError};

use crate::message::{Envelope, Priority};

/// The receiving half of an actor's mailbox. Owned exclusively by the
/// actor's execution slot; never cloned.
pub struct Mailbox<R: MetricsRecorder = AtomicMetrics> {
    urgent_rx: mpsc::UnboundedReceiver<Envelope>,
    normal_rx: mpsc::UnboundedReceiver<Envelope>,
    /// Envelopes moved to the head of the normal band by
    /// [`Mailbox::reinject_stash`]; served ahead of `normal_rx`.
    reinjected: VecDeque<Envelope>,
    /// Envelopes a behavior declined to handle, parked here until a
    /// `become`/rotation event reinjects them.
    stash: VecDeque<Envelope>,
    scheduled: Arc<AtomicBool>,
    metrics: Arc<R>,
}

/// A cloneable handle for sending envelopes into a [`Mailbox`].
#[derive(Clone)]
pub struct MailboxSender<R: MetricsRecorder = AtomicMetrics> {
    urgent_tx: mpsc::UnboundedSender<Envelope>,
    normal_tx: mpsc::UnboundedSender<Envelope>,
    scheduled: Arc<AtomicBool>,
    metrics: Arc<R>,
}

impl<R: MetricsRecorder> Mailbox<R> {
    /// Creates a mailbox/sender pair using the given metrics recorder.
    pub fn with_metrics(metrics: R) -> (Self, MailboxSender<R>) {
        let (urgent_tx, urgent_rx) = mpsc::unbounded_channel();
        let (normal_tx, normal_rx) = mpsc::unbounded_channel();
        let metrics = Arc::new(metrics);
        let scheduled = Arc::new(AtomicBool::new(false));

        let mailbox = Self {
            urgent_rx,
            normal_rx,
            reinjected: VecDeque::new(),
            stash: VecDeque::new(),
            scheduled: Arc::clone(&scheduled),
            metrics: Arc::clone(&metrics),
        };
        let sender = MailboxSender {
            urgent_tx,
            normal_tx,
            scheduled,
            metrics,
        };
        (mailbox, sender)
    }

    /// Waits for the next envelope: urgent, then reinjected, then normal.
    /// Returns `None` once every sender has been dropped and all three are
    /// drained. The stash itself is never served here — only
    /// [`Mailbox::reinject_stash`] moves its contents within reach.
    pub async fn recv(&mut self) -> Option<Envelope> {
        if let Ok(env) = self.urgent_rx.try_recv() {
            self.metrics.record_received();
            return Some(env);
        }
        if let Some(env) = self.reinjected.pop_front() {
            self.metrics.record_received();
            return Some(env);
        }
        if let Ok(env) = self.normal_rx.try_recv() {
            self.metrics.record_received();
            return Some(env);
        }
        tokio::select! {
            biased;
            Some(env) = self.urgent_rx.recv() => {
                self.metrics.record_received();
                Some(env)
            }
            Some(env) = self.normal_rx.recv() => {
                self.metrics.record_received();
                Some(env)
            }
            else => None,
        }
    }

    /// Non-blocking variant of [`Mailbox::recv`].
    pub fn try_recv(&mut self) -> Result<Envelope, TryRecvError> {
        let mut disconnected = false;
        match self.urgent_rx.try_recv() {
            Ok(env) => {
                self.metrics.record_received();
                return Ok(env);
            }
            Err(mpsc::error::TryRecvError::Disconnected) => disconnected = true,
            Err(mpsc::error::TryRecvError::Empty) => {}
        }
        if let Some(env) = self.reinjected.pop_front() {
            self.metrics.record_received();
            return Ok(env);
        }
        match self.normal_rx.try_recv() {
            Ok(env) => {
                self.metrics.record_received();
                return Ok(env);
            }
            Err(mpsc::error::TryRecvError::Disconnected) => disconnected = true,
            Err(mpsc::error::TryRecvError::Empty) => {}
        }
        if disconnected {
            Err(TryRecvError::Closed)
        } else {
            Err(TryRecvError::Empty)
        }
    }

    /// Parks an envelope a behavior declined to handle (the "skip"
    /// default-handler policy, §4.2). Appends to the stash only — it takes
    /// an explicit [`Mailbox::reinject_stash`] call to make it reachable by
    /// `recv`/`try_recv` again.
    pub fn stash(&mut self, envelope: Envelope) {
        self.stash.push_back(envelope);
        self.metrics.record_stashed();
    }

    /// Moves every currently-stashed envelope to the head of the normal
    /// band, oldest stashed first, so they are retried against whatever
    /// behavior is now installed before any fresher normal-band traffic
    /// (§4.2: "reinjected at the head of the normal band on successful
    /// match or explicit stash rotation"). A no-op if nothing is stashed.
    pub fn reinject_stash(&mut self) {
        self.reinjected.extend(self.stash.drain(..));
    }

    /// Approximate queue depth (both bands plus anything parked in the
    /// stash or reinjected). `record_received` already fires the moment an
    /// envelope is dequeued for dispatch — including one a behavior then
    /// stashed — so `in_flight()` alone undercounts; `stash`/`reinjected`
    /// make up the difference.
    pub fn len(&self) -> usize {
        self.stash.len() + self.reinjected.len() + self.metrics.in_flight() as usize
    }

    /// `true` when the stash and both bands are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the scheduled flag — called by the scheduler once it has
    /// finished running this actor's quantum and observed an empty mailbox,
    /// re-arming the was-empty-transition signal for the next send.
    pub fn mark_idle(&self) {
        self.scheduled.store(false, Ordering::Release);
    }

    /// Read-only access to this mailbox's metrics.
    pub fn metrics(&self) -> &R {
        &self.metrics
    }
}

impl<R: MetricsRecorder> MailboxSender<R> {
    /// Enqueues `envelope` into the band matching its priority.
    ///
    /// Returns `Ok(true)` if this send transitioned the mailbox from empty
    /// to non-empty — the caller (typically the scheduler) should enqueue
    /// the owning actor for a run exactly when this is `true`.
    pub fn send(&self, envelope: Envelope) -> Result<bool, MailboxError> {
        let priority = envelope.priority;
        let result = match priority {
            Priority::Urgent => self.urgent_tx.send(envelope),
            Priority::Normal => self.normal_tx.send(envelope),
        };
        result.map_err(|_| MailboxError::Closed)?;
        self.metrics.record_sent();

        let was_empty = self
            .scheduled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        Ok(was_empty)
    }

    /// Read-only access to this mailbox's metrics.
    pub fn metrics(&self) -> &R {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;

    fn env(priority: Priority) -> Envelope {
        Envelope::new(Payload::new(())).with_priority(priority)
    }

    #[tokio::test]
    async fn test_urgent_before_normal() {
        let (mut mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());

        sender.send(env(Priority::Normal)).unwrap();
        sender.send(env(Priority::Urgent)).unwrap();

        let first = mailbox.recv().await.unwrap();
        assert_eq!(first.priority, Priority::Urgent);
        let second = mailbox.recv().await.unwrap();
        assert_eq!(second.priority, Priority::Normal);
    }

    #[test]
    fn test_stash_is_not_served_without_reinject() {
        let (mut mailbox, _sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());

        mailbox.stash(Envelope::new(Payload::new((1i32,))));

        assert!(matches!(mailbox.try_recv(), Err(TryRecvError::Empty)));
        assert!(!mailbox.is_empty());
    }

    #[tokio::test]
    async fn test_reinject_stash_serves_ahead_of_fresh_normal_traffic() {
        let (mut mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());

        mailbox.stash(Envelope::new(Payload::new((1i32,))));
        mailbox.stash(Envelope::new(Payload::new((2i32, 2i32))));
        sender.send(env(Priority::Normal)).unwrap();

        mailbox.reinject_stash();

        let first = mailbox.recv().await.unwrap();
        assert_eq!(first.payload.len(), 1);
        let second = mailbox.recv().await.unwrap();
        assert_eq!(second.payload.len(), 2);
        let third = mailbox.recv().await.unwrap();
        assert_eq!(third.priority, Priority::Normal);
    }

    #[tokio::test]
    async fn test_urgent_still_precedes_reinjected_stash() {
        let (mut mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());

        mailbox.stash(Envelope::new(Payload::new((1i32,))));
        mailbox.reinject_stash();
        sender.send(env(Priority::Urgent)).unwrap();

        let first = mailbox.recv().await.unwrap();
        assert_eq!(first.priority, Priority::Urgent);
        let second = mailbox.recv().await.unwrap();
        assert_eq!(second.payload.len(), 1);
    }

    #[test]
    fn test_was_empty_transition_fires_once() {
        let (_mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());

        let first = sender.send(env(Priority::Normal)).unwrap();
        let second = sender.send(env(Priority::Normal)).unwrap();

        assert!(first);
        assert!(!second);
    }

    #[test]
    fn test_mark_idle_rearms_transition() {
        let (mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());

        assert!(sender.send(env(Priority::Normal)).unwrap());
        mailbox.mark_idle();
        assert!(sender.send(env(Priority::Normal)).unwrap());
    }

    #[tokio::test]
    async fn test_closed_mailbox_recv_returns_none() {
        let (mut mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());
        drop(sender);
        assert!(mailbox.recv().await.is_none());
    }

    #[test]
    fn test_send_after_receiver_dropped_errors() {
        let (mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());
        drop(mailbox);
        let result = sender.send(env(Priority::Normal));
        assert!(matches!(result, Err(MailboxError::Closed)));
    }
}
