//! Per-actor context: the handle a running behavior uses to talk back to
//! the runtime (§3, §4.6, §4.8).
//!
//! [`ActorContextState`] is the durable, non-generic half of this — the
//! bookkeeping that outlives any single dispatch (links, monitors, the
//! request/await tables). [`ActorContext`] is the short-lived borrow a
//! callback actually sees: it pairs a `&mut ActorContextState` with the
//! envelope currently being processed and a handle back into the runtime,
//! and lives only for the duration of one dispatch.

// Layer 1: Standard library imports
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::error::{ErrorKind, ExitReason, RuntimeError};
use crate::message::{CorrelationId, Envelope, NO_CORRELATION};
use crate::payload::Payload;
use crate::request::{DeadlineTable, RequestOutcome, DEFAULT_REQUEST_TIMEOUT};
use crate::util::ActorId;

/// A handle the runtime implements to let [`ActorContext`] send envelopes
/// without the `actor` module depending on the scheduler/system modules.
/// The scheduler hands one of these (wrapping its actor registry) to the
/// execution engine, which threads it through every `ActorContext` it
/// constructs.
pub trait RuntimeHandle: Send + Sync {
    /// Delivers `envelope` to `target`'s mailbox.
    fn send(&self, target: ActorId, envelope: Envelope) -> Result<(), RuntimeError>;

    /// Produces an owned, independently-lived clone of this handle. Used by
    /// [`crate::promise::ResponsePromise`], which must outlive the borrow
    /// on the [`ActorContext`] it was created from.
    fn clone_handle(&self) -> std::sync::Arc<dyn RuntimeHandle>;
}

/// What to do with a correlation id once its response arrives, decided at
/// the call site (`ctx.request_then`/`ctx.request_await`) and carried
/// type-erased until the owning [`crate::actor::instance::ActorInstance`]
/// can downcast it back.
pub(crate) enum ContinuationStyle {
    /// Fires as soon as its response arrives, regardless of other pending
    /// requests (§4.6 "multiplexed" style).
    Then,
    /// Only fires once every request pushed after it has already fired,
    /// even if this one's response arrived first (§4.6 "awaited" / LIFO
    /// style).
    Await,
}

/// A type-erased continuation produced by [`ActorContext::request_then`] or
/// [`ActorContext::request_await`], collected by the execution engine after
/// a dispatch and handed to the owning actor instance for installation.
pub(crate) struct PendingContinuation {
    pub(crate) id: CorrelationId,
    pub(crate) style: ContinuationStyle,
    /// Boxed `Box<dyn FnOnce(&mut A, &mut ActorContext<'_>, RequestOutcome) -> HandlerResult + Send>`
    /// for whatever actor type `A` registered it. Only the owning
    /// `ActorInstance<A>` knows how to downcast this back.
    pub(crate) thunk: Box<dyn Any + Send>,
}

/// Durable per-actor bookkeeping that survives across dispatches: the
/// actor's own id, its link/monitor sets (§4.7), and its request
/// correlation state (§4.6).
pub struct ActorContextState {
    id: ActorId,
    links: HashSet<ActorId>,
    /// Actors observing this one — notified with a down-message on exit.
    monitors: HashSet<ActorId>,
    /// Correlation ids minted by this actor, shared across all three
    /// request styles (blocking, awaited, multiplexed) so a response can
    /// always be routed back to the table that issued it.
    next_correlation: AtomicI64,
    /// Deadlines for every outstanding `then`/`await` request this actor has
    /// issued, swept by the scheduler each time it finds this actor's
    /// mailbox empty (§4.6, §5).
    deadlines: DeadlineTable,
    /// LIFO stack of correlation ids registered via `request_await`, in
    /// the order they were sent.
    await_stack: Vec<CorrelationId>,
    /// Responses that arrived for an awaited id that was not yet at the
    /// top of `await_stack`, buffered until their turn comes up.
    await_ready: HashMap<CorrelationId, RequestOutcome>,
    /// Correlation ids registered via `request_then`, fired the moment
    /// their response arrives.
    then_pending: HashSet<CorrelationId>,
}

impl ActorContextState {
    /// Creates empty bookkeeping for an actor identified by `id`.
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            links: HashSet::new(),
            monitors: HashSet::new(),
            next_correlation: AtomicI64::new(1),
            deadlines: DeadlineTable::new(),
            await_stack: Vec::new(),
            await_ready: HashMap::new(),
            then_pending: HashSet::new(),
        }
    }

    /// This actor's own id.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Mints the next correlation id for a request originating from this
    /// actor.
    pub(crate) fn next_correlation_id(&self) -> CorrelationId {
        self.next_correlation.fetch_add(1, Ordering::Relaxed)
    }

    /// Adds a symmetric link to `peer` (§4.7).
    pub fn add_link(&mut self, peer: ActorId) {
        self.links.insert(peer);
    }

    /// Removes a symmetric link, if present.
    pub fn remove_link(&mut self, peer: ActorId) {
        self.links.remove(&peer);
    }

    /// The peers currently linked to this actor.
    pub fn links(&self) -> impl Iterator<Item = &ActorId> {
        self.links.iter()
    }

    /// Registers `observer` as monitoring this actor. Idempotent — a
    /// second `monitor()` call for the same observer is a no-op, matching
    /// the design note resolution in §9.
    pub fn add_monitor(&mut self, observer: ActorId) {
        self.monitors.insert(observer);
    }

    /// Removes a monitor registration, if present.
    pub fn remove_monitor(&mut self, observer: ActorId) {
        self.monitors.remove(&observer);
    }

    /// The actors currently monitoring this one.
    pub fn monitors(&self) -> impl Iterator<Item = &ActorId> {
        self.monitors.iter()
    }

    /// Pushes `id` onto the await stack, marking it as pending.
    pub(crate) fn push_await(&mut self, id: CorrelationId) {
        self.await_stack.push(id);
    }

    /// Registers `id` as a multiplexed (`then`-style) pending request.
    pub(crate) fn push_then(&mut self, id: CorrelationId) {
        self.then_pending.insert(id);
    }

    /// Records an arrived response for `id` and returns, in LIFO order, every
    /// id now ready to be delivered (including `id` itself if it was already
    /// at the top of the stack, or became eligible by the removal of
    /// ids above it).
    ///
    /// Returns `None` if `id` belongs to neither the await stack nor the
    /// `then` set (a stray or already-resolved response).
    pub(crate) fn resolve_correlation(
        &mut self,
        id: CorrelationId,
        outcome: RequestOutcome,
    ) -> Option<ResolvedContinuations> {
        if self.then_pending.remove(&id) {
            return Some(ResolvedContinuations::Then(id, outcome));
        }
        if self.await_stack.contains(&id) {
            self.await_ready.insert(id, outcome);
            let mut ready = Vec::new();
            while let Some(top) = self.await_stack.last().copied() {
                match self.await_ready.remove(&top) {
                    Some(top_outcome) => {
                        self.await_stack.pop();
                        ready.push((top, top_outcome));
                    }
                    None => break,
                }
            }
            if ready.is_empty() {
                return Some(ResolvedContinuations::AwaitBuffered);
            }
            return Some(ResolvedContinuations::Await(ready));
        }
        None
    }

    /// Tracks `id`'s deadline (minted during `issue_request`) so the
    /// scheduler's per-quantum sweep can synthesize a `request_timeout` once
    /// it elapses (§4.6, §5).
    pub(crate) fn track_deadline(&mut self, id: CorrelationId, deadline: Instant) {
        self.deadlines.track(id, deadline);
    }

    /// Returns every correlation id whose deadline has elapsed as of `now`.
    /// An id that a real response already resolved before its deadline was
    /// swept is harmless here — `resolve_correlation` returns `None` for an
    /// id neither table recognizes, and the caller skips it.
    pub(crate) fn expire_due(&mut self, now: Instant) -> Vec<CorrelationId> {
        self.deadlines.expire_due(now)
    }

    /// Fails every outstanding `then`/`await` request with
    /// [`ErrorKind::RequestReceiverDown`], in the same reverse-send order a
    /// real await response would unwind in. Called when this actor restarts
    /// or terminates with requests still outstanding: their eventual
    /// response, even a successful one, would arrive after this actor's own
    /// correlation bookkeeping has reset or gone away.
    pub(crate) fn fail_all_receiver_down(&mut self) -> Vec<ResolvedContinuations> {
        self.deadlines.clear();
        let mut resolved = Vec::new();
        for id in self.then_pending.drain() {
            resolved.push(ResolvedContinuations::Then(
                id,
                Err(RuntimeError::new(ErrorKind::RequestReceiverDown)),
            ));
        }
        if !self.await_stack.is_empty() {
            let ready: Vec<(CorrelationId, RequestOutcome)> = self
                .await_stack
                .drain(..)
                .rev()
                .map(|id| (id, Err(RuntimeError::new(ErrorKind::RequestReceiverDown))))
                .collect();
            self.await_ready.clear();
            resolved.push(ResolvedContinuations::Await(ready));
        }
        resolved
    }
}

/// What [`ActorContextState::resolve_correlation`] determined should happen
/// for a just-arrived response.
pub(crate) enum ResolvedContinuations {
    /// Fire the multiplexed continuation for this id immediately.
    Then(CorrelationId, RequestOutcome),
    /// The LIFO stack unblocked one or more awaited continuations, oldest
    /// send first in this vec (the engine should invoke them in this
    /// order — `await_stack` semantics already popped newest-sent-first
    /// internally; see test coverage in `instance.rs`).
    Await(Vec<(CorrelationId, RequestOutcome)>),
    /// The response arrived but is not yet at the top of the await stack;
    /// it has been buffered, nothing to deliver yet.
    AwaitBuffered,
}

/// The context a behavior callback receives alongside the matched payload.
///
/// Borrows the actor's durable [`ActorContextState`] plus (outside of unit
/// tests) a [`RuntimeHandle`] and the envelope currently being processed.
/// Mutations a callback makes through this type — `become_behavior`,
/// `delegate`, `stash`, `quit` — are recorded as flags/queues the execution
/// engine drains once the callback returns; none of them take effect
/// mid-dispatch.
pub struct ActorContext<'a> {
    state: &'a mut ActorContextState,
    runtime: Option<&'a dyn RuntimeHandle>,
    sender: Option<ActorId>,
    correlation_id: CorrelationId,
    forwarding_stack: Vec<ActorId>,
    pub(crate) deferred: bool,
    pub(crate) stash_requested: bool,
    pub(crate) quit_requested: Option<ExitReason>,
    pub(crate) pending_become: Option<Box<dyn Any + Send>>,
    pub(crate) pending_continuations: Vec<PendingContinuation>,
}

impl<'a> ActorContext<'a> {
    /// Builds a context with no envelope in flight and no runtime handle —
    /// enough to dispatch a behavior in isolation (unit tests, and the
    /// inactivity-timeout path, which has no originating envelope).
    pub fn new(state: &'a mut ActorContextState) -> Self {
        Self {
            state,
            runtime: None,
            sender: None,
            correlation_id: NO_CORRELATION,
            forwarding_stack: Vec::new(),
            deferred: false,
            stash_requested: false,
            quit_requested: None,
            pending_become: None,
            pending_continuations: Vec::new(),
        }
    }

    /// Builds a context with a runtime handle but no inbound envelope: used
    /// by the execution engine for `pre_start`/`post_stop`, inactivity
    /// timeouts, system messages (down/exit), and continuation resolution —
    /// none of which are themselves a request awaiting a reply.
    pub(crate) fn for_system(state: &'a mut ActorContextState, runtime: &'a dyn RuntimeHandle) -> Self {
        Self {
            state,
            runtime: Some(runtime),
            sender: None,
            correlation_id: NO_CORRELATION,
            forwarding_stack: Vec::new(),
            deferred: false,
            stash_requested: false,
            quit_requested: None,
            pending_become: None,
            pending_continuations: Vec::new(),
        }
    }

    /// Builds a context scoped to a specific inbound `envelope`, with a
    /// runtime handle available for `send`/`delegate`.
    pub(crate) fn for_envelope(
        state: &'a mut ActorContextState,
        runtime: &'a dyn RuntimeHandle,
        envelope: &Envelope,
    ) -> Self {
        Self {
            state,
            runtime: Some(runtime),
            sender: envelope.sender,
            correlation_id: envelope.correlation_id,
            forwarding_stack: envelope.forwarding_stack.clone(),
            deferred: false,
            stash_requested: false,
            quit_requested: None,
            pending_become: None,
            pending_continuations: Vec::new(),
        }
    }

    /// This actor's own id.
    pub fn id(&self) -> ActorId {
        self.state.id()
    }

    /// Read-only access to the durable per-actor bookkeeping.
    pub fn state(&self) -> &ActorContextState {
        self.state
    }

    /// Mutable access to the durable per-actor bookkeeping (links, monitors).
    pub fn state_mut(&mut self) -> &mut ActorContextState {
        self.state
    }

    /// The sender of the envelope currently being processed, if any.
    pub fn sender(&self) -> Option<ActorId> {
        self.sender
    }

    /// `true` if the envelope currently being processed expects a response.
    pub fn is_request(&self) -> bool {
        self.correlation_id != NO_CORRELATION
    }

    /// The correlation id of the envelope currently being processed (`0` if
    /// none). Used by the execution engine to synthesize a response.
    pub(crate) fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    /// Where a synthesized reply should go: the top of the forwarding stack
    /// if this request was delegated, otherwise the original sender.
    pub(crate) fn reply_target(&self) -> Option<ActorId> {
        self.forwarding_stack.last().copied().or(self.sender)
    }

    /// Fire-and-forget send to `target`.
    pub fn send(&self, target: ActorId, payload: Payload) -> Result<(), RuntimeError> {
        let envelope = Envelope::new(payload).with_sender(self.id());
        self.dispatch_send(target, envelope)
    }

    /// Sends an urgent envelope to `target` (§4.2 priority bands).
    pub fn send_urgent(&self, target: ActorId, payload: Payload) -> Result<(), RuntimeError> {
        let envelope = Envelope::new(payload)
            .with_sender(self.id())
            .with_priority(crate::message::Priority::Urgent);
        self.dispatch_send(target, envelope)
    }

    fn dispatch_send(&self, target: ActorId, envelope: Envelope) -> Result<(), RuntimeError> {
        match self.runtime {
            Some(runtime) => runtime.send(target, envelope),
            None => Err(RuntimeError::with_context(
                ErrorKind::RuntimeError,
                "no runtime handle attached to this context",
            )),
        }
    }

    /// Registers a multiplexed continuation: fires the moment a response
    /// to this request arrives, independent of any other pending request
    /// (§4.6).
    pub fn request_then<A, F>(
        &mut self,
        target: ActorId,
        payload: Payload,
        continuation: F,
    ) -> Result<CorrelationId, RuntimeError>
    where
        A: 'static,
        F: FnOnce(&mut A, &mut ActorContext<'_>, RequestOutcome) -> crate::behavior::HandlerResult
            + Send
            + 'static,
    {
        let id = self.issue_request(target, payload)?;
        self.state.push_then(id);
        self.pending_continuations.push(PendingContinuation {
            id,
            style: ContinuationStyle::Then,
            thunk: Box::new(Box::new(continuation)
                as Box<
                    dyn FnOnce(&mut A, &mut ActorContext<'_>, RequestOutcome) -> crate::behavior::HandlerResult
                        + Send,
                >),
        });
        Ok(id)
    }

    /// Registers an awaited continuation. Handlers fire in reverse send
    /// order: the most recently registered awaited request's continuation
    /// always runs before an earlier one's, even if the earlier one's
    /// response arrived first (§4.6, §8 "Await LIFO").
    pub fn request_await<A, F>(
        &mut self,
        target: ActorId,
        payload: Payload,
        continuation: F,
    ) -> Result<CorrelationId, RuntimeError>
    where
        A: 'static,
        F: FnOnce(&mut A, &mut ActorContext<'_>, RequestOutcome) -> crate::behavior::HandlerResult
            + Send
            + 'static,
    {
        let id = self.issue_request(target, payload)?;
        self.state.push_await(id);
        self.pending_continuations.push(PendingContinuation {
            id,
            style: ContinuationStyle::Await,
            thunk: Box::new(Box::new(continuation)
                as Box<
                    dyn FnOnce(&mut A, &mut ActorContext<'_>, RequestOutcome) -> crate::behavior::HandlerResult
                        + Send,
                >),
        });
        Ok(id)
    }

    fn issue_request(&mut self, target: ActorId, payload: Payload) -> Result<CorrelationId, RuntimeError> {
        let id = self.state.next_correlation_id();
        let envelope = Envelope::new(payload)
            .with_sender(self.id())
            .with_correlation_id(id);
        self.dispatch_send(target, envelope)?;
        self.state
            .track_deadline(id, Instant::now() + DEFAULT_REQUEST_TIMEOUT);
        Ok(id)
    }

    /// Defers the response to this request: returns a [`crate::promise::ResponsePromise`]
    /// that can be fulfilled or rejected later, outside this dispatch, and
    /// marks the current handler's return value as "already replied" so
    /// the engine does not also synthesize a response from it (§4.8).
    pub fn defer_reply(&mut self) -> Option<crate::promise::ResponsePromise> {
        if !self.is_request() {
            return None;
        }
        self.deferred = true;
        let runtime = self.runtime?;
        let target = self.forwarding_stack.last().copied().or(self.sender)?;
        Some(crate::promise::ResponsePromise::new(
            runtime_handle_clone(runtime),
            target,
            self.correlation_id,
        ))
    }

    /// Delegates responsibility for replying to the current request to
    /// `target`: forwards the in-flight envelope there with the current
    /// reply address pushed onto its forwarding stack, so `target`'s
    /// eventual reply routes directly back to whoever is waiting —
    /// skipping this actor entirely (§4.8, §8 "Delegation").
    pub fn delegate(&mut self, target: ActorId, payload: Payload) -> Result<(), RuntimeError> {
        if !self.is_request() {
            return Err(RuntimeError::new(ErrorKind::BadFunctionCall));
        }
        let mut forwarding_stack = self.forwarding_stack.clone();
        if let Some(sender) = self.sender {
            forwarding_stack.push(sender);
        }
        let envelope = Envelope {
            payload,
            sender: Some(self.id()),
            correlation_id: self.correlation_id,
            priority: crate::message::Priority::Normal,
            forwarding_stack,
            timestamp: chrono::Utc::now(),
        };
        self.dispatch_send(target, envelope)?;
        self.deferred = true;
        Ok(())
    }

    /// Installs `behavior` as the actor's new behavior, effective starting
    /// with the next envelope (§4.3).
    pub fn become_behavior<A: 'static>(&mut self, behavior: crate::behavior::Behavior<A>) {
        self.pending_become = Some(Box::new(behavior));
    }

    /// Reinjects the envelope currently being processed into the stash
    /// (the "skip" default-handler policy, §4.2). Only meaningful when
    /// called from the default-policy path; the engine ignores this flag
    /// for a matched callback.
    pub fn stash(&mut self) {
        self.stash_requested = true;
    }

    /// Requests actor termination with `reason`, effective once the current
    /// callback returns.
    pub fn quit(&mut self, reason: ExitReason) {
        self.quit_requested = Some(reason);
    }
}

/// Clones a `&dyn RuntimeHandle` into an owned, independently-lived handle.
/// [`RuntimeHandle`] implementors are expected to be cheap `Arc`-backed
/// wrappers; the system module supplies the concrete `Clone` impl and
/// upcasts it through this seam so [`crate::promise::ResponsePromise`] can
/// outlive the borrow in [`ActorContext`].
fn runtime_handle_clone(handle: &dyn RuntimeHandle) -> std::sync::Arc<dyn RuntimeHandle> {
    handle.clone_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ActorId;

    #[test]
    fn test_monitor_is_idempotent() {
        let mut state = ActorContextState::new(ActorId::new());
        let observer = ActorId::new();
        state.add_monitor(observer);
        state.add_monitor(observer);
        assert_eq!(state.monitors().count(), 1);
    }

    #[test]
    fn test_correlation_ids_increase() {
        let state = ActorContextState::new(ActorId::new());
        let a = state.next_correlation_id();
        let b = state.next_correlation_id();
        assert!(b > a);
    }

    #[test]
    fn test_resolve_correlation_then_fires_immediately() {
        let mut state = ActorContextState::new(ActorId::new());
        state.push_then(5);
        let resolved = state.resolve_correlation(5, Ok(Payload::new(())));
        assert!(matches!(resolved, Some(ResolvedContinuations::Then(5, _))));
    }

    #[test]
    fn test_resolve_correlation_await_lifo_order() {
        let mut state = ActorContextState::new(ActorId::new());
        state.push_await(0);
        state.push_await(1);
        state.push_await(4);

        // Responses arrive out of send order: 0, then 1, then 4.
        let r0 = state.resolve_correlation(0, Ok(Payload::new((0i32,))));
        assert!(matches!(r0, Some(ResolvedContinuations::AwaitBuffered)));

        let r1 = state.resolve_correlation(1, Ok(Payload::new((1i32,))));
        assert!(matches!(r1, Some(ResolvedContinuations::AwaitBuffered)));

        // Only once the last-sent id (4, the top of the stack) arrives does
        // anything become ready — and it unwinds in 4, 1, 0 order.
        let r4 = state.resolve_correlation(4, Ok(Payload::new((4i32,))));
        match r4 {
            Some(ResolvedContinuations::Await(ready)) => {
                let ids: Vec<CorrelationId> = ready.iter().map(|(id, _)| *id).collect();
                assert_eq!(ids, vec![4, 1, 0]);
            }
            _ => panic!("expected the full stack to unwind"),
        }
    }

    #[test]
    fn test_expired_deadline_synthesizes_timeout_through_resolve_correlation() {
        let mut state = ActorContextState::new(ActorId::new());
        state.push_then(1);
        state.track_deadline(1, Instant::now() - Duration::from_secs(1));

        let due = state.expire_due(Instant::now());
        assert_eq!(due, vec![1]);

        let resolved = state.resolve_correlation(1, Err(RuntimeError::new(ErrorKind::RequestTimeout)));
        match resolved {
            Some(ResolvedContinuations::Then(1, Err(error))) => {
                assert_eq!(error.kind(), ErrorKind::RequestTimeout);
            }
            _ => panic!("expected the expired id to resolve as a timed-out `then` request"),
        }
    }

    #[test]
    fn test_expire_due_ignores_already_resolved_id() {
        let mut state = ActorContextState::new(ActorId::new());
        state.push_then(1);
        state.track_deadline(1, Instant::now() + Duration::from_secs(60));

        // A real response arrives first...
        let resolved = state.resolve_correlation(1, Ok(Payload::new(())));
        assert!(matches!(resolved, Some(ResolvedContinuations::Then(1, _))));

        // ...so a later sweep (even with a manufactured past `now`) finds
        // nothing still registered for it.
        let due = state.expire_due(Instant::now() + Duration::from_secs(120));
        assert_eq!(due, vec![1]);
        assert!(state.resolve_correlation(1, Err(RuntimeError::new(ErrorKind::RequestTimeout))).is_none());
    }

    #[test]
    fn test_fail_all_receiver_down_drains_then_and_await() {
        let mut state = ActorContextState::new(ActorId::new());
        state.push_then(1);
        state.push_await(2);
        state.push_await(3);

        let resolved = state.fail_all_receiver_down();
        assert_eq!(resolved.len(), 2);

        let mut saw_then = false;
        let mut saw_await_order = None;
        for item in resolved {
            match item {
                ResolvedContinuations::Then(1, Err(error)) => {
                    assert_eq!(error.kind(), ErrorKind::RequestReceiverDown);
                    saw_then = true;
                }
                ResolvedContinuations::Await(ready) => {
                    let ids: Vec<CorrelationId> = ready.iter().map(|(id, _)| *id).collect();
                    for (_, outcome) in &ready {
                        assert!(matches!(outcome, Err(e) if e.kind() == ErrorKind::RequestReceiverDown));
                    }
                    saw_await_order = Some(ids);
                }
                _ => panic!("unexpected resolved continuation shape"),
            }
        }
        assert!(saw_then);
        assert_eq!(saw_await_order, Some(vec![3, 2]));
    }

    #[test]
    fn test_context_send_without_runtime_errors() {
        let mut state = ActorContextState::new(ActorId::new());
        let ctx = ActorContext::new(&mut state);
        let result = ctx.send(ActorId::new(), Payload::new(()));
        assert!(result.is_err());
    }
}
