//! The per-step execution engine (§4.5): what happens to one actor's control
//! block when a worker pulls it off the run queue and feeds it an envelope.
//!
//! This module owns no state of its own — it is a pure function over an
//! [`ActorControlBlock`] plus whatever envelope the mailbox handed back. The
//! scheduler's worker loop drives it in a quantum loop (§4.4); this module
//! only concerns itself with a single step's worth of dispatch, default
//! policy, continuation resolution, system messages, and error routing.

// Layer 1: Standard library imports
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

// Layer 2: Third-party crate imports
use tracing::{debug, warn};

// Layer 3: Internal module imports
use crate::actor::context::{ActorContext, ContinuationStyle, ResolvedContinuations};
use crate::actor::control_block::ActorControlBlock;
use crate::actor::system_messages::{Down, Exit};
use crate::actor::traits::ErrorAction;
use crate::behavior::{DefaultPolicy, HandlerOutcome, HandlerResult};
use crate::error::{ErrorKind, ExitReason, RuntimeError};
use crate::message::{Envelope, Priority};
use crate::payload::Payload;
use crate::request::RequestOutcome;
use crate::util::ActorId;

use super::handle::SchedulerHandle;

/// What a single step left the actor in.
pub(crate) enum StepOutcome {
    /// The actor is still alive; keep it on (or return it to) the run queue
    /// according to the usual scheduling rules.
    Continue,
    /// The actor terminated during this step with the given reason.
    Terminated(ExitReason),
}

/// Runs one envelope through `acb`, driving behavior dispatch, default
/// policy, continuation resolution, or system-message handling as
/// appropriate, and applying whatever the handler requested (become, stash,
/// quit, reply synthesis) before returning.
pub(crate) fn step(acb: &mut ActorControlBlock, envelope: Envelope, runtime: &SchedulerHandle) -> StepOutcome {
    if let Some(outcome) = try_system_message(acb, &envelope, runtime) {
        return outcome;
    }

    let correlation_id = envelope.correlation_id;
    if correlation_id != crate::message::NO_CORRELATION {
        let outcome = envelope_to_outcome(&envelope.payload);
        if let Some(resolved) = acb.context_state.resolve_correlation(correlation_id, outcome) {
            return run_continuations(acb, resolved, runtime);
        }
    }

    dispatch_envelope(acb, envelope, runtime)
}

fn envelope_to_outcome(payload: &Payload) -> RequestOutcome {
    if payload.len() == 1 {
        if let Ok(error) = payload.get::<RuntimeError>(0) {
            return Err(error.clone());
        }
    }
    Ok(payload.clone())
}

fn try_system_message(
    acb: &mut ActorControlBlock,
    envelope: &Envelope,
    runtime: &SchedulerHandle,
) -> Option<StepOutcome> {
    if envelope.payload.len() != 1 {
        return None;
    }
    if let Ok(down) = envelope.payload.get::<Down>(0).map(Down::clone) {
        let mut ctx = ActorContext::for_system(&mut acb.context_state, runtime);
        acb.instance.on_down(&mut ctx, down.who, &down.reason);
        return Some(apply_ctx_effects_no_stash(acb, ctx, None));
    }
    if let Ok(exit) = envelope.payload.get::<Exit>(0).map(Exit::clone) {
        acb.context_state.remove_link(exit.who);
        let mut ctx = ActorContext::for_system(&mut acb.context_state, runtime);
        let action = acb.instance.on_exit(&mut ctx, exit.who, &exit.reason);
        let outcome = match action {
            ErrorAction::Resume => apply_ctx_effects(acb, ctx, None),
            ErrorAction::Stop | ErrorAction::Escalate => {
                apply_ctx_effects(acb, ctx, Some(exit.reason.clone()))
            }
            ErrorAction::Restart => {
                restart(acb, runtime);
                apply_ctx_effects(acb, ActorContext::for_system(&mut acb.context_state, runtime), None)
            }
        };
        return Some(outcome);
    }
    None
}

fn dispatch_envelope(acb: &mut ActorControlBlock, envelope: Envelope, runtime: &SchedulerHandle) -> StepOutcome {
    let mut ctx = ActorContext::for_envelope(&mut acb.context_state, runtime, &envelope);
    let result = catch_handler_panic(|| acb.instance.dispatch(&mut ctx, &envelope.payload));

    match result {
        Some(handler_result) => {
            let outcome = handle_result(acb, &mut ctx, handler_result, runtime);
            finish_dispatch(acb, ctx, envelope, outcome)
        }
        None => {
            let policy = acb.instance.default_policy();
            apply_default_policy(acb, envelope, policy, runtime)
        }
    }
}

fn catch_handler_panic<F>(f: F) -> Option<HandlerResult>
where
    F: FnOnce() -> Option<HandlerResult>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(_) => Some(Err(RuntimeError::with_context(
            ErrorKind::RuntimeError,
            "handler panicked",
        ))),
    }
}

/// Applies a single [`HandlerResult`]: reply synthesis for a correlated
/// request, or routing to [`crate::actor::Actor::on_error`] for a
/// spontaneous error. Returns the exit reason if this result should
/// terminate the actor.
fn handle_result(
    acb: &mut ActorControlBlock,
    ctx: &mut ActorContext<'_>,
    result: HandlerResult,
    runtime: &SchedulerHandle,
) -> Option<ExitReason> {
    match result {
        Ok(HandlerOutcome::Reply(payload)) => {
            reply_if_request(ctx, payload, runtime);
            None
        }
        Ok(HandlerOutcome::NoReply) => None,
        Err(error) => {
            if ctx.is_request() && !ctx.deferred {
                reply_if_request(ctx, Payload::new((error,)), runtime);
                None
            } else {
                match acb.instance.on_error(ctx, &error) {
                    ErrorAction::Resume => None,
                    ErrorAction::Stop | ErrorAction::Escalate => {
                        Some(ExitReason::Error(error))
                    }
                    ErrorAction::Restart => {
                        restart(acb, runtime);
                        None
                    }
                }
            }
        }
    }
}

fn reply_if_request(ctx: &ActorContext<'_>, payload: Payload, runtime: &SchedulerHandle) {
    if !ctx.is_request() || ctx.deferred {
        return;
    }
    let Some(target) = ctx.reply_target() else {
        return;
    };
    let envelope = Envelope::new(payload)
        .with_sender(ctx.id())
        .with_correlation_id(ctx.correlation_id());
    if let Err(error) = runtime.send(target, envelope) {
        warn!(%error, "failed to deliver synthesized response");
    }
}

fn run_continuations(
    acb: &mut ActorControlBlock,
    resolved: ResolvedContinuations,
    runtime: &SchedulerHandle,
) -> StepOutcome {
    let pending: Vec<(crate::message::CorrelationId, ContinuationStyle, RequestOutcome)> = match resolved {
        ResolvedContinuations::Then(id, outcome) => vec![(id, ContinuationStyle::Then, outcome)],
        ResolvedContinuations::Await(ready) => ready
            .into_iter()
            .map(|(id, outcome)| (id, ContinuationStyle::Await, outcome))
            .collect(),
        ResolvedContinuations::AwaitBuffered => Vec::new(),
    };

    for (id, style, outcome) in pending {
        let mut ctx = ActorContext::for_system(&mut acb.context_state, runtime);
        let result = catch_handler_panic(|| acb.instance.resolve_continuation(id, style, outcome, &mut ctx));
        if let Some(handler_result) = result {
            let exit = handle_result(acb, &mut ctx, handler_result, runtime);
            let terminated = apply_ctx_effects_no_stash(acb, ctx, exit);
            if let StepOutcome::Terminated(reason) = terminated {
                return StepOutcome::Terminated(reason);
            }
        }
    }
    StepOutcome::Continue
}

fn apply_default_policy(
    acb: &mut ActorControlBlock,
    envelope: Envelope,
    policy: DefaultPolicy,
    runtime: &SchedulerHandle,
) -> StepOutcome {
    match policy {
        DefaultPolicy::Reflect | DefaultPolicy::ReflectAndQuit => {
            if let Some(sender) = envelope.sender {
                let reflected = Envelope::new(envelope.payload.clone())
                    .with_sender(acb.id())
                    .with_correlation_id(envelope.correlation_id)
                    .with_priority(envelope.priority);
                if let Err(error) = runtime.send(sender, reflected) {
                    warn!(%error, "failed to reflect unmatched envelope");
                }
            }
            if matches!(policy, DefaultPolicy::ReflectAndQuit) {
                return StepOutcome::Terminated(ExitReason::Normal);
            }
            StepOutcome::Continue
        }
        DefaultPolicy::PrintAndDrop => {
            debug!(%envelope, "no behavior callback matched; dropping");
            StepOutcome::Continue
        }
        DefaultPolicy::Drop => StepOutcome::Continue,
        DefaultPolicy::Skip => {
            acb.mailbox.stash(envelope);
            StepOutcome::Continue
        }
    }
}

/// Drains the become/continuation/stash/quit flags a dispatch left on `ctx`,
/// stashing `envelope` back if requested, and returns the resulting
/// [`StepOutcome`]. `exit_override` takes precedence over a plain
/// `ctx.quit_requested` (used when a handler error already decided the exit
/// reason).
fn finish_dispatch(
    acb: &mut ActorControlBlock,
    ctx: ActorContext<'_>,
    envelope: Envelope,
    exit_override: Option<ExitReason>,
) -> StepOutcome {
    let stash_requested = ctx.stash_requested;
    let outcome = apply_ctx_effects(acb, ctx, exit_override);
    if stash_requested {
        acb.mailbox.stash(envelope);
    }
    outcome
}

fn apply_ctx_effects(
    acb: &mut ActorControlBlock,
    ctx: ActorContext<'_>,
    exit_override: Option<ExitReason>,
) -> StepOutcome {
    apply_ctx_effects_no_stash(acb, ctx, exit_override)
}

fn apply_ctx_effects_no_stash(
    acb: &mut ActorControlBlock,
    ctx: ActorContext<'_>,
    exit_override: Option<ExitReason>,
) -> StepOutcome {
    if let Some(become_boxed) = ctx.pending_become {
        acb.instance.apply_become(become_boxed);
        acb.mailbox.reinject_stash();
    }
    for continuation in ctx.pending_continuations {
        acb.instance.install_continuation(continuation);
    }
    match exit_override.or(ctx.quit_requested) {
        Some(reason) => StepOutcome::Terminated(reason),
        None => StepOutcome::Continue,
    }
}

/// Fires the currently installed behavior's inactivity timeout, if any,
/// applying whatever the handler requested exactly like a dispatched
/// envelope would. Called by the worker loop when it observes an empty
/// mailbox and enough time has passed since this actor's last activity
/// (§4.2, §4.4 — there is no dedicated timer thread).
pub(crate) fn fire_behavior_timeout(acb: &mut ActorControlBlock, runtime: &SchedulerHandle) -> StepOutcome {
    let mut ctx = ActorContext::for_system(&mut acb.context_state, runtime);
    let result = catch_handler_panic(|| acb.instance.fire_timeout(&mut ctx));
    match result {
        Some(handler_result) => {
            let exit = handle_result(acb, &mut ctx, handler_result, runtime);
            apply_ctx_effects_no_stash(acb, ctx, exit)
        }
        None => apply_ctx_effects_no_stash(acb, ctx, None),
    }
}

/// Sweeps this actor's outstanding request deadlines for anything that has
/// elapsed, synthesizing the canonical `request_timeout` outcome into the
/// same `resolve_correlation` path a real response would use, so a response
/// handler fires exactly once either way (§4.6, §8). Called by the worker
/// loop whenever it observes an empty mailbox (§4.4).
pub(crate) fn expire_request_deadlines(acb: &mut ActorControlBlock, runtime: &SchedulerHandle) -> StepOutcome {
    let due = acb.context_state.expire_due(Instant::now());
    for id in due {
        let outcome: RequestOutcome = Err(RuntimeError::new(ErrorKind::RequestTimeout));
        if let Some(resolved) = acb.context_state.resolve_correlation(id, outcome) {
            if let StepOutcome::Terminated(reason) = run_continuations(acb, resolved, runtime) {
                return StepOutcome::Terminated(reason);
            }
        }
    }
    StepOutcome::Continue
}

fn restart(acb: &mut ActorControlBlock, runtime: &SchedulerHandle) {
    acb.lifecycle.transition_to(crate::actor::lifecycle::ActorState::Starting);
    for resolved in acb.context_state.fail_all_receiver_down() {
        let _ = run_continuations(acb, resolved, runtime);
    }
    let mut ctx = ActorContext::for_system(&mut acb.context_state, runtime);
    acb.instance.pre_start(&mut ctx);
    acb.instance.install_initial_behavior(&mut ctx);
    for continuation in ctx.pending_continuations.drain(..) {
        acb.instance.install_continuation(continuation);
    }
    acb.lifecycle.transition_to(crate::actor::lifecycle::ActorState::Running);
}

/// Runs `pre_start` and installs the initial behavior — called once, at
/// spawn time, before the actor's control block is registered with the
/// scheduler.
///
/// `pre_start`/`initial_behavior` are allowed to issue their own correlated
/// requests (`ctx.request_then`/`ctx.request_await`) to ask a peer for
/// something before the actor is ready to serve its own mailbox — draining
/// `ctx.pending_continuations` here is what makes those responses actually
/// deliverable later instead of arriving for a continuation nobody installed.
pub(crate) fn start(acb: &mut ActorControlBlock, runtime: &SchedulerHandle) {
    let mut ctx = ActorContext::for_system(&mut acb.context_state, runtime);
    acb.instance.pre_start(&mut ctx);
    acb.instance.install_initial_behavior(&mut ctx);
    for continuation in ctx.pending_continuations.drain(..) {
        acb.instance.install_continuation(continuation);
    }
    acb.lifecycle.transition_to(crate::actor::lifecycle::ActorState::Running);
}

/// Runs `post_stop`, fails any outstanding requests, and notifies links and
/// monitors that `who` (this actor) terminated with `reason` (§4.7).
pub(crate) fn finalize(acb: &mut ActorControlBlock, reason: ExitReason, runtime: &SchedulerHandle) {
    acb.lifecycle.transition_to(crate::actor::lifecycle::ActorState::Stopping);
    for resolved in acb.context_state.fail_all_receiver_down() {
        let _ = run_continuations(acb, resolved, runtime);
    }
    {
        let mut ctx = ActorContext::for_system(&mut acb.context_state, runtime);
        acb.instance.post_stop(&mut ctx, &reason);
    }

    let who = acb.id();
    for monitor in acb.context_state.monitors().copied().collect::<Vec<ActorId>>() {
        let envelope = Envelope::new(Payload::new((Down { who, reason: reason.clone() },)))
            .with_priority(Priority::Urgent);
        let _ = runtime.send(monitor, envelope);
    }
    if !reason.is_normal() {
        for link in acb.context_state.links().copied().collect::<Vec<ActorId>>() {
            let envelope = Envelope::new(Payload::new((Exit { who, reason: reason.clone() },)))
                .with_priority(Priority::Urgent);
            let _ = runtime.send(link, envelope);
        }
    }
    acb.lifecycle.transition_to(crate::actor::lifecycle::ActorState::Stopped);
}
