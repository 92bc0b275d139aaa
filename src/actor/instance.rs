//! Type erasure boundary between the scheduler's homogeneous actor slots
//! and each actor's own concrete state type.
//!
//! The scheduler and execution engine need to treat every actor uniformly
//! (one run queue, one step loop) while each actor's [`Behavior`] and
//! continuation closures are generic over its own state type `A`.dyn
//! [`ActorObject`] is the seam: [`ActorInstance<A>`] implements it once per
//! concrete actor type and is stored as `Box<dyn ActorObject>` everywhere
//! else (§3's "state handle... dropped on quit").

// Layer 1: Standard library imports
use std::any::Any;
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::behavior::{Behavior, DefaultPolicy, HandlerOutcome, HandlerResult};
use crate::error::{ExitReason, RuntimeError};
use crate::payload::Payload;
use crate::request::RequestOutcome;
use crate::util::ActorId;

use super::context::{ActorContext, ContinuationStyle, PendingContinuation};
use super::traits::{Actor, ErrorAction};

type AwaitContinuation<A> =
    Box<dyn FnOnce(&mut A, &mut ActorContext<'_>, RequestOutcome) -> HandlerResult + Send>;

/// The non-generic face of a running actor, dispatched through by the
/// execution engine without knowing the actor's concrete type.
pub(crate) trait ActorObject: Send {
    fn pre_start(&mut self, ctx: &mut ActorContext<'_>);
    fn install_initial_behavior(&mut self, ctx: &mut ActorContext<'_>);
    fn dispatch(&mut self, ctx: &mut ActorContext<'_>, payload: &Payload) -> Option<HandlerResult>;
    fn default_policy(&self) -> DefaultPolicy;
    fn timeout_after(&self) -> Option<Duration>;
    fn fire_timeout(&mut self, ctx: &mut ActorContext<'_>) -> Option<HandlerResult>;
    fn apply_become(&mut self, boxed: Box<dyn Any + Send>);
    fn install_continuation(&mut self, cont: PendingContinuation);
    fn resolve_continuation(
        &mut self,
        id: crate::message::CorrelationId,
        style: ContinuationStyle,
        outcome: RequestOutcome,
        ctx: &mut ActorContext<'_>,
    ) -> Option<HandlerResult>;
    fn on_error(&mut self, ctx: &mut ActorContext<'_>, error: &RuntimeError) -> ErrorAction;
    fn on_down(&mut self, ctx: &mut ActorContext<'_>, who: ActorId, reason: &ExitReason);
    fn on_exit(&mut self, ctx: &mut ActorContext<'_>, who: ActorId, reason: &ExitReason) -> ErrorAction;
    fn post_stop(&mut self, ctx: &mut ActorContext<'_>, reason: &ExitReason);
}

/// Pairs an actor's own state with its currently installed [`Behavior`] and
/// continuation tables, and implements [`ActorObject`] so the engine can
/// drive it without naming `A`.
pub(crate) struct ActorInstance<A: Actor> {
    actor: A,
    behavior: Option<Behavior<A>>,
    await_continuations: std::collections::HashMap<crate::message::CorrelationId, AwaitContinuation<A>>,
    then_continuations: std::collections::HashMap<crate::message::CorrelationId, AwaitContinuation<A>>,
}

impl<A: Actor> ActorInstance<A> {
    pub(crate) fn new(actor: A) -> Self {
        Self {
            actor,
            behavior: None,
            await_continuations: std::collections::HashMap::new(),
            then_continuations: std::collections::HashMap::new(),
        }
    }
}

impl<A: Actor> ActorObject for ActorInstance<A> {
    fn pre_start(&mut self, ctx: &mut ActorContext<'_>) {
        self.actor.pre_start(ctx);
    }

    fn install_initial_behavior(&mut self, ctx: &mut ActorContext<'_>) {
        self.behavior = Some(self.actor.initial_behavior(ctx));
    }

    fn dispatch(&mut self, ctx: &mut ActorContext<'_>, payload: &Payload) -> Option<HandlerResult> {
        let behavior = self.behavior.as_mut()?;
        behavior.dispatch(&mut self.actor, ctx, payload)
    }

    fn default_policy(&self) -> DefaultPolicy {
        self.behavior
            .as_ref()
            .map(Behavior::default_policy)
            .unwrap_or_default()
    }

    fn timeout_after(&self) -> Option<Duration> {
        self.behavior.as_ref().and_then(Behavior::timeout_after)
    }

    fn fire_timeout(&mut self, ctx: &mut ActorContext<'_>) -> Option<HandlerResult> {
        let behavior = self.behavior.as_mut()?;
        behavior.fire_timeout(&mut self.actor, ctx)
    }

    fn apply_become(&mut self, boxed: Box<dyn Any + Send>) {
        if let Ok(behavior) = boxed.downcast::<Behavior<A>>() {
            self.behavior = Some(*behavior);
        }
    }

    fn install_continuation(&mut self, cont: PendingContinuation) {
        let PendingContinuation { id, style, thunk } = cont;
        let Ok(thunk) = thunk.downcast::<AwaitContinuation<A>>() else {
            return;
        };
        match style {
            ContinuationStyle::Await => {
                self.await_continuations.insert(id, *thunk);
            }
            ContinuationStyle::Then => {
                self.then_continuations.insert(id, *thunk);
            }
        }
    }

    fn resolve_continuation(
        &mut self,
        id: crate::message::CorrelationId,
        style: ContinuationStyle,
        outcome: RequestOutcome,
        ctx: &mut ActorContext<'_>,
    ) -> Option<HandlerResult> {
        let continuation = match style {
            ContinuationStyle::Await => self.await_continuations.remove(&id),
            ContinuationStyle::Then => self.then_continuations.remove(&id),
        }?;
        Some(continuation(&mut self.actor, ctx, outcome))
    }

    fn on_error(&mut self, ctx: &mut ActorContext<'_>, error: &RuntimeError) -> ErrorAction {
        self.actor.on_error(ctx, error)
    }

    fn on_down(&mut self, ctx: &mut ActorContext<'_>, who: ActorId, reason: &ExitReason) {
        self.actor.on_down(ctx, who, reason);
    }

    fn on_exit(&mut self, ctx: &mut ActorContext<'_>, who: ActorId, reason: &ExitReason) -> ErrorAction {
        self.actor.on_exit(ctx, who, reason)
    }

    fn post_stop(&mut self, ctx: &mut ActorContext<'_>, reason: &ExitReason) {
        self.actor.post_stop(ctx, reason);
    }
}
