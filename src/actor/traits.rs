//! The `Actor` trait: what a type needs to implement to be spawned and run
//! under the scheduler (§3, §4.3, §7).
//!
//! Unlike a conventional async, per-message-type `Actor` trait, an actor
//! here is entirely synchronous and message-type-agnostic: it starts by
//! producing a [`Behavior`] (an ordered set of typed callbacks
//! matched against type-erased [`Payload`]s, §4.3), and the engine drives it
//! by feeding envelopes to whatever behavior is currently installed.
//! Switching behaviors (`ctx.become_behavior`) is how an actor's handling of
//! future messages changes — there is no separate "handle_message" method to
//! override per state.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::behavior::Behavior;
use crate::error::{ExitReason, RuntimeError};
use crate::util::ActorId;

use super::context::ActorContext;

/// Supervision decision returned by [`Actor::on_error`] when a behavior
/// callback returns `Err` for a non-correlated (spontaneous) failure —
/// i.e. one the error-handling design routes to the actor's own exit
/// rather than to a response envelope (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Stop the actor permanently with [`ExitReason::UnhandledException`].
    Stop,
    /// Continue running, ignoring the error.
    Resume,
    /// Restart the actor: re-run [`Actor::pre_start`] and resume processing
    /// with fresh state.
    Restart,
    /// Propagate the error upward via the supervision tree (§10.5).
    Escalate,
}

impl Default for ErrorAction {
    /// The conservative default: stop rather than risk looping on a
    /// recurring failure.
    fn default() -> Self {
        Self::Stop
    }
}

/// A type that can be spawned as an actor.
///
/// `Self` doubles as the "state" type parameter of the [`Behavior`] it
/// produces — callbacks registered on that behavior close over `&mut Self`
/// directly, so there is no separate state/actor split to thread through
/// the API.
pub trait Actor: Send + 'static {
    /// Produces the actor's initial behavior. Called once, before the
    /// actor processes its first envelope.
    ///
    /// Implementations that need to do async-looking setup (connecting to
    /// a resource, scheduling a first tick) should do it here — `pre_start`
    /// has already run by the time this is called, so any state it
    /// populated is available.
    fn initial_behavior(&mut self, ctx: &mut ActorContext<'_>) -> Behavior<Self>
    where
        Self: Sized;

    /// Lifecycle hook run once before [`Actor::initial_behavior`], while the
    /// actor is still in the `Starting` state (§4.1 lifecycle states).
    /// Default implementation does nothing.
    fn pre_start(&mut self, _ctx: &mut ActorContext<'_>) {}

    /// Lifecycle hook run once the actor has fully terminated, after its
    /// exit reason has been decided and any exit/down messages queued.
    /// Default implementation does nothing.
    fn post_stop(&mut self, _ctx: &mut ActorContext<'_>, _reason: &ExitReason) {}

    /// Called when a behavior callback returns `Err` for an envelope that
    /// was not a correlated request (so there is no response channel to
    /// carry the error back to a caller instead). Default: stop.
    fn on_error(&mut self, _ctx: &mut ActorContext<'_>, _error: &RuntimeError) -> ErrorAction {
        ErrorAction::Stop
    }

    /// Called when a monitored actor terminates (§4.7). The default does
    /// nothing: the notification is dropped.
    fn on_down(&mut self, _ctx: &mut ActorContext<'_>, _who: ActorId, _reason: &ExitReason) {}

    /// Called when a linked actor terminates (§4.7). Returning
    /// [`ErrorAction::Resume`] absorbs the link (the default when `reason`
    /// is [`ExitReason::Normal`]); anything else propagates the same
    /// `reason` to this actor's own exit (the default for a non-normal
    /// reason).
    fn on_exit(&mut self, _ctx: &mut ActorContext<'_>, _who: ActorId, reason: &ExitReason) -> ErrorAction {
        if reason.is_normal() {
            ErrorAction::Resume
        } else {
            ErrorAction::Stop
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::actor::context::ActorContextState;
    use crate::behavior::HandlerOutcome;
    use crate::util::ActorId;

    struct Echo {
        last: i32,
    }

    impl Actor for Echo {
        fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
            Behavior::new().on1::<i32>(|state, _ctx, n| {
                state.last = n;
                Ok(HandlerOutcome::NoReply)
            })
        }

        fn on_error(&mut self, _ctx: &mut ActorContext<'_>, _error: &RuntimeError) -> ErrorAction {
            ErrorAction::Resume
        }
    }

    #[test]
    fn test_initial_behavior_is_invoked() {
        let mut actor = Echo { last: 0 };
        let mut state = ActorContextState::new(ActorId::new());
        let mut ctx = ActorContext::new(&mut state);
        let mut behavior = actor.initial_behavior(&mut ctx);

        let payload = crate::payload::Payload::new((9i32,));
        behavior
            .dispatch(&mut actor, &mut ctx, &payload)
            .unwrap()
            .unwrap();
        assert_eq!(actor.last, 9);
    }

    #[test]
    fn test_error_action_default_is_stop() {
        assert_eq!(ErrorAction::default(), ErrorAction::Stop);
    }
}
