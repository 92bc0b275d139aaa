//! Ordered, typed message handlers — what a running actor currently does
//! with an inbound envelope (§4.3).
//!
//! A [`Behavior`] is an ordered list of callbacks, each declaring the tuple
//! of field types it wants to be called with. Matching an incoming
//! [`Payload`] walks the list in declaration order and calls the first
//! callback whose declared types are element-wise assignable from the
//! payload's field types — first match wins, ties broken by order. An
//! actor installs a new `Behavior` at any time (`ctx.become_behavior(...)`);
//! nothing about the match algorithm favors the behavior that was active
//! when a message arrived over one installed afterward.
//!
//! `Behavior` is generic over the actor's own state type `S` so a callback
//! can simply be a closure closing over `&mut S` — this is the "typed
//! facade" of the design note in §9: callers write `on::<(i32, i32)>(...)`
//! and get compile-time checked extraction, while the matching itself still
//! runs against type-erased [`Payload`] fields underneath.

// Layer 1: Standard library imports
use std::any::TypeId;
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::ActorContext;
use crate::error::RuntimeError;
use crate::payload::{FieldValue, Payload};

/// What a matched callback leaves behind for the execution engine to do.
#[derive(Debug)]
pub enum HandlerOutcome {
    /// Synthesize a response carrying this payload (only meaningful if the
    /// inbound envelope was a request; ignored for fire-and-forget sends).
    Reply(Payload),
    /// No response should be synthesized. Used for fire-and-forget handlers,
    /// and for requests the handler already answered via a response promise
    /// or delegation (§4.8) — the engine never double-replies in that case.
    NoReply,
}

/// Result type every behavior callback returns. An `Err` is routed to the
/// actor's error handler (§7): for a correlated request, as an error
/// response; for a spontaneous error, as the actor's exit reason.
pub type HandlerResult = Result<HandlerOutcome, RuntimeError>;

type BoxedHandler<S> =
    Box<dyn FnMut(&mut S, &mut ActorContext<'_>, &Payload) -> HandlerResult + Send>;
type BoxedTimeoutHandler<S> = Box<dyn FnMut(&mut S, &mut ActorContext<'_>) -> HandlerResult + Send>;

struct Callback<S> {
    types: Vec<TypeId>,
    call: BoxedHandler<S>,
}

/// Policy applied when no callback in the current behavior matches an
/// inbound envelope (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultPolicy {
    /// Send the unmatched payload back to its sender unchanged.
    Reflect,
    /// Reflect, then terminate the actor with [`crate::error::ExitReason::Normal`].
    ReflectAndQuit,
    /// Log the payload via `tracing` and drop it.
    #[default]
    PrintAndDrop,
    /// Drop silently.
    Drop,
    /// Move the envelope to the mailbox stash for later rematch (§4.2).
    Skip,
}

/// The inactivity timeout attached to a behavior: if the mailbox stays
/// empty for `after`, the engine invokes `handler` exactly once. An urgent
/// envelope arriving in the meantime resets the window (design note
/// resolution, §9).
pub struct BehaviorTimeout<S> {
    pub(crate) after: Duration,
    pub(crate) handler: BoxedTimeoutHandler<S>,
}

/// An ordered set of typed callbacks plus an optional inactivity timeout.
///
/// Compose with [`Behavior::or_else`]: `a.or_else(b)` appends `b`'s
/// callbacks after `a`'s without reordering either list, so `a`'s callbacks
/// still win ties.
pub struct Behavior<S> {
    callbacks: Vec<Callback<S>>,
    timeout: Option<BehaviorTimeout<S>>,
    default_policy: DefaultPolicy,
}

impl<S> Behavior<S> {
    /// An empty behavior: every envelope falls through to the default
    /// policy (print-and-drop).
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            timeout: None,
            default_policy: DefaultPolicy::default(),
        }
    }

    /// Sets the policy applied when no callback matches (§4.3).
    pub fn with_default_policy(mut self, policy: DefaultPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Attaches (or replaces) the inactivity timeout.
    pub fn with_timeout<F>(mut self, after: Duration, mut handler: F) -> Self
    where
        F: FnMut(&mut S, &mut ActorContext<'_>) -> HandlerResult + Send + 'static,
    {
        self.timeout = Some(BehaviorTimeout {
            after,
            handler: Box::new(move |state, ctx| handler(state, ctx)),
        });
        self
    }

    /// Appends every callback of `other` after this behavior's own,
    /// preserving both lists' internal order. `other`'s timeout replaces
    /// this behavior's timeout only if this one has none.
    pub fn or_else(mut self, other: Behavior<S>) -> Self {
        self.callbacks.extend(other.callbacks);
        if self.timeout.is_none() {
            self.timeout = other.timeout;
        }
        self
    }

    /// The configured default policy.
    pub fn default_policy(&self) -> DefaultPolicy {
        self.default_policy
    }

    /// The inactivity timeout window, if any.
    pub fn timeout_after(&self) -> Option<Duration> {
        self.timeout.as_ref().map(|t| t.after)
    }

    /// Invokes the timeout handler. Panics (debug builds only, via a
    /// `debug_assert`) if no timeout is configured — callers must check
    /// [`Behavior::timeout_after`] first.
    pub(crate) fn fire_timeout(&mut self, state: &mut S, ctx: &mut ActorContext<'_>) -> Option<HandlerResult> {
        self.timeout.as_mut().map(|t| (t.handler)(state, ctx))
    }

    /// Finds and invokes the first callback whose declared types match
    /// `payload`'s field types, returning its result. `None` if nothing
    /// matched — the caller applies [`Behavior::default_policy`].
    pub(crate) fn dispatch(
        &mut self,
        state: &mut S,
        ctx: &mut ActorContext<'_>,
        payload: &Payload,
    ) -> Option<HandlerResult> {
        for callback in &mut self.callbacks {
            if payload.matches_signature(&callback.types) {
                return Some((callback.call)(state, ctx, payload));
            }
        }
        None
    }

    fn push<F>(mut self, types: Vec<TypeId>, call: F) -> Self
    where
        F: FnMut(&mut S, &mut ActorContext<'_>, &Payload) -> HandlerResult + Send + 'static,
    {
        self.callbacks.push(Callback { types, call: Box::new(call) });
        self
    }
}

impl<S> Default for Behavior<S> {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_on_arity {
    ($name:ident; $($t:ident : $idx:tt),*) => {
        impl<S> Behavior<S> {
            /// Registers a callback matched against a payload of this exact
            /// field arity and types, in this order.
            #[allow(unused_parens, clippy::too_many_arguments)]
            pub fn $name<$($t: FieldValue),*>(
                self,
                mut handler: impl FnMut(&mut S, &mut ActorContext<'_>, $($t),*) -> HandlerResult + Send + 'static,
            ) -> Self {
                let types = vec![$(TypeId::of::<$t>()),*];
                self.push(types, move |state, ctx, payload| {
                    $(
                        let $t: $t = match payload.get::<$t>($idx) {
                            Ok(v) => v.clone(),
                            Err(e) => return Err(e.into()),
                        };
                    )*
                    handler(state, ctx, $($t),*)
                })
            }
        }
    };
}

impl_on_arity!(on0;);
impl_on_arity!(on1; A:0);
impl_on_arity!(on2; A:0, B:1);
impl_on_arity!(on3; A:0, B:1, C:2);
impl_on_arity!(on4; A:0, B:1, C:2, D:3);
impl_on_arity!(on5; A:0, B:1, C:2, D:3, E:4);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::actor::ActorContextState;
    use crate::util::ActorId;

    struct Counter {
        value: i32,
    }

    fn ctx_state() -> ActorContextState {
        ActorContextState::new(ActorId::new())
    }

    #[test]
    fn test_first_match_wins() {
        let mut behavior = Behavior::<Counter>::new()
            .on1::<i32>(|state, _ctx, n| {
                state.value += n;
                Ok(HandlerOutcome::NoReply)
            })
            .on1::<i32>(|state, _ctx, n| {
                state.value += n * 100;
                Ok(HandlerOutcome::NoReply)
            });

        let mut state = Counter { value: 0 };
        let mut cstate = ctx_state();
        let mut ctx = ActorContext::new(&mut cstate);
        let payload = Payload::new((3i32,));
        behavior.dispatch(&mut state, &mut ctx, &payload).unwrap().unwrap();
        assert_eq!(state.value, 3);
    }

    #[test]
    fn test_no_match_returns_none() {
        let mut behavior = Behavior::<Counter>::new().on1::<i32>(|_s, _c, _n| Ok(HandlerOutcome::NoReply));
        let mut state = Counter { value: 0 };
        let mut cstate = ctx_state();
        let mut ctx = ActorContext::new(&mut cstate);
        let payload = Payload::new((1.0f64,));
        assert!(behavior.dispatch(&mut state, &mut ctx, &payload).is_none());
    }

    #[test]
    fn test_or_else_appends_without_reordering() {
        let a = Behavior::<Counter>::new().on1::<i32>(|s, _c, n| {
            s.value = n;
            Ok(HandlerOutcome::NoReply)
        });
        let b = Behavior::<Counter>::new().on1::<f64>(|s, _c, n| {
            s.value = n as i32;
            Ok(HandlerOutcome::NoReply)
        });
        let mut combined = a.or_else(b);

        let mut state = Counter { value: 0 };
        let mut cstate = ctx_state();
        let mut ctx = ActorContext::new(&mut cstate);
        combined
            .dispatch(&mut state, &mut ctx, &Payload::new((7i32,)))
            .unwrap()
            .unwrap();
        assert_eq!(state.value, 7);
        combined
            .dispatch(&mut state, &mut ctx, &Payload::new((9.0f64,)))
            .unwrap()
            .unwrap();
        assert_eq!(state.value, 9);
    }

    #[test]
    fn test_arithmetic_add_three_four_seven() {
        let mut behavior = Behavior::<()>::new().on2::<i32, i32>(|_s, _ctx, a, b| {
            Ok(HandlerOutcome::Reply(Payload::new((a + b,))))
        });
        let mut state = ();
        let mut cstate = ctx_state();
        let mut ctx = ActorContext::new(&mut cstate);
        let outcome = behavior
            .dispatch(&mut state, &mut ctx, &Payload::new((3i32, 4i32)))
            .unwrap()
            .unwrap();
        match outcome {
            HandlerOutcome::Reply(p) => assert_eq!(*p.get::<i32>(0).unwrap(), 7),
            HandlerOutcome::NoReply => panic!("expected a reply"),
        }
    }

    #[test]
    fn test_timeout_fires() {
        let mut behavior = Behavior::<Counter>::new().with_timeout(Duration::from_millis(1), |s, _ctx| {
            s.value = -1;
            Ok(HandlerOutcome::NoReply)
        });
        assert_eq!(behavior.timeout_after(), Some(Duration::from_millis(1)));
        let mut state = Counter { value: 0 };
        let mut cstate = ctx_state();
        let mut ctx = ActorContext::new(&mut cstate);
        behavior.fire_timeout(&mut state, &mut ctx).unwrap().unwrap();
        assert_eq!(state.value, -1);
    }
}
