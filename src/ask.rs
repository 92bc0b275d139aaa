//! The "ask" convenience: blocking-receive style request/response for
//! callers that are not themselves actors (§4.6).
//!
//! [`ActorContext::request_then`]/[`ActorContext::request_await`] are the
//! primitive — they only make sense called from inside a handler, against
//! `self`'s own continuation maps. A plain async caller (a test, a CLI
//! command, an HTTP handler bridging into the runtime) has no handler and no
//! continuation map of its own, so [`ask`] spawns a short-lived proxy actor
//! that issues the request on the caller's behalf and forwards the outcome
//! back over a oneshot channel.

use tokio::sync::oneshot;

use crate::actor::{Actor, ActorContext};
use crate::behavior::{Behavior, HandlerOutcome};
use crate::error::{ErrorKind, ExitReason, RuntimeError};
use crate::payload::Payload;
use crate::request::RequestOutcome;
use crate::system::ActorSystem;
use crate::util::ActorId;

struct AskProxy {
    target: ActorId,
    payload: Option<Payload>,
    responder: Option<oneshot::Sender<RequestOutcome>>,
}

impl Actor for AskProxy {
    fn initial_behavior(&mut self, ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        let target = self.target;
        let Some(payload) = self.payload.take() else {
            if let Some(responder) = self.responder.take() {
                let _ = responder.send(Err(RuntimeError::with_context(
                    ErrorKind::RequestReceiverDown,
                    "ask proxy ran without a payload",
                )));
            }
            ctx.quit(ExitReason::Normal);
            return Behavior::new();
        };
        let issued = ctx.request_await::<Self, _>(target, payload, |state, ctx, outcome| {
            if let Some(responder) = state.responder.take() {
                let _ = responder.send(outcome);
            }
            ctx.quit(ExitReason::Normal);
            Ok(HandlerOutcome::NoReply)
        });
        if let Err(err) = issued {
            if let Some(responder) = self.responder.take() {
                let _ = responder.send(Err(err));
            }
            ctx.quit(ExitReason::Normal);
        }
        Behavior::new()
    }
}

/// Sends `payload` to `target` and resolves once the matching response
/// arrives, with no continuation map or handler context of its own required.
///
/// Spawns a proxy actor on `system`'s pool that issues the request via
/// [`ActorContext::request_await`] and quits the instant it has delivered
/// its answer — it never outlives the single request it was created for.
pub async fn ask(system: &ActorSystem, target: ActorId, payload: Payload) -> RequestOutcome {
    let (responder, outcome) = oneshot::channel();
    let proxy = AskProxy {
        target,
        payload: Some(payload),
        responder: Some(responder),
    };
    system
        .spawn(proxy)
        .map_err(|err| RuntimeError::with_context(ErrorKind::OutOfWorkers, err.to_string()))?;
    outcome.await.unwrap_or_else(|_| {
        Err(RuntimeError::with_context(
            ErrorKind::RequestReceiverDown,
            "ask proxy terminated before delivering a reply",
        ))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::behavior::HandlerOutcome;
    use crate::system::SystemConfig;

    struct Adder;

    impl Actor for Adder {
        fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
            Behavior::new().on2::<i64, i64>(|_state, _ctx, a, b| {
                Ok(HandlerOutcome::Reply(Payload::new((a + b,))))
            })
        }
    }

    #[tokio::test]
    async fn test_ask_resolves_with_the_response_payload() {
        let system = ActorSystem::new(SystemConfig::default());
        let adder = system.spawn(Adder).unwrap();

        let outcome = ask(&system, adder, Payload::new((3i64, 4i64))).await.unwrap();
        let sum: i64 = *outcome.get(0).unwrap();
        assert_eq!(sum, 7);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_ask_against_unknown_actor_does_not_hang() {
        let system = ActorSystem::new(SystemConfig::default());
        let ghost = ActorId::new();

        let outcome = ask(&system, ghost, Payload::new((1i64,))).await;
        assert!(outcome.is_err());

        system.shutdown().await.unwrap();
    }
}
