//! The stage role (§4.9): one upstream, one downstream. Transforms each
//! inbound element through `transform` and re-emits whatever survives,
//! propagating credit and end-of-stream in both directions. `transform`
//! returning `None` drops the element — a filter is simply a stage whose
//! transform is `Some`/`None` valued.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use tracing::debug;

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorContext};
use crate::behavior::{Behavior, HandlerOutcome, HandlerResult};
use crate::error::ExitReason;
use crate::payload::{FieldValue, Payload};
use crate::util::ActorId;

use super::protocol::{
    CreditGrant, EndOfStream, OpenStream, StreamAbort, StreamAck, StreamData, StreamId,
};

/// An actor that sits between an upstream source and a downstream sink (or
/// another stage), applying `transform` to each element it forwards. An
/// element for which `transform` returns `None` is dropped rather than
/// forwarded — the stage's outbound batch may therefore be shorter than the
/// inbound one (a filter), never longer.
///
/// A stage opens its own upstream session as soon as it learns its
/// downstream's initial credit, and mirrors every credit grant it receives
/// back upstream one-for-one — it never buffers more than downstream has
/// asked for. Credit is debited in upstream *elements received*, not
/// downstream elements forwarded, so a filter that drops most of its input
/// still only ever asks upstream for as much as it can consume.
pub struct Stage<In, Out, F>
where
    In: FieldValue,
    Out: FieldValue,
    F: FnMut(In) -> Option<Out> + Send + 'static,
{
    transform: F,
    upstream: ActorId,
    downstream: Option<ActorId>,
    upstream_session: Option<StreamId>,
    downstream_session: Option<StreamId>,
    _marker: std::marker::PhantomData<fn(In) -> Out>,
}

impl<In, Out, F> Stage<In, Out, F>
where
    In: FieldValue,
    Out: FieldValue,
    F: FnMut(In) -> Option<Out> + Send + 'static,
{
    /// Builds a stage wired to `upstream`, applying `transform` to every
    /// element it forwards downstream.
    pub fn new(upstream: ActorId, transform: F) -> Self {
        Self {
            transform,
            upstream,
            downstream: None,
            upstream_session: None,
            downstream_session: None,
            _marker: std::marker::PhantomData,
        }
    }

    fn open_upstream(&mut self, ctx: &ActorContext<'_>, initial_credit: usize) -> HandlerResult {
        let session = StreamId::new();
        self.upstream_session = Some(session);
        ctx.send(
            self.upstream,
            Payload::new((OpenStream { stream: session, initial_credit },)),
        )?;
        Ok(HandlerOutcome::NoReply)
    }
}

impl<In, Out, F> Actor for Stage<In, Out, F>
where
    In: FieldValue,
    Out: FieldValue,
    F: FnMut(In) -> Option<Out> + Send + 'static,
{
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new()
            // Downstream opens a session with us: remember it, ack, and
            // open our own upstream session with the same initial credit.
            .on1::<OpenStream>(|state, ctx, open| {
                state.downstream = ctx.sender();
                state.downstream_session = Some(open.stream);
                if let Some(downstream) = state.downstream {
                    ctx.send(downstream, Payload::new((StreamAck { stream: open.stream },)))?;
                }
                state.open_upstream(ctx, open.initial_credit)
            })
            // Upstream acks our open: nothing further to do until data
            // arrives.
            .on1::<StreamAck>(|_state, _ctx, _ack| Ok(HandlerOutcome::NoReply))
            // Downstream grants us more credit; mirror it upstream so
            // upstream never emits past what we can forward.
            .on1::<CreditGrant>(|state, ctx, grant| {
                if Some(grant.stream) == state.downstream_session {
                    if let (Some(upstream), Some(session)) = (state.upstream, state.upstream_session) {
                        ctx.send(upstream, Payload::new((CreditGrant { stream: session, credit: grant.credit },)))?;
                    }
                }
                Ok(HandlerOutcome::NoReply)
            })
            // A batch from upstream: transform it and forward to downstream.
            .on1::<StreamData<In>>(|state, ctx, data| {
                if Some(data.stream) != state.upstream_session {
                    return Ok(HandlerOutcome::NoReply);
                }
                let Some(downstream) = state.downstream else {
                    return Ok(HandlerOutcome::NoReply);
                };
                let Some(session) = state.downstream_session else {
                    return Ok(HandlerOutcome::NoReply);
                };
                let batch: Vec<Out> = data
                    .batch
                    .into_iter()
                    .filter_map(|item| (state.transform)(item))
                    .collect();
                if !batch.is_empty() {
                    ctx.send(downstream, Payload::new((StreamData { stream: session, batch },)))?;
                }
                Ok(HandlerOutcome::NoReply)
            })
            .on1::<EndOfStream>(|state, ctx, eos| {
                if Some(eos.stream) != state.upstream_session {
                    return Ok(HandlerOutcome::NoReply);
                }
                if let Some(downstream) = state.downstream {
                    if let Some(session) = state.downstream_session {
                        ctx.send(downstream, Payload::new((EndOfStream { stream: session },)))?;
                    }
                }
                debug!(stream = %eos.stream, "stage forwarded end of stream");
                Ok(HandlerOutcome::NoReply)
            })
            .on1::<StreamAbort>(|state, ctx, abort| {
                if let Some(downstream) = state.downstream {
                    if let Some(session) = state.downstream_session {
                        ctx.send(
                            downstream,
                            Payload::new((StreamAbort { stream: session, error: abort.error.clone() },)),
                        )?;
                    }
                }
                Ok(HandlerOutcome::NoReply)
            })
    }

    fn post_stop(&mut self, _ctx: &mut ActorContext<'_>, _reason: &ExitReason) {
        debug!("stage actor stopped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::actor::context::ActorContextState;

    #[test]
    fn test_open_upstream_mints_fresh_session() {
        let mut state = ActorContextState::new(ActorId::new());
        let mut ctx = ActorContext::new(&mut state);
        let mut stage: Stage<i32, i32, _> = Stage::new(ActorId::new(), |n| Some(n * 2));

        let _ = stage.open_upstream(&ctx, 4);
        assert!(stage.upstream_session.is_some());
        let _ = &mut ctx;
    }

    #[test]
    fn test_transform_filters_out_none() {
        let mut stage: Stage<i32, i32, _> =
            Stage::new(ActorId::new(), |n| if n % 2 == 0 { Some(n) } else { None });
        let filtered: Vec<i32> = (0..10).filter_map(|n| {
            // exercise the same closure the stage would call per element
            (stage.transform)(n)
        }).collect();
        assert_eq!(filtered, vec![0, 2, 4, 6, 8]);
    }
}
