//! The sink role (§4.9): consumes elements from exactly one upstream,
//! producing no outputs of its own. Opens the session immediately on
//! start (rather than waiting for a peer to open it, the way a stage's
//! downstream-facing half does) since a sink is always the last hop.

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

use super::protocol::{CreditGrant, EndOfStream, OpenStream, StreamAbort, StreamAck, StreamData, StreamId};

/// An actor that consumes a stream of `T`, handing each received element to
/// `on_item`, and calling `on_finish` exactly once when the stream ends —
/// cleanly (`Ok`) or via [`StreamAbort`] (`Err`).
pub struct Sink<T, F, G>
where
    T: FieldValue,
    F: FnMut(T) + Send + 'static,
    G: FnMut(Result<(), crate::error::RuntimeError>) + Send + 'static,
{
    on_item: F,
    on_finish: G,
    upstream: ActorId,
    batch_window: usize,
    session: Option<StreamId>,
    outstanding_credit: usize,
    finished: bool,
}

impl<T, F, G> Sink<T, F, G>
where
    T: FieldValue,
    F: FnMut(T) + Send + 'static,
    G: FnMut(Result<(), crate::error::RuntimeError>) + Send + 'static,
{
    /// Builds a sink that opens a session with `upstream` on start, granting
    /// `batch_window` elements of credit at a time.
    pub fn new(upstream: ActorId, batch_window: usize, on_item: F, on_finish: G) -> Self {
        Self {
            on_item,
            on_finish,
            upstream,
            batch_window: batch_window.max(1),
            session: None,
            outstanding_credit: 0,
            finished: false,
        }
    }

    fn grant_more_credit(&mut self, ctx: &ActorContext<'_>) -> HandlerResult {
        let Some(session) = self.session else {
            return Ok(HandlerOutcome::NoReply);
        };
        self.outstanding_credit += self.batch_window;
        ctx.send(
            self.upstream,
            Payload::new((CreditGrant { stream: session, credit: self.batch_window },)),
        )?;
        Ok(HandlerOutcome::NoReply)
    }
}

impl<T, F, G> Actor for Sink<T, F, G>
where
    T: FieldValue,
    F: FnMut(T) + Send + 'static,
    G: FnMut(Result<(), crate::error::RuntimeError>) + Send + 'static,
{
    fn initial_behavior(&mut self, ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        let session = StreamId::new();
        self.session = Some(session);
        self.outstanding_credit = self.batch_window;
        let upstream = self.upstream;
        let _ = ctx.send(
            upstream,
            Payload::new((OpenStream { stream: session, initial_credit: self.batch_window },)),
        );

        Behavior::new()
            .on1::<StreamAck>(|_state, _ctx, _ack| Ok(HandlerOutcome::NoReply))
            .on1::<StreamData<T>>(|state, ctx, data| {
                if Some(data.stream) != state.session || state.finished {
                    return Ok(HandlerOutcome::NoReply);
                }
                let received = data.batch.len();
                for item in data.batch {
                    (state.on_item)(item);
                }
                state.outstanding_credit = state.outstanding_credit.saturating_sub(received);
                if state.outstanding_credit == 0 {
                    return state.grant_more_credit(ctx);
                }
                Ok(HandlerOutcome::NoReply)
            })
            .on1::<EndOfStream>(|state, _ctx, eos| {
                if Some(eos.stream) != state.session || state.finished {
                    return Ok(HandlerOutcome::NoReply);
                }
                state.finished = true;
                debug!(stream = %eos.stream, "sink reached clean end of stream");
                (state.on_finish)(Ok(()));
                Ok(HandlerOutcome::NoReply)
            })
            .on1::<StreamAbort>(|state, _ctx, abort| {
                if Some(abort.stream) != state.session || state.finished {
                    return Ok(HandlerOutcome::NoReply);
                }
                state.finished = true;
                (state.on_finish)(Err(abort.error));
                Ok(HandlerOutcome::NoReply)
            })
    }

    fn post_stop(&mut self, _ctx: &mut ActorContext<'_>, _reason: &ExitReason) {
        debug!("sink actor stopped");
    }
}
