//! The source role (§4.9): no input, produces elements from a generator
//! whenever it holds positive credit.

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

use super::protocol::{CreditGrant, EndOfStream, OpenStream, StreamAck, StreamData, StreamId};

/// An actor that emits elements of `T`, produced by `generate`, to whichever
/// actor opens a stream with it. `generate` returning `None` ends the
/// stream.
pub struct Source<T, F>
where
    T: FieldValue,
    F: FnMut() -> Option<T> + Send + 'static,
{
    generate: F,
    batch_size: usize,
    downstream: Option<ActorId>,
    stream: Option<StreamId>,
    credit: usize,
    exhausted: bool,
}

impl<T, F> Source<T, F>
where
    T: FieldValue,
    F: FnMut() -> Option<T> + Send + 'static,
{
    /// Builds a source that emits up to `batch_size` elements per
    /// [`StreamData`] envelope.
    pub fn new(batch_size: usize, generate: F) -> Self {
        Self {
            generate,
            batch_size: batch_size.max(1),
            downstream: None,
            stream: None,
            credit: 0,
            exhausted: false,
        }
    }

    fn emit(&mut self, ctx: &ActorContext<'_>) -> HandlerResult {
        let Some(downstream) = self.downstream else {
            return Ok(HandlerOutcome::NoReply);
        };
        let Some(stream) = self.stream else {
            return Ok(HandlerOutcome::NoReply);
        };

        while self.credit > 0 && !self.exhausted {
            let mut batch = Vec::with_capacity(self.batch_size.min(self.credit));
            while batch.len() < self.batch_size && batch.len() < self.credit {
                match (self.generate)() {
                    Some(item) => batch.push(item),
                    None => {
                        self.exhausted = true;
                        break;
                    }
                }
            }
            if !batch.is_empty() {
                self.credit -= batch.len();
                ctx.send(downstream, Payload::new((StreamData { stream, batch },)))?;
            }
        }

        if self.exhausted {
            debug!(%stream, "source exhausted, sending end of stream");
            ctx.send(downstream, Payload::new((EndOfStream { stream },)))?;
        }
        Ok(HandlerOutcome::NoReply)
    }
}

impl<T, F> Actor for Source<T, F>
where
    T: FieldValue,
    F: FnMut() -> Option<T> + Send + 'static,
{
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new()
            .on1::<OpenStream>(|state, ctx, open| {
                state.downstream = ctx.sender();
                state.stream = Some(open.stream);
                state.credit = open.initial_credit;
                if let Some(downstream) = state.downstream {
                    ctx.send(downstream, Payload::new((StreamAck { stream: open.stream },)))?;
                }
                state.emit(ctx)
            })
            .on1::<CreditGrant>(|state, ctx, grant| {
                if Some(grant.stream) == state.stream {
                    state.credit += grant.credit;
                }
                state.emit(ctx)
            })
    }

    fn post_stop(&mut self, _ctx: &mut ActorContext<'_>, _reason: &ExitReason) {
        debug!("source actor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::context::ActorContextState;

    #[test]
    fn test_emit_stops_at_credit_balance() {
        let mut state = ActorContextState::new(ActorId::new());
        let mut ctx = ActorContext::new(&mut state);
        let mut remaining = (0..10).collect::<Vec<i32>>().into_iter();
        let mut source = Source::new(4, move || remaining.next());
        source.downstream = Some(ActorId::new());
        source.stream = Some(StreamId::new());
        source.credit = 3;

        // No runtime handle attached in this unit test; emit() returns
        // early via the `?` on ctx.send once a handle is required, so we
        // only assert the credit bookkeeping stays within bounds here.
        let _ = source.emit(&ctx);
        assert!(source.credit <= 3);
        let _ = &mut ctx;
    }
}
