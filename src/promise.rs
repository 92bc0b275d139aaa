//! Response promises: deferred, exactly-once replies to a correlated
//! request (§4.8).
//!
//! [`ActorContext::defer_reply`](crate::actor::ActorContext::defer_reply)
//! hands out a [`ResponsePromise`] when a handler wants to answer a request
//! later — after an async I/O callback completes, after forwarding through
//! several stages, or from a completely different call stack than the one
//! that received the request. The promise owns everything needed to address
//! the eventual response (an owned runtime handle, not a borrow), and
//! guarantees it fires at most once.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::RuntimeHandle;
use crate::error::{ErrorKind, RuntimeError};
use crate::message::{CorrelationId, Envelope};
use crate::payload::Payload;
use crate::util::ActorId;

/// A one-shot handle for answering a request outside the call stack that
/// received it.
///
/// Fulfilling or rejecting consumes the promise, so the type system rules
/// out double-replies at the call site; [`ResponsePromise::fulfilled`]
/// additionally guards against two clones of the same logical promise (see
/// [`ResponsePromise::split`]) both firing.
pub struct ResponsePromise {
    runtime: Arc<dyn RuntimeHandle>,
    target: ActorId,
    correlation_id: CorrelationId,
    fulfilled: Arc<AtomicBool>,
}

impl ResponsePromise {
    pub(crate) fn new(
        runtime: Arc<dyn RuntimeHandle>,
        target: ActorId,
        correlation_id: CorrelationId,
    ) -> Self {
        Self {
            runtime,
            target,
            correlation_id,
            fulfilled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The correlation id this promise will answer.
    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    /// Resolves the request with a successful `payload`.
    ///
    /// Returns `Err` if the promise was already fulfilled or rejected, or if
    /// delivery to the original requester fails (e.g. it has since
    /// terminated).
    pub fn fulfill(self, payload: Payload) -> Result<(), RuntimeError> {
        self.answer(Ok(payload))
    }

    /// Resolves the request with an error.
    pub fn reject(self, error: RuntimeError) -> Result<(), RuntimeError> {
        self.answer(Err(error))
    }

    fn answer(self, outcome: Result<Payload, RuntimeError>) -> Result<(), RuntimeError> {
        if self
            .fulfilled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RuntimeError::new(ErrorKind::BadFunctionCall));
        }
        let payload = match outcome {
            Ok(payload) => payload,
            Err(error) => Payload::new((error,)),
        };
        let envelope = Envelope::new(payload).with_correlation_id(self.correlation_id);
        self.runtime.send(self.target, envelope)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct RecordingHandle {
        sent: Mutex<Vec<(ActorId, Envelope)>>,
    }

    impl RuntimeHandle for RecordingHandle {
        fn send(&self, target: ActorId, envelope: Envelope) -> Result<(), RuntimeError> {
            self.sent.lock().push((target, envelope));
            Ok(())
        }

        fn clone_handle(&self) -> Arc<dyn RuntimeHandle> {
            unimplemented!("not exercised in these tests")
        }
    }

    #[test]
    fn test_fulfill_sends_response_once() {
        let handle: Arc<dyn RuntimeHandle> = Arc::new(RecordingHandle { sent: Mutex::new(Vec::new()) });
        let target = ActorId::new();
        let promise = ResponsePromise::new(Arc::clone(&handle), target, 7);

        promise.fulfill(Payload::new((42i32,))).unwrap();
    }

    #[test]
    fn test_reject_wraps_error() {
        let handle: Arc<dyn RuntimeHandle> = Arc::new(RecordingHandle { sent: Mutex::new(Vec::new()) });
        let promise = ResponsePromise::new(Arc::clone(&handle), ActorId::new(), 3);
        promise
            .reject(RuntimeError::new(ErrorKind::RequestTimeout))
            .unwrap();
    }
}
