//! Core error, error-category, and exit-reason types shared across the runtime.
//!
//! Individual modules (mailbox, stream, supervisor, request) still define
//! their own narrow `thiserror` enums for the failures specific to them; this
//! module holds the handful of types treated as first-class data —
//! [`ErrorKind`], [`RuntimeError`], and [`ExitReason`] — that flow through
//! response envelopes and exit/down messages rather than staying local to one
//! subsystem.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Layer 3: Internal module imports
use crate::payload::PayloadError;

/// Opaque grouping tag for [`ErrorKind`]. Categories are meaningful only to
/// renderers registered via [`register_renderer`]; the runtime itself never
/// branches on category beyond grouping error kinds for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Actor termination reasons (see [`ExitReason`]).
    Exit,
    /// Request/response correlation failures.
    Request,
    /// System-message channel rejections.
    SysMessage,
    /// Stream manager protocol failures (§4.9).
    Stream,
    /// A handler raised an uncaught exception/panic.
    Runtime,
    /// Caller misuse (bad arguments, exhausted resources).
    Argument,
}

/// Error kinds the core raises, per the error handling design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No behavior callback matched an inbound envelope.
    UnexpectedMessage,
    /// No behavior callback matched an inbound response.
    UnexpectedResponse,
    /// A request's deadline elapsed before a response arrived.
    RequestTimeout,
    /// The request's target terminated with the request still pending.
    RequestReceiverDown,
    /// A system message used a key the system channel does not support.
    UnsupportedSysKey,
    /// A system message type the system channel rejects outright.
    UnsupportedSysMessage,
    /// A handler raised an uncaught exception (panic, converted at the
    /// catch-and-convert boundary — see design note "Exception handling as
    /// a message path").
    RuntimeError,
    /// Caller passed an invalid argument to a runtime operation.
    InvalidArgument,
    /// A callback was invoked in a context where it cannot be called.
    BadFunctionCall,
    /// The scheduler has no worker capacity left to run a spawn.
    OutOfWorkers,
    /// Attempted to attach an upstream to a stage that already has one, or
    /// otherwise cannot accept it.
    CannotAddUpstream,
    /// An upstream link already exists for this stream.
    UpstreamAlreadyExists,
    /// The referenced upstream is not a valid stream participant.
    InvalidUpstream,
    /// Attempted to attach a downstream that the stage cannot accept.
    CannotAddDownstream,
    /// A downstream link already exists for this stream.
    DownstreamAlreadyExists,
    /// The referenced downstream is not a valid stream participant.
    InvalidDownstream,
    /// A stream was started with no downstream stages defined.
    NoDownstreamStagesDefined,
    /// The open-stream handshake failed to complete.
    StreamInitFailed,
    /// A stream operation was attempted from an invalid state.
    InvalidStreamState,
    /// A stage reported an error with no installed handler.
    UnhandledStreamError,
}

impl ErrorKind {
    /// The category this kind is grouped under.
    pub fn category(&self) -> ErrorCategory {
        use ErrorKind::*;
        match self {
            RuntimeError => ErrorCategory::Runtime,
            RequestTimeout | RequestReceiverDown | UnexpectedResponse => ErrorCategory::Request,
            UnexpectedMessage | UnsupportedSysKey | UnsupportedSysMessage => {
                ErrorCategory::SysMessage
            }
            InvalidArgument | BadFunctionCall | OutOfWorkers => ErrorCategory::Argument,
            CannotAddUpstream
            | UpstreamAlreadyExists
            | InvalidUpstream
            | CannotAddDownstream
            | DownstreamAlreadyExists
            | InvalidDownstream
            | NoDownstreamStagesDefined
            | StreamInitFailed
            | InvalidStreamState
            | UnhandledStreamError => ErrorCategory::Stream,
        }
    }

    /// The 8-bit code used in the (code, category, context) error triple.
    /// Stable for the lifetime of a process; not guaranteed stable across
    /// crate versions.
    pub fn code(&self) -> u8 {
        // Position in the enum + 1; code 0 is reserved for "no error".
        use ErrorKind::*;
        match self {
            UnexpectedMessage => 1,
            UnexpectedResponse => 2,
            RequestTimeout => 3,
            RequestReceiverDown => 4,
            UnsupportedSysKey => 5,
            UnsupportedSysMessage => 6,
            RuntimeError => 7,
            InvalidArgument => 8,
            BadFunctionCall => 9,
            OutOfWorkers => 10,
            CannotAddUpstream => 11,
            UpstreamAlreadyExists => 12,
            InvalidUpstream => 13,
            CannotAddDownstream => 14,
            DownstreamAlreadyExists => 15,
            InvalidDownstream => 16,
            NoDownstreamStagesDefined => 17,
            StreamInitFailed => 18,
            InvalidStreamState => 19,
            UnhandledStreamError => 20,
        }
    }
}

type Renderer = fn(u8, Option<&str>) -> String;

static RENDERERS: OnceLock<RwLock<HashMap<ErrorCategory, Renderer>>> = OnceLock::new();

fn renderers() -> &'static RwLock<HashMap<ErrorCategory, Renderer>> {
    RENDERERS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers a human-readable renderer for every error in `category`.
///
/// This is the "error rendering contract" of §6: an external caller may
/// register a renderer per category; the core's own [`fmt::Display`] for
/// [`RuntimeError`] falls back to `error(code, category)` when none is
/// registered.
pub fn register_renderer(category: ErrorCategory, renderer: Renderer) {
    renderers().write().insert(category, renderer);
}

/// A runtime error: an 8-bit code, its category, and optional free-form
/// context. Code 0 is reserved for "no error" and is never constructed by
/// [`RuntimeError::new`].
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub struct RuntimeError {
    kind: ErrorKind,
    context: Option<String>,
}

impl RuntimeError {
    /// Builds an error of `kind` with no additional context.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, context: None }
    }

    /// Builds an error of `kind` carrying a context string.
    pub fn with_context(kind: ErrorKind, context: impl Into<String>) -> Self {
        Self { kind, context: Some(context.into()) }
    }

    /// The error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The error's category.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// The error's context payload, if any.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl From<PayloadError> for RuntimeError {
    /// A handler's typed accessor (`on1`, `on2`, ...) only runs after
    /// [`crate::payload::Payload::matches_signature`] already confirmed the
    /// field types line up, so this conversion fires only on a bug in that
    /// bookkeeping, not on ordinary message mismatches (those are caught
    /// earlier and resolved with [`ErrorKind::UnexpectedMessage`] instead).
    fn from(err: PayloadError) -> Self {
        RuntimeError::with_context(ErrorKind::RuntimeError, err.to_string())
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = self.kind.category();
        if let Some(renderer) = renderers().read().get(&category) {
            write!(f, "{}", renderer(self.kind.code(), self.context.as_deref()))
        } else {
            write!(f, "error({}, {:?})", self.kind.code(), category)
        }
    }
}

/// Standard exit reasons an actor can terminate with, plus the `Error`
/// variant that wraps an arbitrary [`RuntimeError`] produced by a failed
/// handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExitReason {
    /// Clean, expected shutdown (`quit`).
    Normal,
    /// A handler panicked or returned an uncaught exception.
    UnhandledException,
    /// Terminated for an unspecified reason (e.g. scheduler teardown).
    Unknown,
    /// Spawn failed because the scheduler had no worker capacity.
    OutOfWorkers,
    /// The owning actor system was shut down by its user.
    UserShutdown,
    /// Forcibly killed.
    Kill,
    /// A remote peer became unreachable (transport layer, out of scope here).
    RemoteUnreachable,
    /// Target could not be reached at all.
    Unreachable,
    /// Terminated carrying a specific runtime error as the reason.
    Error(RuntimeError),
}

impl ExitReason {
    /// `true` for [`ExitReason::Normal`] — the only reason that does not
    /// propagate as an exit-message to linked peers (§4.7).
    pub fn is_normal(&self) -> bool {
        matches!(self, ExitReason::Normal)
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Normal => write!(f, "normal"),
            ExitReason::UnhandledException => write!(f, "unhandled_exception"),
            ExitReason::Unknown => write!(f, "unknown"),
            ExitReason::OutOfWorkers => write!(f, "out_of_workers"),
            ExitReason::UserShutdown => write!(f, "user_shutdown"),
            ExitReason::Kill => write!(f, "kill"),
            ExitReason::RemoteUnreachable => write!(f, "remote_unreachable"),
            ExitReason::Unreachable => write!(f, "unreachable"),
            ExitReason::Error(e) => write!(f, "{e}"),
        }
    }
}
