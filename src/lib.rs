//! # airssys-rt — in-process actor runtime
//!
//! A work-stealing, Erlang/BEAM-inspired actor runtime: type-erased
//! copy-on-write message payloads, ordered typed behaviors, request/response
//! correlation, links and monitors for supervision, and credit-based
//! streaming between actors.
//!
//! # Quick Start
//!
//! ```rust
//! use airssys_rt::prelude::*;
//!
//! struct Counter {
//!     value: i64,
//! }
//!
//! impl Actor for Counter {
//!     fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
//!         Behavior::new()
//!             .on1::<i64>(|state, _ctx, delta| {
//!                 state.value += delta;
//!                 Ok(HandlerOutcome::NoReply)
//!             })
//!             .on0(|state, _ctx| Ok(HandlerOutcome::Reply(Payload::new((state.value,)))))
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! use airssys_rt::actor::RuntimeHandle;
//!
//! let system = ActorSystem::new(SystemConfig::default());
//! let counter = system.spawn(Counter { value: 0 }).unwrap();
//! system
//!     .handle()
//!     .send(counter, Envelope::new(Payload::new((5i64,))))
//!     .unwrap();
//! system.shutdown().await.unwrap();
//! # }
//! ```
//!
//! # Core Design
//!
//! ## Type-erased, copy-on-write payloads
//! Every message travels as an [`Envelope`] wrapping a [`payload::Payload`]:
//! an `Arc`-backed tuple of typed fields. Cloning a payload is O(1); mutating
//! one deep-clones only when its storage is actually shared (§4's COW
//! discipline for fan-out sends and the mailbox stash).
//!
//! ## Typed dispatch over type-erased storage
//! A [`Behavior`] is an ordered list of callbacks, each declaring the tuple
//! of field types it wants. Matching walks the list in order and calls the
//! first callback whose declared types line up with the payload's — the
//! "typed facade" that lets handler code be written as
//! `on1::<Delta>(|state, ctx, delta| ...)` while the runtime beneath it stays
//! fully type-erased.
//!
//! ## Work-stealing scheduler
//! A fixed pool of OS worker threads, each with a local run queue, steal
//! work from one another under a tiered backoff when idle (`scheduler`).
//! Actors that need to block get their own dedicated OS thread instead of
//! sharing the pool.
//!
//! ## Request/response correlation
//! [`ActorContext::request_then`]/[`ActorContext::request_await`] send a
//! correlated request, track its deadline, and resolve the matching
//! continuation when a response (or a synthesized `request_timeout`)
//! arrives. [`promise::ResponsePromise`] lets a handler defer a reply past the
//! callback that received the request, firing at most once. [`ask::ask`]
//! offers the same correlated request/response from outside any actor, for
//! callers (tests, admin endpoints) that have no handler of their own to
//! hang a continuation off.
//!
//! ## Supervision
//! Links (symmetric, `ActorContext::state_mut().add_link`) and monitors
//! (asymmetric) on [`actor::ActorContextState`] deliver [`actor::Exit`] and
//! [`actor::Down`] notifications when a peer terminates. The higher-level
//! `supervisor` module builds BEAM-style restart trees (`OneForOne`,
//! `OneForAll`, `RestForOne`) on top of the independent [`supervisor::Child`]
//! trait, deliberately uncoupled from [`Actor`] itself.
//!
//! ## Credit-based streaming
//! `stream::Source`/`stream::Stage`/`stream::Sink` compose a pipeline in
//! which a downstream side grants upstream credit and upstream never emits
//! past its current balance (§4.9).
//!
//! # Module Organization
//!
//! - [`actor`] — the `Actor` trait, `ActorContext`, lifecycle, links/monitors
//! - [`ask`] — blocking-receive style request/response for non-actor callers
//! - [`behavior`] — ordered typed message handlers
//! - [`payload`] — copy-on-write, type-erased message payloads
//! - [`message`] — the universal `Envelope` and its priority/correlation id
//! - [`mailbox`] — per-actor two-band priority queue with a stash
//! - [`scheduler`] — the work-stealing worker pool and execution engine
//! - [`request`] — per-actor request/response correlation table
//! - [`promise`] — deferred, exactly-once replies
//! - [`stream`] — credit-based streaming source/stage/sink roles
//! - [`supervisor`] — BEAM-style supervision trees and restart strategies
//! - [`monitoring`] — typed, queryable event recording for observability
//! - [`system`] — `ActorSystem`, configuration, and top-level error types
//! - [`util`] — `ActorId`, `ActorAddress`, `MessageId`
//! - [`error`] — `RuntimeError`, `ErrorKind`, `ExitReason`, renderer registry
//!
//! # Observability
//!
//! Scheduler, engine, and supervisor internals emit `tracing` spans/events
//! (§10.2) regardless of whether the typed `monitoring` event path is
//! enabled via [`system::SystemConfig::enable_metrics`] — the two are
//! complementary, not alternatives: `tracing` for human-facing logs, typed
//! `monitoring` events for queryable in-process assertions and snapshots
//! (tests, admin endpoints).

pub mod actor;
pub mod ask;
pub mod behavior;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod monitoring;
pub mod payload;
pub mod prelude;
pub mod promise;
pub mod request;
pub mod scheduler;
pub mod stream;
pub mod supervisor;
pub mod system;
pub mod util;

pub use actor::{Actor, ActorContext, ActorContextState, ActorLifecycle, ActorState, ErrorAction};
pub use ask::ask;
pub use behavior::{Behavior, DefaultPolicy, HandlerOutcome, HandlerResult};
pub use error::{ErrorCategory, ErrorKind, ExitReason, RuntimeError};
pub use message::{CorrelationId, Envelope, Priority};
pub use payload::Payload;
pub use promise::ResponsePromise;
pub use request::RequestOutcome;
pub use scheduler::{SchedulerConfig, SchedulerHandle};
pub use system::{ActorSystem, SystemConfig, SystemError};
pub use util::{ActorAddress, ActorId, MessageId};
