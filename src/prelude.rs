//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits for
//! building actors with airssys-rt. Import this module to get started
//! quickly:
//!
//! ```rust
//! use airssys_rt::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Core Actor System
//! - [`Actor`] - Core trait for actors
//! - [`ActorContext`] - Actor execution context
//! - [`ActorLifecycle`] - Actor lifecycle tracking
//! - [`ActorState`] - Lifecycle state enum
//! - [`ErrorAction`] - Supervision decision enum
//!
//! ## Behaviors and Payloads
//! - [`Behavior`] - Ordered, typed message handlers
//! - [`HandlerOutcome`] - What a matched callback leaves behind
//! - [`Payload`] - Copy-on-write, type-erased message payload
//! - [`Envelope`] - The universal message envelope
//! - [`Priority`] - Mailbox priority band
//!
//! ## System
//! - [`ActorSystem`] - Owns a running scheduler pool
//! - [`SystemConfig`] - Actor system configuration
//!
//! ## Requests
//! - [`ask`] - Blocking-receive style request/response for non-actor callers
//!
//! ## Supervision
//! - [`Child`] - Trait for supervised entities
//! - [`Supervisor`] - Supervisor trait
//! - [`SupervisorNode`] - Supervisor implementation
//! - [`OneForOne`] - Independent child strategy
//! - [`OneForAll`] - Restart all strategy
//! - [`RestForOne`] - Restart following strategy
//! - [`RestartPolicy`] - When to restart (Permanent, Transient, Temporary)
//! - [`ShutdownPolicy`] - How to stop (Graceful, Immediate)
//! - [`ChildSpec`] - Child specification
//! - [`ChildHealth`] - Health status enum
//! - [`ChildState`] - Child lifecycle state
//!
//! ## Monitoring
//! - [`Monitor`] - Core monitoring trait
//! - [`InMemoryMonitor`] - Recording monitor
//! - [`NoopMonitor`] - Zero-overhead no-op monitor
//! - [`MonitoringEvent`] - Trait for events
//! - [`EventSeverity`] - Event severity levels
//! - [`ActorEvent`] - Actor lifecycle events
//! - [`SupervisionEvent`] - Supervision events
//! - [`MailboxEvent`] - Mailbox events
//!
//! ## Utilities
//! - [`ActorAddress`] - Actor address type
//! - [`ActorId`] - Actor identifier
//! - [`MessageId`] - Message identifier
//!
//! # Example
//!
//! ```rust
//! use airssys_rt::prelude::*;
//!
//! struct MyActor {
//!     count: u64,
//! }
//!
//! impl Actor for MyActor {
//!     fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
//!         Behavior::new().on0(|state, _ctx| {
//!             state.count += 1;
//!             Ok(HandlerOutcome::NoReply)
//!         })
//!     }
//! }
//! ```

// Core actor system
pub use crate::actor::{Actor, ActorContext, ActorLifecycle, ActorState, ErrorAction};
pub use crate::ask::ask;

// Behaviors and payloads
pub use crate::behavior::{Behavior, DefaultPolicy, HandlerOutcome, HandlerResult};
pub use crate::message::{Envelope, Priority};
pub use crate::payload::Payload;

// System
pub use crate::system::{ActorSystem, SystemConfig};

// Supervision
pub use crate::supervisor::{
    Child, ChildHealth, ChildId, ChildSpec, ChildState, OneForAll, OneForOne, RestForOne,
    RestartPolicy, ShutdownPolicy, Supervisor, SupervisorNode,
};

// Monitoring
pub use crate::monitoring::{
    ActorEvent, EventSeverity, InMemoryMonitor, MailboxEvent, Monitor, MonitoringEvent,
    NoopMonitor, SupervisionEvent,
};

// Utilities
pub use crate::util::{ActorAddress, ActorId, MessageId};
