//! # Monitoring Module
//!
//! Universal monitoring infrastructure for observing and tracking events across all runtime components.
//!
//! ## Features
//! - **Generic Monitor<E> Trait**: Universal monitoring for any entity type
//! - **Zero-Cost Abstraction**: NoopMonitor compiles away when disabled
//! - **Lock-Free Recording**: Atomic counters for concurrent event tracking
//! - **Type Safety**: MonitoringEvent trait ensures compile-time correctness
//!
//! ## Event Types
//! - `SupervisionEvent`: Supervisor tree operations and failures
//! - `ActorEvent`: Actor lifecycle and message processing
//! - `SystemEvent`: Actor system-level events
//! - `MailboxEvent`: Mailbox operations and backpressure
//!
//! ## Examples
//! ```rust,no_run
//! use airssys_rt::monitoring::{ActorEvent, ActorEventKind, InMemoryMonitor, Monitor, MonitoringConfig};
//! use airssys_rt::util::ActorId;
//! use chrono::Utc;
//! use std::collections::HashMap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let monitor = InMemoryMonitor::<ActorEvent>::new(MonitoringConfig::default());
//! monitor
//!     .record(ActorEvent {
//!         timestamp: Utc::now(),
//!         actor_id: ActorId::new(),
//!         event_kind: ActorEventKind::Started,
//!         metadata: HashMap::new(),
//!     })
//!     .await?;
//! let snapshot = monitor.snapshot().await?;
//! assert_eq!(snapshot.total_events, 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod in_memory;
pub mod noop;
pub mod traits;
pub mod types;

pub use error::MonitoringError;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{
    ActorEvent, ActorEventKind, MailboxEvent, MailboxEventKind, MonitoringConfig,
    MonitoringSnapshot, SupervisionEvent, SupervisionEventKind, SystemEvent, SystemEventKind,
};
