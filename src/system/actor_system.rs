//! The actor system: a running work-stealing scheduler pool plus the
//! system-level knobs layered over it (§4.4, §10.3).

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use parking_lot::Mutex;
use tracing::info;

// Layer 3: Internal
use super::{SystemConfig, SystemError};
use crate::actor::Actor;
use crate::scheduler::{SchedulerHandle, SchedulerPool};
use crate::util::ActorId;

/// Owns a running [`SchedulerPool`] and enforces the system-wide actor cap
/// from [`SystemConfig`] around its [`SchedulerHandle`].
///
/// # Examples
///
/// ```rust,no_run
/// use airssys_rt::{Actor, ActorContext, Behavior};
/// use airssys_rt::behavior::HandlerOutcome;
/// use airssys_rt::system::{ActorSystem, SystemConfig};
///
/// struct Echo;
/// impl Actor for Echo {
///     fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
///         Behavior::new().on0(|_s, _c| Ok(HandlerOutcome::NoReply))
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let system = ActorSystem::new(SystemConfig::default());
/// let _id = system.spawn(Echo).unwrap();
/// assert_eq!(system.actor_count(), 1);
/// system.shutdown().await.unwrap();
/// # }
/// ```
pub struct ActorSystem {
    pool: Mutex<Option<SchedulerPool>>,
    handle: SchedulerHandle,
    config: SystemConfig,
}

impl ActorSystem {
    /// Starts a scheduler pool sized per `config.scheduler` and wraps it.
    pub fn new(config: SystemConfig) -> Self {
        let pool = SchedulerPool::new(config.scheduler.clone());
        let handle = pool.handle();
        info!(worker_count = config.scheduler.worker_count, "actor system started");
        Self {
            pool: Mutex::new(Some(pool)),
            handle,
            config,
        }
    }

    /// The configuration this system was started with.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// A cheap-to-clone handle into the running scheduler, for code that
    /// needs to reach the runtime from outside an actor (e.g. a
    /// supervisor's [`crate::supervisor::Child`] adapter).
    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Number of actors currently registered with the scheduler.
    pub fn actor_count(&self) -> usize {
        self.handle.actor_count()
    }

    /// Whether [`ActorSystem::shutdown`] has already been called.
    pub fn is_shutting_down(&self) -> bool {
        self.pool.lock().is_none()
    }

    /// Spawns `actor` onto the shared worker pool (§4.4).
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::ShuttingDown`] if the system has already begun
    /// shutting down, or [`SystemError::ActorLimitExceeded`] if
    /// `config.max_actors` is non-zero and already reached.
    pub fn spawn<A>(&self, actor: A) -> Result<ActorId, SystemError>
    where
        A: Actor + Send + 'static,
    {
        self.check_capacity()?;
        Ok(self.handle.spawn(actor))
    }

    /// Spawns `actor` onto a dedicated OS thread instead of the shared pool
    /// (§4.4's dedicated-thread actors, for handlers that block).
    ///
    /// # Errors
    ///
    /// Same conditions as [`ActorSystem::spawn`].
    pub fn spawn_detached<A>(&self, actor: A) -> Result<ActorId, SystemError>
    where
        A: Actor + Send + 'static,
    {
        self.check_capacity()?;
        Ok(self.handle.spawn_detached(actor))
    }

    fn check_capacity(&self) -> Result<(), SystemError> {
        if self.is_shutting_down() {
            return Err(SystemError::ShuttingDown);
        }
        if self.config.max_actors > 0 {
            let current = self.actor_count();
            if current >= self.config.max_actors {
                return Err(SystemError::ActorLimitExceeded {
                    current,
                    max: self.config.max_actors,
                });
            }
        }
        Ok(())
    }

    /// Signals shutdown to every worker and blocks (off the async executor,
    /// via `spawn_blocking`) until all worker threads have joined, bounded
    /// by `config.shutdown_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::ShuttingDown`] if already shutting down, or
    /// [`SystemError::ShutdownTimeout`] if workers do not join in time.
    pub async fn shutdown(&self) -> Result<(), SystemError> {
        let Some(pool) = self.pool.lock().take() else {
            return Err(SystemError::ShuttingDown);
        };

        let timeout_duration = self.config.shutdown_timeout;
        let join = tokio::task::spawn_blocking(move || pool.shutdown());
        tokio::time::timeout(timeout_duration, join)
            .await
            .map_err(|_| SystemError::ShutdownTimeout(timeout_duration))?
            .map_err(|_| SystemError::ShutdownTimeout(timeout_duration))?;

        info!("actor system shut down");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::actor::ActorContext;
    use crate::behavior::{Behavior, HandlerOutcome};

    struct NoOp;
    impl Actor for NoOp {
        fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
            Behavior::new().on0(|_s, _c| Ok(HandlerOutcome::NoReply))
        }
    }

    #[tokio::test]
    async fn test_actor_system_creation() {
        let system = ActorSystem::new(SystemConfig::default());
        assert_eq!(system.actor_count(), 0);
        assert!(!system.is_shutting_down());
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_spawn() {
        let system = ActorSystem::new(SystemConfig::default());
        let _id = system.spawn(NoOp).unwrap();
        assert_eq!(system.actor_count(), 1);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_system_shutdown() {
        let system = ActorSystem::new(SystemConfig::default());
        assert!(system.shutdown().await.is_ok());
        assert!(system.is_shutting_down());
    }

    #[tokio::test]
    async fn test_double_shutdown_errors() {
        let system = ActorSystem::new(SystemConfig::default());
        system.shutdown().await.unwrap();
        let result = system.shutdown().await;
        assert!(matches!(result, Err(SystemError::ShuttingDown)));
    }

    #[tokio::test]
    async fn test_spawn_after_shutdown_errors() {
        let system = ActorSystem::new(SystemConfig::default());
        system.shutdown().await.unwrap();
        let result = system.spawn(NoOp);
        assert!(matches!(result, Err(SystemError::ShuttingDown)));
    }

    #[tokio::test]
    async fn test_actor_limit_enforced() {
        let config = SystemConfig::builder().with_max_actors(1).build().unwrap();
        let system = ActorSystem::new(config);

        assert!(system.spawn(NoOp).is_ok());
        let result = system.spawn(NoOp);
        assert!(matches!(
            result,
            Err(SystemError::ActorLimitExceeded { current: 1, max: 1 })
        ));
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_multiple_actors() {
        let system = ActorSystem::new(SystemConfig::default());
        system.spawn(NoOp).unwrap();
        system.spawn(NoOp).unwrap();
        system.spawn(NoOp).unwrap();
        assert_eq!(system.actor_count(), 3);
        system.shutdown().await.unwrap();
    }
}
