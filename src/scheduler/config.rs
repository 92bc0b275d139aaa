//! Tunable knobs for the work-stealing scheduler (§4.4, §10.3).

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Configuration for the scheduler's worker pool: thread count, the
/// per-quantum fairness budget, and the three-tier idle backoff (§4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of OS worker threads in the pool. Defaults to the host's
    /// logical CPU count.
    pub worker_count: usize,
    /// Maximum number of envelopes a worker will run through a single actor
    /// before yielding it back to the run queue, so one busy actor cannot
    /// starve its siblings.
    pub max_throughput: usize,
    /// K1: number of zero-sleep steal attempts across sibling workers
    /// before backing off.
    pub k1_steal_attempts: u32,
    /// K2: number of short-sleep retries after K1 is exhausted.
    pub k2_attempts: u32,
    /// K2's sleep interval between retries.
    pub k2_sleep: Duration,
    /// K3: how long a worker parks waiting for new work once K1 and K2 have
    /// both failed to find any.
    pub k3_park_timeout: Duration,
    /// Interval at which a worker opportunistically checks deadlines
    /// (request timeouts, behavior inactivity timeouts) for the actor it is
    /// about to idle on, since there is no dedicated timer thread.
    pub heartbeat_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
            max_throughput: 64,
            k1_steal_attempts: 32,
            k2_attempts: 8,
            k2_sleep: Duration::from_micros(50),
            k3_park_timeout: Duration::from_millis(50),
            heartbeat_interval: Duration::from_millis(100),
        }
    }
}

impl SchedulerConfig {
    /// Sets the worker count, overriding the host CPU-count default.
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    /// Sets the per-quantum fairness budget.
    pub fn with_max_throughput(mut self, max_throughput: usize) -> Self {
        self.max_throughput = max_throughput.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_worker_count_matches_host() {
        let config = SchedulerConfig::default();
        assert_eq!(config.worker_count, num_cpus::get().max(1));
    }

    #[test]
    fn test_builder_overrides_clamp_to_at_least_one() {
        let config = SchedulerConfig::default()
            .with_worker_count(0)
            .with_max_throughput(0);
        assert_eq!(config.worker_count, 1);
        assert_eq!(config.max_throughput, 1);
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = SchedulerConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        let restored: SchedulerConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, restored);
    }
}
