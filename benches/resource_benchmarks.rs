//! Resource Usage Benchmarks
//!
//! Measures baseline resource consumption:
//! - Memory footprint per actor (incremental: 1 → 10 → 50)
//! - Mailbox allocation overhead at scale

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

// Layer 3: Internal module imports
use airssys_rt::mailbox::{AtomicMetrics, Mailbox};
use airssys_rt::{Actor, ActorContext, ActorSystem, Behavior, HandlerOutcome, SystemConfig};

struct TestActor {
    #[allow(dead_code)]
    state: u64,
}

impl TestActor {
    fn new() -> Self {
        Self { state: 0 }
    }
}

impl Actor for TestActor {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new().on1::<u64>(|state, _ctx, value| {
            state.state += value;
            Ok(HandlerOutcome::NoReply)
        })
    }
}

/// Benchmark: Memory per actor (incremental scaling)
fn memory_per_actor_baseline(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("memory_per_actor");

    for actor_count in [1, 10, 50] {
        group.bench_with_input(
            BenchmarkId::from_parameter(actor_count),
            &actor_count,
            |b, &count| {
                b.iter(|| {
                    let system = ActorSystem::new(SystemConfig::default());
                    let ids: Vec<_> = (0..count).map(|_| system.spawn(TestActor::new()).unwrap()).collect();
                    rt.block_on(system.shutdown()).unwrap();
                    black_box(ids);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: Mailbox allocation overhead at scale
fn mailbox_memory_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("mailbox_memory");

    group.bench_function("mailbox_pairs_10", |b| {
        b.iter(|| {
            let pairs: Vec<_> = (0..10)
                .map(|_| Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new()))
                .collect();

            black_box(pairs);
        });
    });

    group.finish();
}

/// Configure criterion for resource-conscious benchmarking
fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets =
        memory_per_actor_baseline,
        mailbox_memory_scaling
}

criterion_main!(benches);
