//! Actor System Benchmarks
//!
//! Measures baseline performance of actor lifecycle operations:
//! - Single actor spawn latency
//! - Batch actor spawn (10 actors)
//! - Message processing throughput

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use airssys_rt::actor::RuntimeHandle;
use airssys_rt::{Actor, ActorContext, ActorSystem, Behavior, Envelope, HandlerOutcome, Payload, SystemConfig};

/// Simple test actor that accumulates a running count.
struct CounterActor {
    count: u64,
}

impl CounterActor {
    fn new() -> Self {
        Self { count: 0 }
    }
}

impl Actor for CounterActor {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new().on1::<u64>(|state, _ctx, value| {
            state.count += value;
            Ok(HandlerOutcome::NoReply)
        })
    }
}

/// Benchmark: Spawn a single actor (setup overhead)
fn actor_spawn_single(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("actor_spawn_single", |b| {
        b.iter(|| {
            let system = ActorSystem::new(SystemConfig::default());
            let id = system.spawn(CounterActor::new()).unwrap();
            rt.block_on(system.shutdown()).unwrap();
            black_box(id);
        });
    });
}

/// Benchmark: Spawn 10 actors in batch
fn actor_spawn_batch_small(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("actor_spawn_batch_small", |b| {
        b.iter(|| {
            let system = ActorSystem::new(SystemConfig::default());
            let ids: Vec<_> = (0..10).map(|_| system.spawn(CounterActor::new()).unwrap()).collect();
            rt.block_on(system.shutdown()).unwrap();
            black_box(ids);
        });
    });
}

/// Benchmark: Message processing throughput
fn actor_message_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("actor_message_throughput", |b| {
        b.to_async(&rt).iter(|| async {
            let system = ActorSystem::new(SystemConfig::default());
            let id = system.spawn(CounterActor::new()).unwrap();
            let handle = system.handle();

            for i in 0..100u64 {
                let _ = handle.send(id, Envelope::new(Payload::new((i,))));
            }

            system.shutdown().await.unwrap();
            black_box(id);
        });
    });
}

/// Configure criterion for resource-conscious benchmarking
fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30) // Reduced for resource constraints
        .measurement_time(Duration::from_secs(5)) // Shorter measurement
        .warm_up_time(Duration::from_secs(2)) // Shorter warm-up
        .without_plots() // Save disk I/O
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets =
        actor_spawn_single,
        actor_spawn_batch_small,
        actor_message_throughput
}

criterion_main!(benches);
