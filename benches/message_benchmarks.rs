//! Message Passing Benchmarks
//!
//! Measures baseline performance of message routing and delivery:
//! - Point-to-point mailbox send/receive latency
//! - Sustained mailbox throughput
//! - Fan-out send to multiple actors (10 actors)
//! - Mailbox enqueue/dequeue operations

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use airssys_rt::actor::RuntimeHandle;
use airssys_rt::mailbox::{AtomicMetrics, Mailbox};
use airssys_rt::{Actor, ActorContext, ActorSystem, Behavior, Envelope, HandlerOutcome, Payload, SystemConfig};

struct Sink;

impl Actor for Sink {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new().on1::<u64>(|_s, _ctx, _n| Ok(HandlerOutcome::NoReply))
    }
}

/// Benchmark: Point-to-point mailbox send/receive
fn message_send_receive(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("message_send_receive", |b| {
        b.to_async(&rt).iter(|| async {
            let (mut mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());

            sender.send(Envelope::new(Payload::new((1u64,)))).unwrap();
            let received = mailbox.recv().await;

            black_box(received);
        });
    });
}

/// Benchmark: Sustained mailbox throughput
fn message_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("message_throughput", |b| {
        b.to_async(&rt).iter(|| async {
            let (mut mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());

            for i in 0..100u64 {
                sender.send(Envelope::new(Payload::new((i,)))).unwrap();
            }

            let mut count = 0;
            while count < 100 {
                if mailbox.recv().await.is_some() {
                    count += 1;
                }
            }

            black_box(count);
        });
    });
}

/// Benchmark: Fan-out send to 10 actors
fn message_broadcast_small(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("message_broadcast_small", |b| {
        b.to_async(&rt).iter(|| async {
            let system = ActorSystem::new(SystemConfig::default());
            let handle = system.handle();
            let ids: Vec<_> = (0..10).map(|_| system.spawn(Sink).unwrap()).collect();

            for id in &ids {
                let _ = handle.send(*id, Envelope::new(Payload::new((1u64,))));
            }

            system.shutdown().await.unwrap();
            black_box(ids);
        });
    });
}

/// Benchmark: Mailbox enqueue/dequeue operations
fn mailbox_operations(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("mailbox_operations", |b| {
        b.to_async(&rt).iter(|| async {
            let (mailbox, sender) = Mailbox::<AtomicMetrics>::with_metrics(AtomicMetrics::new());

            for i in 0..100u64 {
                sender.send(Envelope::new(Payload::new((i,)))).unwrap();
            }

            black_box((mailbox, sender));
        });
    });
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
        message_send_receive,
        message_throughput,
        message_broadcast_small,
        mailbox_operations
}

criterion_main!(benches);
