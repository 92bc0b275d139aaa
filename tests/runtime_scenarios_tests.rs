//! End-to-end scenarios exercising the runtime across real scheduler
//! threads, not just unit-level state machines. Coverage:
//! - `ask` round trip and its error path
//! - error-handler-only invocation on a non-request message
//! - link propagation plus a monitor observing a down-message
//! - stashed rematch across a `become_behavior` switch
//! - await LIFO ordering across three outstanding requests
//! - delegation skipping the delegating actor's own reply path
//! - a streaming pipeline with a filtering stage

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use airssys_rt::actor::{Actor, ActorContext, ErrorAction, RuntimeHandle};
use airssys_rt::ask::ask;
use airssys_rt::error::{ErrorKind, ExitReason, RuntimeError};
use airssys_rt::stream::{Sink, Source, Stage};
use airssys_rt::{
    ActorId, ActorSystem, Behavior, DefaultPolicy, Envelope, HandlerOutcome, Payload, SystemConfig,
};

/// Polls `condition` until it's true or `timeout` elapses, sleeping briefly
/// between checks. Scheduler workers run on their own OS threads, so a test
/// on the `#[tokio::test]` executor has no other way to observe completion.
async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

struct Adder;

impl Actor for Adder {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new().on2::<i64, i64>(|_state, _ctx, a, b| {
            Ok(HandlerOutcome::Reply(Payload::new((a + b,))))
        })
    }
}

#[tokio::test]
async fn test_ask_arithmetic_round_trip() {
    let system = ActorSystem::new(SystemConfig::default());
    let adder = system.spawn(Adder).unwrap();

    let outcome = ask(&system, adder, Payload::new((3i64, 4i64))).await.unwrap();
    let sum: i64 = *outcome.get(0).unwrap();
    assert_eq!(sum, 7);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_ask_against_unknown_actor_errors_immediately() {
    let system = ActorSystem::new(SystemConfig::default());
    let ghost = ActorId::new();

    let outcome = ask(&system, ghost, Payload::new((1i64,))).await;
    assert!(outcome.is_err());

    system.shutdown().await.unwrap();
}

struct Divider {
    errors_seen: Arc<Mutex<Vec<ErrorKind>>>,
}

impl Actor for Divider {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new().on2::<i64, i64>(|_state, _ctx, numerator, denominator| {
            if denominator == 0 {
                return Err(RuntimeError::with_context(
                    ErrorKind::InvalidArgument,
                    "division by zero",
                ));
            }
            Ok(HandlerOutcome::NoReply)
        })
    }

    fn on_error(&mut self, _ctx: &mut ActorContext<'_>, error: &RuntimeError) -> ErrorAction {
        self.errors_seen.lock().unwrap().push(error.kind());
        ErrorAction::Resume
    }
}

#[tokio::test]
async fn test_division_by_zero_invokes_error_handler_only() {
    let system = ActorSystem::new(SystemConfig::default());
    let errors_seen = Arc::new(Mutex::new(Vec::new()));
    let divider = system.spawn(Divider { errors_seen: errors_seen.clone() }).unwrap();

    // A plain cast (no correlation id), not a request: the engine routes the
    // handler's error straight to `on_error` instead of synthesizing a reply.
    system
        .handle()
        .send(divider, Envelope::new(Payload::new((10i64, 0i64))))
        .unwrap();

    let saw_error = wait_until(Duration::from_secs(2), || !errors_seen.lock().unwrap().is_empty()).await;
    assert!(saw_error, "on_error was never invoked");
    assert_eq!(errors_seen.lock().unwrap().as_slice(), [ErrorKind::InvalidArgument]);

    system.shutdown().await.unwrap();
}

#[derive(Debug, Clone)]
struct AddLink(ActorId);
#[derive(Debug, Clone)]
struct AddMonitor(ActorId);
#[derive(Debug, Clone)]
struct Crash;

struct Peer {
    downs_seen: Arc<Mutex<Vec<(ActorId, ExitReason)>>>,
}

impl Actor for Peer {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new()
            .on1::<AddLink>(|_state, ctx, msg| {
                ctx.state_mut().add_link(msg.0);
                Ok(HandlerOutcome::NoReply)
            })
            .on1::<AddMonitor>(|_state, ctx, msg| {
                ctx.state_mut().add_monitor(msg.0);
                Ok(HandlerOutcome::NoReply)
            })
            .on1::<Crash>(|_state, _ctx, _msg| {
                Err(RuntimeError::new(ErrorKind::RuntimeError))
            })
    }

    fn on_down(&mut self, _ctx: &mut ActorContext<'_>, who: ActorId, reason: &ExitReason) {
        self.downs_seen.lock().unwrap().push((who, reason.clone()));
    }
}

#[tokio::test]
async fn test_link_propagation_and_monitor_down_message() {
    let system = ActorSystem::new(SystemConfig::default());
    let downs_a = Arc::new(Mutex::new(Vec::new()));
    let downs_b = Arc::new(Mutex::new(Vec::new()));
    let downs_m = Arc::new(Mutex::new(Vec::new()));

    let a = system.spawn(Peer { downs_seen: downs_a }).unwrap();
    let b = system.spawn(Peer { downs_seen: downs_b }).unwrap();
    let m = system.spawn(Peer { downs_seen: downs_m.clone() }).unwrap();

    let handle = system.handle();
    handle.send(a, Envelope::new(Payload::new((AddLink(b),)))).unwrap();
    handle.send(b, Envelope::new(Payload::new((AddLink(a),)))).unwrap();
    handle.send(b, Envelope::new(Payload::new((AddMonitor(m),)))).unwrap();

    // Let the link/monitor registration messages land before crashing `a` —
    // these are plain casts with no reply to await on.
    tokio::time::sleep(Duration::from_millis(50)).await;

    handle.send(a, Envelope::new(Payload::new((Crash,)))).unwrap();

    let saw_down = wait_until(Duration::from_secs(2), || !downs_m.lock().unwrap().is_empty()).await;
    assert!(saw_down, "monitor never observed a down-message for b");

    let downs = downs_m.lock().unwrap();
    assert_eq!(downs.len(), 1, "monitor should observe exactly one down-message");
    let (who, reason) = &downs[0];
    assert_eq!(*who, b);
    assert!(!reason.is_normal());

    system.shutdown().await.unwrap();
}

struct Switcher {
    log: Arc<Mutex<Vec<String>>>,
}

impl Actor for Switcher {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new()
            .on1::<i32>(|state, ctx, n| {
                state.log.lock().unwrap().push(format!("int:{n}"));
                ctx.become_behavior(Behavior::new().on1::<f64>(|state, _ctx, f| {
                    state.log.lock().unwrap().push(format!("float:{f}"));
                    Ok(HandlerOutcome::NoReply)
                }));
                Ok(HandlerOutcome::NoReply)
            })
            .with_default_policy(DefaultPolicy::Skip)
    }
}

#[tokio::test]
async fn test_stashed_rematch_after_become() {
    let system = ActorSystem::new(SystemConfig::default());
    let log = Arc::new(Mutex::new(Vec::new()));
    let switcher = system.spawn(Switcher { log: log.clone() }).unwrap();

    let handle = system.handle();
    // Float arrives first: the int-only behavior can't match it, so the
    // default "skip" policy stashes it. The int that follows is what
    // actually changes the behavior.
    handle.send(switcher, Envelope::new(Payload::new((3.5f64,)))).unwrap();
    handle.send(switcher, Envelope::new(Payload::new((7i32,)))).unwrap();

    let done = wait_until(Duration::from_secs(2), || log.lock().unwrap().len() >= 2).await;
    assert!(done, "stashed float was never replayed after become");
    assert_eq!(*log.lock().unwrap(), vec!["int:7".to_string(), "float:3.5".to_string()]);

    system.shutdown().await.unwrap();
}

struct Cell {
    value: i64,
}

impl Actor for Cell {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new().on0(|state, _ctx| Ok(HandlerOutcome::Reply(Payload::new((state.value,)))))
    }
}

struct Collector {
    cell_zero: ActorId,
    cell_one: ActorId,
    cell_four: ActorId,
    order: Arc<Mutex<Vec<i64>>>,
}

impl Actor for Collector {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new().on0(|state, ctx| {
            let order = state.order.clone();
            ctx.request_await::<Self, _>(state.cell_zero, Payload::new(()), move |_state, _ctx, outcome| {
                order.lock().unwrap().push(*outcome.unwrap().get::<i64>(0).unwrap());
                Ok(HandlerOutcome::NoReply)
            })?;
            let order = state.order.clone();
            ctx.request_await::<Self, _>(state.cell_one, Payload::new(()), move |_state, _ctx, outcome| {
                order.lock().unwrap().push(*outcome.unwrap().get::<i64>(0).unwrap());
                Ok(HandlerOutcome::NoReply)
            })?;
            let order = state.order.clone();
            ctx.request_await::<Self, _>(state.cell_four, Payload::new(()), move |_state, _ctx, outcome| {
                order.lock().unwrap().push(*outcome.unwrap().get::<i64>(0).unwrap());
                Ok(HandlerOutcome::NoReply)
            })?;
            Ok(HandlerOutcome::NoReply)
        })
    }
}

#[tokio::test]
async fn test_await_lifo_fires_last_sent_request_first() {
    let system = ActorSystem::new(SystemConfig::default());
    let cell_zero = system.spawn(Cell { value: 0 }).unwrap();
    let cell_one = system.spawn(Cell { value: 1 }).unwrap();
    let cell_four = system.spawn(Cell { value: 4 }).unwrap();

    let order = Arc::new(Mutex::new(Vec::new()));
    let collector = system
        .spawn(Collector { cell_zero, cell_one, cell_four, order: order.clone() })
        .unwrap();

    system
        .handle()
        .send(collector, Envelope::new(Payload::new(())))
        .unwrap();

    let done = wait_until(Duration::from_secs(2), || order.lock().unwrap().len() == 3).await;
    assert!(done, "not all three awaited responses arrived");
    assert_eq!(*order.lock().unwrap(), vec![4, 1, 0]);

    system.shutdown().await.unwrap();
}

struct Answerer;

impl Actor for Answerer {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new().on1::<i64>(|_state, _ctx, n| Ok(HandlerOutcome::Reply(Payload::new((n * 10,)))))
    }
}

struct Delegator {
    target: ActorId,
    touched: Arc<Mutex<bool>>,
}

impl Actor for Delegator {
    fn initial_behavior(&mut self, _ctx: &mut ActorContext<'_>) -> Behavior<Self> {
        Behavior::new().on1::<i64>(|state, ctx, n| {
            *state.touched.lock().unwrap() = true;
            ctx.delegate(state.target, Payload::new((n,)))?;
            Ok(HandlerOutcome::NoReply)
        })
    }
}

#[tokio::test]
async fn test_delegation_skips_the_delegator_reply_path() {
    let system = ActorSystem::new(SystemConfig::default());
    let answerer = system.spawn(Answerer).unwrap();
    let touched = Arc::new(Mutex::new(false));
    let delegator = system
        .spawn(Delegator { target: answerer, touched: touched.clone() })
        .unwrap();

    let outcome = ask(&system, delegator, Payload::new((6i64,))).await.unwrap();
    let result: i64 = *outcome.get(0).unwrap();
    assert_eq!(result, 60);
    assert!(*touched.lock().unwrap(), "delegator's own handler should still run");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stream_pipeline_even_filter() {
    let system = ActorSystem::new(SystemConfig::default());
    let handle = system.handle();

    let received = Arc::new(Mutex::new(Vec::new()));
    let finished = Arc::new(Mutex::new(None));

    let mut remaining = (0..10i32).collect::<Vec<_>>().into_iter();

    // Spawn in dependency order: a stage needs its upstream's id at
    // construction, and a sink needs its upstream's id too.
    let source = handle.spawn(Source::new(4, move || remaining.next()));
    let received_for_item = received.clone();
    let finished_for_end = finished.clone();
    let stage: Stage<i32, i32, _> =
        Stage::new(source, |n| if n % 2 == 0 { Some(n) } else { None });
    let stage_actor = handle.spawn(stage);
    let sink = handle.spawn(Sink::new(
        stage_actor,
        4,
        move |item: i32| received_for_item.lock().unwrap().push(item),
        move |result| *finished_for_end.lock().unwrap() = Some(result),
    ));
    let _ = sink;

    let done = wait_until(Duration::from_secs(2), || finished.lock().unwrap().is_some()).await;
    assert!(done, "stream never reached end of stream");
    assert_eq!(*received.lock().unwrap(), vec![0, 2, 4, 6, 8]);
    assert!(finished.lock().unwrap().clone().unwrap().is_ok());

    system.shutdown().await.unwrap();
}
