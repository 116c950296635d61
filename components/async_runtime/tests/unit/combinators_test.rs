//! Unit tests for Promise.all, allSettled, race and any

use async_runtime::{Deferred, EventLoop, Promise, PromiseState, Task};
use core_types::{ErrorKind, Value};

fn later(event_loop: &mut EventLoop, settle: core_types::Function, value: Value) {
    event_loop.enqueue_task(Task::new(move || {
        settle.call(&[value])?;
        Ok(())
    }));
}

#[test]
fn all_empty_fulfills_with_empty_array() {
    let event_loop = EventLoop::new();
    let promise = Promise::all(&event_loop.scheduler(), Vec::new());
    assert_eq!(promise.outcome(), Some(Ok(Value::Array(vec![]))));
}

#[test]
fn all_keeps_input_order() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let slow = Promise::with_resolvers(&scheduler);
    let fast = Promise::with_resolvers(&scheduler);

    let all = Promise::all(
        &scheduler,
        vec![slow.promise.clone().into(), fast.promise.clone().into(), Value::Smi(3)],
    );
    later(&mut event_loop, fast.resolve.clone(), Value::Smi(2));
    later(&mut event_loop, slow.resolve.clone(), Value::Smi(1));

    event_loop.run_until_done().unwrap();
    assert_eq!(
        all.outcome(),
        Some(Ok(Value::Array(vec![Value::Smi(1), Value::Smi(2), Value::Smi(3)])))
    );
}

#[test]
fn all_rejects_with_first_reason() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let p1 = Promise::with_resolvers(&scheduler);
    let p2 = Promise::with_resolvers(&scheduler);

    let all = Promise::all(&scheduler, vec![p1.promise.clone().into(), p2.promise.clone().into()]);
    later(&mut event_loop, p2.reject.clone(), Value::from("p2 failed"));
    later(&mut event_loop, p1.resolve.clone(), Value::Smi(1));

    event_loop.run_until_done().unwrap();
    assert_eq!(all.outcome(), Some(Err(Value::from("p2 failed"))));
}

#[test]
fn all_settled_empty_fulfills_with_empty_array() {
    let event_loop = EventLoop::new();
    let promise = Promise::all_settled(&event_loop.scheduler(), Vec::new());
    assert_eq!(promise.outcome(), Some(Ok(Value::Array(vec![]))));
}

#[test]
fn all_settled_describes_each_input_in_order() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let a = Promise::with_resolvers(&scheduler);
    let b = Promise::with_resolvers(&scheduler);

    let settled = Promise::all_settled(&scheduler, vec![a.promise.clone().into(), b.promise.clone().into()]);
    later(&mut event_loop, b.reject.clone(), Value::from("x"));
    later(&mut event_loop, a.resolve.clone(), Value::Smi(1));

    event_loop.run_until_done().unwrap();
    let expected = Value::Array(vec![
        Value::record([("status", Value::from("fulfilled")), ("value", Value::Smi(1))]),
        Value::record([("status", Value::from("rejected")), ("reason", Value::from("x"))]),
    ]);
    assert_eq!(settled.outcome(), Some(Ok(expected)));
}

#[test]
fn race_empty_never_settles() {
    let mut event_loop = EventLoop::new();
    let promise = Promise::race(&event_loop.scheduler(), Vec::new());
    event_loop.run_until_done().unwrap();
    assert_eq!(promise.state(), PromiseState::Pending);
}

#[test]
fn race_takes_first_rejection() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let slow = Promise::with_resolvers(&scheduler);
    let fast = Promise::with_resolvers(&scheduler);

    let race = Promise::race(&scheduler, vec![slow.promise.clone().into(), fast.promise.clone().into()]);
    later(&mut event_loop, fast.reject.clone(), Value::from("fast"));
    later(&mut event_loop, slow.resolve.clone(), Value::from("slow"));

    event_loop.run_until_done().unwrap();
    assert_eq!(race.outcome(), Some(Err(Value::from("fast"))));
}

#[test]
fn race_with_plain_value_fulfills() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let Deferred { promise: never, .. } = Promise::with_resolvers(&scheduler);

    let race = Promise::race(&scheduler, vec![never.into(), Value::from("now")]);
    event_loop.run_until_done().unwrap();
    assert_eq!(race.outcome(), Some(Ok(Value::from("now"))));
}

#[test]
fn any_empty_rejects_with_empty_aggregate() {
    let event_loop = EventLoop::new();
    let promise = Promise::any(&event_loop.scheduler(), Vec::new());

    let reason = promise.result().unwrap();
    let error = reason.as_error().unwrap();
    assert_eq!(promise.state(), PromiseState::Rejected);
    assert_eq!(error.kind, ErrorKind::AggregateError);
    assert!(error.errors.is_empty());
}

#[test]
fn any_takes_first_fulfillment() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let a = Promise::with_resolvers(&scheduler);
    let b = Promise::with_resolvers(&scheduler);

    let any = Promise::any(&scheduler, vec![a.promise.clone().into(), b.promise.clone().into()]);
    later(&mut event_loop, a.reject.clone(), Value::from("a failed"));
    later(&mut event_loop, b.resolve.clone(), Value::from("b"));

    event_loop.run_until_done().unwrap();
    assert_eq!(any.outcome(), Some(Ok(Value::from("b"))));
}

#[test]
fn any_collects_reasons_in_input_order() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let a = Promise::with_resolvers(&scheduler);
    let b = Promise::with_resolvers(&scheduler);

    let any = Promise::any(&scheduler, vec![a.promise.clone().into(), b.promise.clone().into()]);
    later(&mut event_loop, b.reject.clone(), Value::from("b failed"));
    later(&mut event_loop, a.reject.clone(), Value::from("a failed"));

    event_loop.run_until_done().unwrap();
    let reason = any.result().unwrap();
    let error = reason.as_error().unwrap();
    assert_eq!(error.kind, ErrorKind::AggregateError);
    assert_eq!(error.errors, vec![Value::from("a failed"), Value::from("b failed")]);
}
