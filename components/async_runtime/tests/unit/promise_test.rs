//! Unit tests for Promise

use super::{returns, throws, Log};
use async_runtime::{Deferred, EventLoop, Promise, PromiseState, Task};
use core_types::{ErrorKind, Function, JsError, Value};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn new_promise_is_pending() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.scheduler(), |_, _| Ok(()));
    assert_eq!(promise.state(), PromiseState::Pending);
    assert!(promise.result().is_none());
}

#[test]
fn executor_runs_synchronously() {
    let event_loop = EventLoop::new();
    let log = Log::new();
    let inner = log.clone();
    Promise::new(&event_loop.scheduler(), move |_, _| {
        inner.push("executor");
        Ok(())
    });
    log.push("after");
    assert_eq!(log.entries(), vec!["executor", "after"]);
}

#[test]
fn executor_throw_rejects() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.scheduler(), |_, _| Err(Value::from("bad")));
    assert_eq!(promise.outcome(), Some(Err(Value::from("bad"))));
}

#[test]
fn executor_throw_after_resolve_is_ignored() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.scheduler(), |resolve, _| {
        resolve.call(&[Value::Smi(1)])?;
        Err(Value::from("late"))
    });
    assert_eq!(promise.outcome(), Some(Ok(Value::Smi(1))));
}

#[test]
fn first_settlement_wins() {
    let event_loop = EventLoop::new();
    let Deferred {
        promise,
        resolve,
        reject,
    } = Promise::with_resolvers(&event_loop.scheduler());

    reject.call(&[Value::from("first")]).unwrap();
    resolve.call(&[Value::Smi(2)]).unwrap();
    reject.call(&[Value::from("second")]).unwrap();

    assert_eq!(promise.state(), PromiseState::Rejected);
    assert_eq!(promise.result(), Some(Value::from("first")));
}

#[test]
fn static_resolve_returns_same_promise() {
    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let original = Promise::resolve(&scheduler, Value::Smi(1));
    let again = Promise::resolve(&scheduler, original.clone().into());
    assert!(again.ptr_eq(&original));
}

#[test]
fn static_reject_always_wraps() {
    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let original = Promise::resolve(&scheduler, Value::Smi(1));
    let rejected = Promise::reject(&scheduler, original.clone().into());

    assert!(!rejected.ptr_eq(&original));
    assert_eq!(rejected.state(), PromiseState::Rejected);
    let reason = rejected.result().unwrap();
    assert!(Promise::from_value(&reason).unwrap().ptr_eq(&original));
}

#[test]
fn handler_never_runs_synchronously() {
    let mut event_loop = EventLoop::new();
    let log = Log::new();
    let promise = Promise::resolve(&event_loop.scheduler(), Value::Smi(1));

    promise.then(Some(log.pass("then")), None);
    log.push("sync");
    assert_eq!(log.entries(), vec!["sync"]);

    event_loop.run_until_done().unwrap();
    assert_eq!(log.entries(), vec!["sync", "then:1"]);
}

#[test]
fn handler_does_not_run_inside_settling_call() {
    let mut event_loop = EventLoop::new();
    let log = Log::new();
    let Deferred {
        promise, resolve, ..
    } = Promise::with_resolvers(&event_loop.scheduler());

    promise.then(Some(log.pass("then")), None);
    resolve.call(&[Value::Smi(7)]).unwrap();
    assert!(log.entries().is_empty());

    event_loop.run_until_done().unwrap();
    assert_eq!(log.entries(), vec!["then:7"]);
}

#[test]
fn handlers_run_in_registration_order() {
    let mut event_loop = EventLoop::new();
    let log = Log::new();
    let Deferred {
        promise, resolve, ..
    } = Promise::with_resolvers(&event_loop.scheduler());

    promise.then(Some(log.pass("a")), None);
    promise.then(Some(log.pass("b")), None);
    promise.then(Some(log.pass("c")), None);
    resolve.call(&[Value::Smi(0)]).unwrap();

    event_loop.run_until_done().unwrap();
    assert_eq!(log.entries(), vec!["a:0", "b:0", "c:0"]);
}

#[test]
fn reaction_registered_by_running_handler_runs_after_queued_ones() {
    let mut event_loop = EventLoop::new();
    let log = Log::new();
    let promise = Promise::resolve(&event_loop.scheduler(), Value::Smi(1));

    let source = promise.clone();
    let nested_log = log.clone();
    promise.then(
        Some(Function::unary(move |value| {
            nested_log.push("first");
            source.then(Some(nested_log.pass("nested")), None);
            Ok(value)
        })),
        None,
    );
    promise.then(Some(log.pass("second")), None);

    event_loop.run_until_done().unwrap();
    assert_eq!(log.entries(), vec!["first", "second:1", "nested:1"]);
}

#[test]
fn chains_interleave_by_depth() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let log = Log::new();

    Promise::resolve(&scheduler, Value::Smi(1))
        .then(Some(log.pass("a1")), None)
        .then(Some(log.pass("a2")), None);
    Promise::resolve(&scheduler, Value::Smi(2))
        .then(Some(log.pass("b1")), None)
        .then(Some(log.pass("b2")), None);

    event_loop.run_until_done().unwrap();
    assert_eq!(log.entries(), vec!["a1:1", "b1:2", "a2:1", "b2:2"]);
}

#[test]
fn fulfilled_value_passes_through_missing_handler() {
    let mut event_loop = EventLoop::new();
    let promise = Promise::resolve(&event_loop.scheduler(), Value::Smi(3))
        .then(None, Some(returns(Value::Smi(0))))
        .catch(None);

    event_loop.run_until_done().unwrap();
    assert_eq!(promise.outcome(), Some(Ok(Value::Smi(3))));
}

#[test]
fn rejection_passes_through_missing_handler() {
    let mut event_loop = EventLoop::new();
    let log = Log::new();
    let promise = Promise::reject(&event_loop.scheduler(), Value::from("x"))
        .then(Some(log.pass("skipped")), None)
        .then(Some(log.pass("skipped")), None);

    event_loop.run_until_done().unwrap();
    assert!(log.entries().is_empty());
    assert_eq!(promise.outcome(), Some(Err(Value::from("x"))));
}

#[test]
fn handler_return_value_fulfills_derived() {
    let mut event_loop = EventLoop::new();
    let doubled = Promise::resolve(&event_loop.scheduler(), Value::Smi(21)).then(
        Some(Function::unary(|value| match value {
            Value::Smi(n) => Ok(Value::Smi(n * 2)),
            other => Ok(other),
        })),
        None,
    );

    event_loop.run_until_done().unwrap();
    assert_eq!(doubled.outcome(), Some(Ok(Value::Smi(42))));
}

#[test]
fn handler_throw_rejects_derived() {
    let mut event_loop = EventLoop::new();
    let error: Value = JsError::type_error("nope").into();
    let derived = Promise::resolve(&event_loop.scheduler(), Value::Smi(1))
        .then(Some(throws(error.clone())), None);

    event_loop.run_until_done().unwrap();
    assert_eq!(derived.outcome(), Some(Err(error)));
}

#[test]
fn catch_recovers_into_fulfillment() {
    let mut event_loop = EventLoop::new();
    let recovered = Promise::reject(&event_loop.scheduler(), Value::from("boom"))
        .catch(Some(returns(Value::from("recovered"))));

    event_loop.run_until_done().unwrap();
    assert_eq!(recovered.state(), PromiseState::Fulfilled);
    assert_eq!(recovered.result(), Some(Value::from("recovered")));
}

#[test]
fn catch_rethrow_keeps_chain_rejected() {
    let mut event_loop = EventLoop::new();
    let log = Log::new();
    let chained = Promise::reject(&event_loop.scheduler(), Value::from("boom"))
        .catch(Some(log.rethrow("caught")))
        .then(Some(log.pass("skipped")), None);

    event_loop.run_until_done().unwrap();
    assert_eq!(log.entries(), vec!["caught:boom"]);
    assert_eq!(chained.outcome(), Some(Err(Value::from("boom"))));
}

#[test]
fn handler_returning_promise_is_flattened() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let inner_scheduler = scheduler.clone();
    let outer = Promise::resolve(&scheduler, Value::Smi(1)).then(
        Some(Function::unary(move |_| {
            Ok(Promise::resolve(&inner_scheduler, Value::from("inner")).into())
        })),
        None,
    );

    event_loop.run_until_done().unwrap();
    assert_eq!(outer.outcome(), Some(Ok(Value::from("inner"))));
}

#[test]
fn handler_returning_its_own_derived_promise_rejects_with_type_error() {
    let mut event_loop = EventLoop::new();
    let holder: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));

    let source = Promise::resolve(&event_loop.scheduler(), Value::Smi(1));
    let returned = holder.clone();
    let derived = source.then(
        Some(Function::unary(move |_| {
            Ok(returned.borrow().clone().unwrap_or(Value::Undefined))
        })),
        None,
    );
    *holder.borrow_mut() = Some(derived.clone().into());

    event_loop.run_until_done().unwrap();
    let reason = derived.result().unwrap();
    assert_eq!(derived.state(), PromiseState::Rejected);
    assert_eq!(reason.as_error().map(|e| e.kind.clone()), Some(ErrorKind::TypeError));
    holder.borrow_mut().take();
}

#[test]
fn settlement_in_later_task_runs_handlers_then() {
    let mut event_loop = EventLoop::new();
    let log = Log::new();
    let Deferred {
        promise, resolve, ..
    } = Promise::with_resolvers(&event_loop.scheduler());
    promise.then(Some(log.pass("then")), None);

    let task_log = log.clone();
    event_loop.enqueue_task(Task::new(move || {
        task_log.push("task");
        resolve.call(&[Value::from("late")])?;
        Ok(())
    }));

    event_loop.run_until_done().unwrap();
    assert_eq!(log.entries(), vec!["task", "then:late"]);
}

#[test]
fn finally_passes_value_through() {
    let mut event_loop = EventLoop::new();
    let log = Log::new();
    let promise = Promise::resolve(&event_loop.scheduler(), Value::Smi(5))
        .finally(Some(log.pass("finally")));

    event_loop.run_until_done().unwrap();
    assert_eq!(log.entries(), vec!["finally:undefined"]);
    assert_eq!(promise.outcome(), Some(Ok(Value::Smi(5))));
}

#[test]
fn finally_passes_reason_through() {
    let mut event_loop = EventLoop::new();
    let promise = Promise::reject(&event_loop.scheduler(), Value::from("x"))
        .finally(Some(returns(Value::Smi(99))));

    event_loop.run_until_done().unwrap();
    assert_eq!(promise.outcome(), Some(Err(Value::from("x"))));
}

#[test]
fn finally_throw_overrides_outcome() {
    let mut event_loop = EventLoop::new();
    let promise = Promise::resolve(&event_loop.scheduler(), Value::Smi(5))
        .finally(Some(throws(Value::from("cleanup failed"))));

    event_loop.run_until_done().unwrap();
    assert_eq!(promise.outcome(), Some(Err(Value::from("cleanup failed"))));
}

#[test]
fn finally_waits_for_returned_promise() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let Deferred {
        promise: gate,
        resolve: open,
        ..
    } = Promise::with_resolvers(&scheduler);

    let gate_value: Value = gate.into();
    let promise = Promise::resolve(&scheduler, Value::Smi(5)).finally(Some(returns(gate_value)));

    event_loop.run_all_microtasks().unwrap();
    assert!(promise.is_pending());

    open.call(&[Value::from("ignored")]).unwrap();
    event_loop.run_until_done().unwrap();
    assert_eq!(promise.outcome(), Some(Ok(Value::Smi(5))));
}

#[test]
fn finally_rejected_result_overrides_outcome() {
    let mut event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let failing: Value = Promise::reject(&scheduler, Value::from("late failure")).into();
    let promise = Promise::resolve(&scheduler, Value::Smi(5)).finally(Some(returns(failing)));

    event_loop.run_until_done().unwrap();
    assert_eq!(promise.outcome(), Some(Err(Value::from("late failure"))));
}

#[test]
fn finally_without_callback_passes_through() {
    let mut event_loop = EventLoop::new();
    let promise = Promise::reject(&event_loop.scheduler(), Value::Smi(1)).finally(None);

    event_loop.run_until_done().unwrap();
    assert_eq!(promise.outcome(), Some(Err(Value::Smi(1))));
}

#[test]
fn promise_then_member_is_callable() {
    let mut event_loop = EventLoop::new();
    let log = Log::new();
    let promise: Value = Promise::resolve(&event_loop.scheduler(), Value::Smi(8)).into();

    let then = promise.get_then().unwrap();
    let derived = then
        .as_function()
        .unwrap()
        .call(&[Value::Function(log.pass("member"))])
        .unwrap();

    event_loop.run_until_done().unwrap();
    assert_eq!(log.entries(), vec!["member:8"]);
    let derived = Promise::from_value(&derived).unwrap();
    assert_eq!(derived.outcome(), Some(Ok(Value::Smi(8))));
}

#[test]
fn dropping_long_pending_chain_does_not_overflow() {
    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();

    let deferred = Promise::with_resolvers(&scheduler);
    let mut tail = deferred.promise.clone();
    for _ in 0..100_000 {
        tail = tail.then(None, None);
    }
    drop(tail);
    drop(deferred);

    // Head released first while the tail is still held
    let deferred = Promise::with_resolvers(&scheduler);
    let mut tail = deferred.promise.clone();
    for _ in 0..100_000 {
        tail = tail.then(None, None);
    }
    drop(deferred);
    assert_eq!(tail.state(), PromiseState::Pending);
    drop(tail);
}

#[test]
fn dropping_long_adoption_chain_does_not_overflow() {
    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();

    let head = Promise::with_resolvers(&scheduler);
    let mut inner = head.promise.clone();
    for _ in 0..100_000 {
        let outer = Promise::with_resolvers(&scheduler);
        outer.resolve.call(&[inner.into()]).unwrap();
        inner = outer.promise;
    }
    drop(inner);
    drop(head);
}
