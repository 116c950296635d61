//! Built-in conformance scenarios.
//!
//! Each scenario is named after the Promises/A+ clause it checks (or the
//! combinator it exercises) and runs on a fresh event loop.

use crate::adapter::Adapter;
use async_runtime::{Deferred, EventLoop, EventLoopConfig, Promise, PromiseState, RuntimeError, Task};
use core_types::{argument, ErrorKind, Function, JsResult, Thenable, Value};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Why a scenario check failed.
#[derive(Debug, Error)]
pub enum CheckError {
    /// An expectation did not hold
    #[error("{0}")]
    Assertion(String),

    /// The scenario itself threw
    #[error("scenario threw: {0}")]
    Thrown(Value),

    /// The event loop failed
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl From<Value> for CheckError {
    fn from(thrown: Value) -> Self {
        CheckError::Thrown(thrown)
    }
}

/// Result of one scenario check
pub type CheckResult = Result<(), CheckError>;

/// A fresh event loop and an adapter feeding it.
pub struct ScenarioContext {
    /// Loop every scenario promise schedules onto
    pub event_loop: EventLoop,
    /// Factory for scenario promises
    pub adapter: Adapter,
}

impl ScenarioContext {
    /// Creates a context running with `config`.
    pub fn new(config: EventLoopConfig) -> Self {
        let event_loop = EventLoop::with_config(config);
        let adapter = Adapter::new(event_loop.scheduler());
        Self { event_loop, adapter }
    }

    /// Runs the loop until no task or microtask is left.
    pub fn run(&mut self) -> CheckResult {
        self.event_loop.run_until_done()?;
        Ok(())
    }

    /// Calls `settle` with `value` from a later task.
    pub fn later(&mut self, settle: &Function, value: Value) {
        let settle = settle.clone();
        self.event_loop.enqueue_task(Task::new(move || {
            settle.call(&[value])?;
            Ok(())
        }));
    }
}

/// One named check.
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Clause number and short description
    pub name: &'static str,
    /// The check itself
    pub check: fn(&mut ScenarioContext) -> CheckResult,
}

impl Scenario {
    const fn new(name: &'static str, check: fn(&mut ScenarioContext) -> CheckResult) -> Self {
        Self { name, check }
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

/// Every built-in scenario, in clause order.
pub fn all_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("2.1.2 fulfilled promise never changes state", fulfilled_is_final),
        Scenario::new("2.1.3 rejected promise never changes state", rejected_is_final),
        Scenario::new("2.2.1 non-function arguments are ignored", non_function_arguments_ignored),
        Scenario::new("2.2.2 onFulfilled runs once with the value", on_fulfilled_runs_once),
        Scenario::new("2.2.3 onRejected runs once with the reason", on_rejected_runs_once),
        Scenario::new("2.2.4 handlers run asynchronously", handlers_run_asynchronously),
        Scenario::new("2.2.6 handlers run in registration order", handlers_run_in_order),
        Scenario::new("2.2.7 then returns a new promise", then_returns_new_promise),
        Scenario::new("2.2.7.1 handler result resolves derived promise", handler_result_resolves),
        Scenario::new("2.2.7.2 handler throw rejects derived promise", handler_throw_rejects),
        Scenario::new("2.2.7.3 value passes through missing handler", value_passes_through),
        Scenario::new("2.2.7.4 reason passes through missing handler", reason_passes_through),
        Scenario::new("2.3.1 resolving with itself is a TypeError", self_resolution_rejects),
        Scenario::new("2.3.2 promise adopts a pending promise", adopts_pending_promise),
        Scenario::new("2.3.2 promise adopts a settled promise", adopts_settled_promise),
        Scenario::new("2.3.3 function thenable is adopted", function_thenable_adopted),
        Scenario::new("2.3.3.2 throwing then getter rejects", throwing_getter_rejects),
        Scenario::new("2.3.3.3 then receives resolve and reject", then_receives_callbacks),
        Scenario::new("2.3.3.3 then is called with x as this", then_called_on_thenable),
        Scenario::new("2.3.3.3.1 thenables unwrap recursively", thenables_unwrap_recursively),
        Scenario::new("2.3.3.3.3 first callback call wins", first_callback_wins),
        Scenario::new("2.3.3.3.4 throw after callback is ignored", throw_after_callback_ignored),
        Scenario::new("2.3.3.3.4 throw before callback rejects", throw_before_callback_rejects),
        Scenario::new("2.3.3.4 non-function then fulfills", non_function_then_fulfills),
        Scenario::new("2.3.4 primitives fulfill", primitives_fulfill),
        Scenario::new("catch recovers into fulfillment", catch_recovers),
        Scenario::new("finally passes the outcome through", finally_passes_through),
        Scenario::new("finally throw overrides the outcome", finally_throw_overrides),
        Scenario::new("all keeps input order", all_keeps_order),
        Scenario::new("all rejects with the first reason", all_rejects_fast),
        Scenario::new("all of nothing is an empty array", all_empty),
        Scenario::new("allSettled describes every input", all_settled_describes),
        Scenario::new("race follows the first settlement", race_follows_first),
        Scenario::new("race of nothing stays pending", race_empty_pending),
        Scenario::new("any takes the first fulfillment", any_first_fulfillment),
        Scenario::new("any aggregates every reason", any_aggregates),
        Scenario::new("any of nothing rejects", any_empty),
    ]
}

fn ensure(condition: bool, message: impl Into<String>) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(CheckError::Assertion(message.into()))
    }
}

fn expect_outcome(promise: &Promise, expected: Option<JsResult<Value>>) -> CheckResult {
    let actual = promise.outcome();
    ensure(
        actual == expected,
        format!("expected {:?}, got {:?}", expected, actual),
    )
}

fn expect_error_kind(promise: &Promise, kind: ErrorKind) -> CheckResult {
    let actual = match promise.outcome() {
        Some(Err(reason)) => reason.as_error().map(|e| e.kind.clone()),
        _ => None,
    };
    ensure(
        actual.as_ref() == Some(&kind),
        format!("expected rejection with {}, got {:?}", kind, promise.outcome()),
    )
}

/// Arguments each recorder was called with, in call order.
#[derive(Clone, Default)]
struct Calls(Rc<RefCell<Vec<Value>>>);

impl Calls {
    /// Records its argument and returns it.
    fn recorder(&self) -> Function {
        let calls = self.clone();
        Function::unary(move |value| {
            calls.0.borrow_mut().push(value.clone());
            Ok(value)
        })
    }

    /// Records `label` and returns its argument.
    fn labelled(&self, label: &'static str) -> Function {
        let calls = self.clone();
        Function::unary(move |value| {
            calls.0.borrow_mut().push(Value::from(label));
            Ok(value)
        })
    }

    fn values(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }
}

/// A host object with a fixed `then` member.
struct HostObject {
    then: JsResult<Value>,
}

impl Thenable for HostObject {
    fn get_then(&self) -> JsResult<Value> {
        self.then.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn host_object(then: JsResult<Value>) -> Value {
    Value::Object(Rc::new(HostObject { then }))
}

fn thenable<F>(then: F) -> Value
where
    F: Fn(&[Value]) -> JsResult<Value> + 'static,
{
    host_object(Ok(Value::Function(Function::new(then))))
}

/// Calls the callback at `index` in `args` with `value`.
fn callback(args: &[Value], index: usize, value: Value) -> JsResult<Value> {
    match argument(args, index).as_function() {
        Some(f) => f.call(&[value]),
        None => Ok(Value::Undefined),
    }
}

fn returns(value: Value) -> Function {
    Function::unary(move |_| Ok(value.clone()))
}

fn throws(reason: Value) -> Function {
    Function::unary(move |_| Err(reason.clone()))
}

fn fulfilled_is_final(cx: &mut ScenarioContext) -> CheckResult {
    let Deferred {
        promise,
        resolve,
        reject,
    } = cx.adapter.deferred();
    resolve.call(&[Value::Smi(1)])?;
    reject.call(&[Value::from("reason")])?;
    resolve.call(&[Value::Smi(2)])?;
    cx.run()?;
    expect_outcome(&promise, Some(Ok(Value::Smi(1))))
}

fn rejected_is_final(cx: &mut ScenarioContext) -> CheckResult {
    let Deferred {
        promise,
        resolve,
        reject,
    } = cx.adapter.deferred();
    reject.call(&[Value::from("reason")])?;
    resolve.call(&[Value::Smi(1)])?;
    reject.call(&[Value::from("other")])?;
    cx.run()?;
    expect_outcome(&promise, Some(Err(Value::from("reason"))))
}

fn non_function_arguments_ignored(cx: &mut ScenarioContext) -> CheckResult {
    let fulfilled: Value = cx.adapter.resolved(Value::Smi(3)).into();
    let rejected: Value = cx.adapter.rejected(Value::from("x")).into();

    let mut derived = Vec::new();
    for (source, args) in [
        (&fulfilled, [Value::Smi(5), Value::Null]),
        (&rejected, [Value::Undefined, Value::from("not a function")]),
    ] {
        let then = source.get_then()?;
        let then = then
            .as_function()
            .ok_or_else(|| CheckError::Assertion("promise has no then member".into()))?;
        let result = then.call(&args)?;
        let promise = Promise::from_value(&result)
            .ok_or_else(|| CheckError::Assertion("then did not return a promise".into()))?;
        derived.push(promise);
    }

    cx.run()?;
    expect_outcome(&derived[0], Some(Ok(Value::Smi(3))))?;
    expect_outcome(&derived[1], Some(Err(Value::from("x"))))
}

fn on_fulfilled_runs_once(cx: &mut ScenarioContext) -> CheckResult {
    let calls = Calls::default();
    let Deferred {
        promise,
        resolve,
        reject,
    } = cx.adapter.deferred();
    promise.then(Some(calls.recorder()), None);
    cx.run()?;
    ensure(calls.values().is_empty(), "onFulfilled ran before fulfillment")?;

    resolve.call(&[Value::Smi(1)])?;
    resolve.call(&[Value::Smi(2)])?;
    reject.call(&[Value::Smi(3)])?;
    cx.run()?;
    ensure(
        calls.values() == vec![Value::Smi(1)],
        format!("onFulfilled calls: {:?}", calls.values()),
    )
}

fn on_rejected_runs_once(cx: &mut ScenarioContext) -> CheckResult {
    let calls = Calls::default();
    let Deferred {
        promise,
        resolve,
        reject,
    } = cx.adapter.deferred();
    promise.then(None, Some(calls.recorder()));
    cx.run()?;
    ensure(calls.values().is_empty(), "onRejected ran before rejection")?;

    reject.call(&[Value::from("r")])?;
    reject.call(&[Value::from("again")])?;
    resolve.call(&[Value::Smi(1)])?;
    cx.run()?;
    ensure(
        calls.values() == vec![Value::from("r")],
        format!("onRejected calls: {:?}", calls.values()),
    )
}

fn handlers_run_asynchronously(cx: &mut ScenarioContext) -> CheckResult {
    let calls = Calls::default();
    cx.adapter.resolved(Value::Smi(1)).then(Some(calls.recorder()), None);
    cx.adapter.rejected(Value::Smi(2)).then(None, Some(calls.recorder()));

    let Deferred {
        promise, resolve, ..
    } = cx.adapter.deferred();
    promise.then(Some(calls.recorder()), None);
    resolve.call(&[Value::Smi(3)])?;

    ensure(calls.values().is_empty(), "a handler ran synchronously")?;
    cx.run()?;
    ensure(calls.values().len() == 3, "not every handler ran")
}

fn handlers_run_in_order(cx: &mut ScenarioContext) -> CheckResult {
    let calls = Calls::default();
    let fulfilled = cx.adapter.deferred();
    let rejected = cx.adapter.deferred();

    fulfilled.promise.then(Some(calls.labelled("f1")), None);
    rejected.promise.then(None, Some(calls.labelled("r1")));
    fulfilled.promise.then(Some(calls.labelled("f2")), None);
    rejected.promise.then(None, Some(calls.labelled("r2")));

    cx.later(&rejected.reject, Value::Null);
    cx.later(&fulfilled.resolve, Value::Null);
    cx.run()?;

    let expected: Vec<Value> = ["r1", "r2", "f1", "f2"].into_iter().map(Value::from).collect();
    ensure(
        calls.values() == expected,
        format!("handler order: {:?}", calls.values()),
    )
}

fn then_returns_new_promise(cx: &mut ScenarioContext) -> CheckResult {
    let promise = cx.adapter.resolved(Value::Null);
    let derived = promise.then(None, None);
    ensure(!derived.ptr_eq(&promise), "then returned its receiver")
}

fn handler_result_resolves(cx: &mut ScenarioContext) -> CheckResult {
    let plain = cx.adapter.resolved(Value::Smi(1)).then(Some(returns(Value::Smi(2))), None);
    let recovered = cx
        .adapter
        .rejected(Value::Smi(1))
        .then(None, Some(returns(Value::Smi(3))));
    let adopted = cx.adapter.resolved(Value::Smi(1)).then(
        Some(returns(thenable(|args| callback(args, 0, Value::Smi(4))))),
        None,
    );

    cx.run()?;
    expect_outcome(&plain, Some(Ok(Value::Smi(2))))?;
    expect_outcome(&recovered, Some(Ok(Value::Smi(3))))?;
    expect_outcome(&adopted, Some(Ok(Value::Smi(4))))
}

fn handler_throw_rejects(cx: &mut ScenarioContext) -> CheckResult {
    let error = Value::from("thrown");
    let from_fulfilled = cx.adapter.resolved(Value::Smi(1)).then(Some(throws(error.clone())), None);
    let from_rejected = cx
        .adapter
        .rejected(Value::Smi(1))
        .then(None, Some(throws(error.clone())));

    cx.run()?;
    expect_outcome(&from_fulfilled, Some(Err(error.clone())))?;
    expect_outcome(&from_rejected, Some(Err(error)))
}

fn value_passes_through(cx: &mut ScenarioContext) -> CheckResult {
    let derived = cx
        .adapter
        .resolved(Value::from("value"))
        .then(None, Some(returns(Value::Null)));
    cx.run()?;
    expect_outcome(&derived, Some(Ok(Value::from("value"))))
}

fn reason_passes_through(cx: &mut ScenarioContext) -> CheckResult {
    let derived = cx
        .adapter
        .rejected(Value::from("reason"))
        .then(Some(returns(Value::Null)), None);
    cx.run()?;
    expect_outcome(&derived, Some(Err(Value::from("reason"))))
}

fn self_resolution_rejects(cx: &mut ScenarioContext) -> CheckResult {
    let Deferred {
        promise, resolve, ..
    } = cx.adapter.deferred();
    resolve.call(&[promise.clone().into()])?;

    let holder: Rc<RefCell<Value>> = Rc::new(RefCell::new(Value::Undefined));
    let returned = holder.clone();
    let derived = cx.adapter.resolved(Value::Null).then(
        Some(Function::unary(move |_| Ok(returned.borrow().clone()))),
        None,
    );
    *holder.borrow_mut() = derived.clone().into();

    cx.run()?;
    expect_error_kind(&promise, ErrorKind::TypeError)?;
    expect_error_kind(&derived, ErrorKind::TypeError)
}

fn adopts_pending_promise(cx: &mut ScenarioContext) -> CheckResult {
    let inner = cx.adapter.deferred();
    let outer = cx.adapter.deferred();
    outer.resolve.call(&[inner.promise.clone().into()])?;
    cx.run()?;
    ensure(outer.promise.is_pending(), "outer settled before inner")?;

    cx.later(&inner.resolve, Value::from("inner"));
    cx.run()?;
    expect_outcome(&outer.promise, Some(Ok(Value::from("inner"))))
}

fn adopts_settled_promise(cx: &mut ScenarioContext) -> CheckResult {
    let fulfilled = cx.adapter.deferred();
    fulfilled
        .resolve
        .call(&[cx.adapter.resolved(Value::Smi(1)).into()])?;
    let rejected = cx.adapter.deferred();
    rejected
        .resolve
        .call(&[cx.adapter.rejected(Value::Smi(2)).into()])?;

    cx.run()?;
    expect_outcome(&fulfilled.promise, Some(Ok(Value::Smi(1))))?;
    expect_outcome(&rejected.promise, Some(Err(Value::Smi(2))))
}

fn throwing_getter_rejects(cx: &mut ScenarioContext) -> CheckResult {
    let promise = cx.adapter.resolved(host_object(Err(Value::from("getter threw"))));
    cx.run()?;
    expect_outcome(&promise, Some(Err(Value::from("getter threw"))))
}

fn then_receives_callbacks(cx: &mut ScenarioContext) -> CheckResult {
    let seen = Rc::new(RefCell::new(None));
    let record = seen.clone();
    let promise = cx.adapter.resolved(thenable(move |args| {
        let kinds: Vec<&'static str> = (0..2).map(|i| argument(args, i).type_of()).collect();
        *record.borrow_mut() = Some(kinds);
        callback(args, 0, Value::Null)
    }));

    cx.run()?;
    let kinds = seen.borrow().clone();
    ensure(
        kinds == Some(vec!["function", "function"]),
        format!("then called with {:?}", kinds),
    )?;
    expect_outcome(&promise, Some(Ok(Value::Null)))
}

fn function_thenable_adopted(cx: &mut ScenarioContext) -> CheckResult {
    let callable = Function::new(|_| Ok(Value::Undefined)).with_member(
        "then",
        Value::Function(Function::new(|args| callback(args, 0, Value::from("from function")))),
    );
    let promise = cx.adapter.resolved(Value::Function(callable));

    cx.run()?;
    expect_outcome(&promise, Some(Ok(Value::from("from function"))))
}

fn then_called_on_thenable(cx: &mut ScenarioContext) -> CheckResult {
    let then = Function::method(|this, args| {
        callback(args, 0, this.get("tag").unwrap_or(Value::Undefined))
    });
    let x = Value::record([("then", Value::Function(then)), ("tag", Value::from("x"))]);
    let promise = cx.adapter.resolved(x);

    cx.run()?;
    expect_outcome(&promise, Some(Ok(Value::from("x"))))
}

fn thenables_unwrap_recursively(cx: &mut ScenarioContext) -> CheckResult {
    let innermost: Value = cx.adapter.resolved(Value::from("deep")).into();
    let middle = thenable(move |args| callback(args, 0, innermost.clone()));
    let outer = thenable(move |args| callback(args, 0, middle.clone()));
    let promise = cx.adapter.resolved(outer);

    cx.run()?;
    expect_outcome(&promise, Some(Ok(Value::from("deep"))))
}

fn first_callback_wins(cx: &mut ScenarioContext) -> CheckResult {
    let promise = cx.adapter.resolved(thenable(|args| {
        callback(args, 1, Value::from("first"))?;
        callback(args, 0, Value::from("second"))?;
        callback(args, 1, Value::from("third"))
    }));
    cx.run()?;
    expect_outcome(&promise, Some(Err(Value::from("first"))))
}

fn throw_after_callback_ignored(cx: &mut ScenarioContext) -> CheckResult {
    let promise = cx.adapter.resolved(thenable(|args| {
        callback(args, 0, Value::Smi(1))?;
        Err(Value::from("ignored"))
    }));
    cx.run()?;
    expect_outcome(&promise, Some(Ok(Value::Smi(1))))
}

fn throw_before_callback_rejects(cx: &mut ScenarioContext) -> CheckResult {
    let promise = cx.adapter.resolved(thenable(|_| Err(Value::from("then threw"))));
    cx.run()?;
    expect_outcome(&promise, Some(Err(Value::from("then threw"))))
}

fn non_function_then_fulfills(cx: &mut ScenarioContext) -> CheckResult {
    let record = Value::record([("then", Value::Smi(5))]);
    let host = host_object(Ok(Value::from("not callable")));
    let from_record = cx.adapter.resolved(record.clone());
    let from_host = cx.adapter.resolved(host.clone());

    cx.run()?;
    expect_outcome(&from_record, Some(Ok(record)))?;
    expect_outcome(&from_host, Some(Ok(host)))
}

fn primitives_fulfill(cx: &mut ScenarioContext) -> CheckResult {
    for value in [
        Value::Undefined,
        Value::Null,
        Value::Boolean(true),
        Value::Smi(0),
        Value::Double(1.5),
        Value::from(""),
    ] {
        let Deferred {
            promise, resolve, ..
        } = cx.adapter.deferred();
        resolve.call(&[value.clone()])?;
        expect_outcome(&promise, Some(Ok(value)))?;
    }
    Ok(())
}

fn catch_recovers(cx: &mut ScenarioContext) -> CheckResult {
    let promise = cx
        .adapter
        .rejected(Value::from("boom"))
        .catch(Some(returns(Value::from("recovered"))));
    cx.run()?;
    ensure(
        promise.state() == PromiseState::Fulfilled,
        "catch handler did not recover",
    )?;
    expect_outcome(&promise, Some(Ok(Value::from("recovered"))))
}

fn finally_passes_through(cx: &mut ScenarioContext) -> CheckResult {
    let calls = Calls::default();
    let fulfilled = cx
        .adapter
        .resolved(Value::Smi(1))
        .finally(Some(calls.recorder()));
    let rejected = cx
        .adapter
        .rejected(Value::Smi(2))
        .finally(Some(returns(Value::Smi(99))));

    cx.run()?;
    ensure(
        calls.values() == vec![Value::Undefined],
        "onFinally must be called once without arguments",
    )?;
    expect_outcome(&fulfilled, Some(Ok(Value::Smi(1))))?;
    expect_outcome(&rejected, Some(Err(Value::Smi(2))))
}

fn finally_throw_overrides(cx: &mut ScenarioContext) -> CheckResult {
    let thrown = cx
        .adapter
        .resolved(Value::Smi(1))
        .finally(Some(throws(Value::from("cleanup"))));
    let failing: Value = cx.adapter.rejected(Value::from("late")).into();
    let delayed = cx
        .adapter
        .resolved(Value::Smi(1))
        .finally(Some(returns(failing)));

    cx.run()?;
    expect_outcome(&thrown, Some(Err(Value::from("cleanup"))))?;
    expect_outcome(&delayed, Some(Err(Value::from("late"))))
}

fn all_keeps_order(cx: &mut ScenarioContext) -> CheckResult {
    let slow = cx.adapter.deferred();
    let fast = cx.adapter.deferred();
    let all = Promise::all(
        cx.adapter.scheduler(),
        vec![slow.promise.clone().into(), fast.promise.clone().into(), Value::Smi(3)],
    );

    cx.later(&fast.resolve, Value::Smi(2));
    cx.later(&slow.resolve, Value::Smi(1));
    cx.run()?;
    expect_outcome(
        &all,
        Some(Ok(Value::Array(vec![Value::Smi(1), Value::Smi(2), Value::Smi(3)]))),
    )
}

fn all_rejects_fast(cx: &mut ScenarioContext) -> CheckResult {
    let first = cx.adapter.deferred();
    let second = cx.adapter.deferred();
    let all = Promise::all(
        cx.adapter.scheduler(),
        vec![first.promise.clone().into(), second.promise.clone().into()],
    );

    cx.later(&second.reject, Value::from("second failed"));
    cx.run()?;
    expect_outcome(&all, Some(Err(Value::from("second failed"))))?;

    cx.later(&first.resolve, Value::Smi(1));
    cx.run()?;
    expect_outcome(&all, Some(Err(Value::from("second failed"))))
}

fn all_empty(cx: &mut ScenarioContext) -> CheckResult {
    let all = Promise::all(cx.adapter.scheduler(), Vec::new());
    expect_outcome(&all, Some(Ok(Value::Array(Vec::new()))))
}

fn all_settled_describes(cx: &mut ScenarioContext) -> CheckResult {
    let a = cx.adapter.deferred();
    let b = cx.adapter.deferred();
    let settled = Promise::all_settled(
        cx.adapter.scheduler(),
        vec![a.promise.clone().into(), b.promise.clone().into()],
    );

    cx.later(&b.reject, Value::from("x"));
    cx.later(&a.resolve, Value::Smi(1));
    cx.run()?;
    expect_outcome(
        &settled,
        Some(Ok(Value::Array(vec![
            Value::record([("status", Value::from("fulfilled")), ("value", Value::Smi(1))]),
            Value::record([("status", Value::from("rejected")), ("reason", Value::from("x"))]),
        ]))),
    )
}

fn race_follows_first(cx: &mut ScenarioContext) -> CheckResult {
    let slow = cx.adapter.deferred();
    let fast = cx.adapter.deferred();
    let race = Promise::race(
        cx.adapter.scheduler(),
        vec![slow.promise.clone().into(), fast.promise.clone().into()],
    );

    cx.later(&fast.reject, Value::from("fast"));
    cx.later(&slow.resolve, Value::from("slow"));
    cx.run()?;
    expect_outcome(&race, Some(Err(Value::from("fast"))))
}

fn race_empty_pending(cx: &mut ScenarioContext) -> CheckResult {
    let race = Promise::race(cx.adapter.scheduler(), Vec::new());
    cx.run()?;
    expect_outcome(&race, None)
}

fn any_first_fulfillment(cx: &mut ScenarioContext) -> CheckResult {
    let a = cx.adapter.deferred();
    let b = cx.adapter.deferred();
    let any = Promise::any(
        cx.adapter.scheduler(),
        vec![a.promise.clone().into(), b.promise.clone().into()],
    );

    cx.later(&a.reject, Value::from("a failed"));
    cx.later(&b.resolve, Value::from("b"));
    cx.run()?;
    expect_outcome(&any, Some(Ok(Value::from("b"))))
}

fn any_aggregates(cx: &mut ScenarioContext) -> CheckResult {
    let any = Promise::any(
        cx.adapter.scheduler(),
        vec![
            cx.adapter.rejected(Value::from("a")).into(),
            cx.adapter.rejected(Value::from("b")).into(),
        ],
    );
    cx.run()?;
    expect_error_kind(&any, ErrorKind::AggregateError)?;

    let errors = any
        .result()
        .and_then(|reason| reason.as_error().map(|e| e.errors.clone()));
    ensure(
        errors == Some(vec![Value::from("a"), Value::from("b")]),
        format!("aggregate errors: {:?}", errors),
    )
}

fn any_empty(cx: &mut ScenarioContext) -> CheckResult {
    let any = Promise::any(cx.adapter.scheduler(), Vec::new());
    expect_error_kind(&any, ErrorKind::AggregateError)
}
