//! Aggregate combinators: `Promise.all`, `Promise.allSettled`,
//! `Promise.race` and `Promise.any`.
//!
//! The combinators are built only from public promise operations:
//! `with_resolvers`, `resolve` and `then`. Every input is first passed
//! through [`Promise::resolve`], so plain values count as already fulfilled.

use crate::promise::{Deferred, Promise};
use crate::scheduler::SchedulerRef;
use core_types::{Function, JsError, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Per-input results kept by index, plus a running count of settled inputs.
struct Results {
    slots: RefCell<Vec<Value>>,
    settled: Cell<usize>,
    total: usize,
}

impl Results {
    fn new(total: usize) -> Rc<Self> {
        Rc::new(Self {
            slots: RefCell::new(vec![Value::Undefined; total]),
            settled: Cell::new(0),
            total,
        })
    }

    /// Stores `value` at `index`; returns true when this was the last input.
    fn record(&self, index: usize, value: Value) -> bool {
        if let Some(slot) = self.slots.borrow_mut().get_mut(index) {
            *slot = value;
        }
        let settled = self.settled.get() + 1;
        self.settled.set(settled);
        settled == self.total
    }

    fn take(&self) -> Vec<Value> {
        std::mem::take(&mut *self.slots.borrow_mut())
    }
}

/// Builds an `allSettled` descriptor for a fulfilled input.
pub fn fulfilled_descriptor(value: Value) -> Value {
    Value::record([("status", Value::from("fulfilled")), ("value", value)])
}

/// Builds an `allSettled` descriptor for a rejected input.
pub fn rejected_descriptor(reason: Value) -> Value {
    Value::record([("status", Value::from("rejected")), ("reason", reason)])
}

impl Promise {
    /// Fulfills with every input's value, in input order, once all fulfill.
    /// Rejects with the first rejection reason.
    ///
    /// An empty input fulfills at once with an empty array.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_runtime::{EventLoop, Promise};
    /// use core_types::Value;
    ///
    /// let mut event_loop = EventLoop::new();
    /// let s = event_loop.scheduler();
    /// let all = Promise::all(&s, vec![Value::from(Promise::resolve(&s, Value::Smi(1))), Value::Smi(2)]);
    ///
    /// event_loop.run_until_done().unwrap();
    /// assert_eq!(all.result(), Some(Value::Array(vec![Value::Smi(1), Value::Smi(2)])));
    /// ```
    pub fn all<I>(scheduler: &SchedulerRef, values: I) -> Promise
    where
        I: IntoIterator<Item = Value>,
    {
        let Deferred {
            promise,
            resolve,
            reject,
        } = Promise::with_resolvers(scheduler);
        let items: Vec<Value> = values.into_iter().collect();
        if items.is_empty() {
            let _ = resolve.call(&[Value::Array(Vec::new())]);
            return promise;
        }

        let results = Results::new(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let on_fulfilled = {
                let results = results.clone();
                let resolve = resolve.clone();
                Function::unary(move |value| {
                    if results.record(index, value) {
                        resolve.call(&[Value::Array(results.take())])?;
                    }
                    Ok(Value::Undefined)
                })
            };
            Promise::resolve(scheduler, item).then(Some(on_fulfilled), Some(reject.clone()));
        }

        promise
    }

    /// Fulfills, once every input has settled, with one descriptor per input:
    /// `{status: "fulfilled", value}` or `{status: "rejected", reason}`.
    ///
    /// An empty input fulfills at once with an empty array.
    pub fn all_settled<I>(scheduler: &SchedulerRef, values: I) -> Promise
    where
        I: IntoIterator<Item = Value>,
    {
        let Deferred {
            promise, resolve, ..
        } = Promise::with_resolvers(scheduler);
        let items: Vec<Value> = values.into_iter().collect();
        if items.is_empty() {
            let _ = resolve.call(&[Value::Array(Vec::new())]);
            return promise;
        }

        let results = Results::new(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let report = |describe: fn(Value) -> Value| {
                let results = results.clone();
                let resolve = resolve.clone();
                Function::unary(move |outcome| {
                    if results.record(index, describe(outcome)) {
                        resolve.call(&[Value::Array(results.take())])?;
                    }
                    Ok(Value::Undefined)
                })
            };
            Promise::resolve(scheduler, item).then(
                Some(report(fulfilled_descriptor)),
                Some(report(rejected_descriptor)),
            );
        }

        promise
    }

    /// Settles like the first input to settle, whichever way.
    ///
    /// An empty input never settles.
    pub fn race<I>(scheduler: &SchedulerRef, values: I) -> Promise
    where
        I: IntoIterator<Item = Value>,
    {
        let Deferred {
            promise,
            resolve,
            reject,
        } = Promise::with_resolvers(scheduler);
        for item in values {
            Promise::resolve(scheduler, item).then(Some(resolve.clone()), Some(reject.clone()));
        }
        promise
    }

    /// Fulfills with the first fulfillment value. Rejects with an
    /// `AggregateError` holding every reason, in input order, once all
    /// inputs rejected.
    ///
    /// An empty input rejects at once with an empty `AggregateError`.
    pub fn any<I>(scheduler: &SchedulerRef, values: I) -> Promise
    where
        I: IntoIterator<Item = Value>,
    {
        let Deferred {
            promise,
            resolve,
            reject,
        } = Promise::with_resolvers(scheduler);
        let items: Vec<Value> = values.into_iter().collect();
        if items.is_empty() {
            let _ = reject.call(&[JsError::aggregate(Vec::new()).into()]);
            return promise;
        }

        let errors = Results::new(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let on_rejected = {
                let errors = errors.clone();
                let reject = reject.clone();
                Function::unary(move |reason| {
                    if errors.record(index, reason) {
                        reject.call(&[JsError::aggregate(errors.take()).into()])?;
                    }
                    Ok(Value::Undefined)
                })
            };
            Promise::resolve(scheduler, item).then(Some(resolve.clone()), Some(on_rejected));
        }

        promise
    }
}
