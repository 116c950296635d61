//! The promise resolution procedure.
//!
//! `resolve(x)` does not simply fulfill: a promise resolved with itself is
//! rejected, a promise resolved with another promise follows it, and a
//! promise resolved with any object exposing a callable `then` adopts that
//! thenable's eventual state. Everything else fulfills.

use crate::promise::{Promise, PromiseState, ResolvingFunctions};
use crate::task_queue::MicroTask;
use core_types::{Function, JsError, Value};
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

impl Promise {
    /// Creates a fresh `resolve`/`reject` pair for this promise.
    ///
    /// The pair shares one flag: whichever function is called first wins and
    /// every later call of either is ignored, even while the promise is still
    /// pending because it is following a thenable.
    pub(crate) fn create_resolving_functions(&self) -> ResolvingFunctions {
        let already_resolved = Rc::new(Cell::new(false));

        let resolve = {
            let promise = self.clone();
            let already_resolved = already_resolved.clone();
            Function::unary(move |resolution| {
                if !already_resolved.replace(true) {
                    promise.resolve_with(resolution);
                }
                Ok(Value::Undefined)
            })
        };
        let reject = {
            let promise = self.clone();
            Function::unary(move |reason| {
                if !already_resolved.replace(true) {
                    promise.settle(PromiseState::Rejected, reason);
                }
                Ok(Value::Undefined)
            })
        };

        ResolvingFunctions { resolve, reject }
    }

    /// Runs the resolution procedure for `resolution`.
    fn resolve_with(&self, resolution: Value) {
        if let Some(other) = Promise::from_value(&resolution) {
            if other.ptr_eq(self) {
                trace!(promise = self.id(), "resolved with itself");
                let error = JsError::type_error("Chaining cycle detected for promise");
                self.settle(PromiseState::Rejected, error.into());
                return;
            }

            // Follow the other promise; each hop is its own job
            trace!(promise = self.id(), follows = other.id(), "adopting promise");
            let ResolvingFunctions { resolve, reject } = self.create_resolving_functions();
            other.then(Some(resolve), Some(reject));
            return;
        }

        if !resolution.is_object() {
            self.settle(PromiseState::Fulfilled, resolution);
            return;
        }

        let then = match resolution.get_then() {
            Ok(then) => then,
            Err(thrown) => {
                trace!(promise = self.id(), "reading then threw");
                self.settle(PromiseState::Rejected, thrown);
                return;
            }
        };

        match then {
            Value::Function(then) => self.enqueue_thenable_job(resolution, then),
            _ => self.settle(PromiseState::Fulfilled, resolution),
        }
    }

    /// Schedules the call of a foreign `then` on `thenable` with guarded
    /// callbacks.
    ///
    /// Only the first callback invocation counts. A throw from `then` rejects
    /// unless a callback already fired.
    fn enqueue_thenable_job(&self, thenable: Value, then: Function) {
        let promise = self.clone();
        self.scheduler().enqueue_microtask(MicroTask::named(
            "PromiseResolveThenableJob",
            move || {
                let ResolvingFunctions { resolve, reject } = promise.create_resolving_functions();
                let callbacks = [Value::Function(resolve), Value::Function(reject.clone())];
                if let Err(thrown) = then.call_with_this(&thenable, &callbacks) {
                    trace!(promise = promise.id(), "foreign then threw");
                    let _ = reject.call(&[thrown]);
                }
                Ok(())
            },
        ));
    }
}
