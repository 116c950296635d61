//! Promise implementation following the Promises/A+ specification.
//!
//! This module provides the promise state machine, reaction registration via
//! `then`/`catch`/`finally`, and the reaction jobs that run handlers on the
//! scheduler. The resolution procedure lives in [`crate::resolution`] and the
//! aggregate combinators in [`crate::combinators`].

use crate::scheduler::SchedulerRef;
use crate::task_queue::MicroTask;
use core_types::{argument, Function, JsResult, Thenable, Value};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

static NEXT_PROMISE_ID: AtomicU64 = AtomicU64::new(1);

/// The state of a Promise.
///
/// Promises transition through states according to the Promise/A+ specification.
/// Once settled (Fulfilled or Rejected), a Promise cannot change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// The initial state; the promise is neither fulfilled nor rejected.
    Pending,
    /// The promise has been resolved with a value.
    Fulfilled,
    /// The promise has been rejected with a reason.
    Rejected,
}

/// The `resolve`/`reject` pair that settles one promise.
///
/// Both functions share an "already resolved" flag: only the first call of
/// either has any effect.
#[derive(Debug, Clone)]
pub struct ResolvingFunctions {
    /// Runs the resolution procedure with its first argument
    pub resolve: Function,
    /// Rejects with its first argument
    pub reject: Function,
}

impl ResolvingFunctions {
    /// Reports a handler outcome: a returned value resolves, a throw rejects.
    fn settle(&self, outcome: JsResult<Value>) {
        // Resolving functions never throw
        let _ = match outcome {
            Ok(value) => self.resolve.call(&[value]),
            Err(reason) => self.reject.call(&[reason]),
        };
    }
}

/// A reaction to be triggered when a Promise settles.
///
/// This represents the handlers registered via `.then()` together with the
/// resolving functions of the promise `.then()` returned.
#[derive(Debug)]
pub struct PromiseReaction {
    /// Handler for fulfilled state
    pub on_fulfilled: Option<Function>,
    /// Handler for rejected state
    pub on_rejected: Option<Function>,
    /// Settles the derived promise with the handler's outcome
    pub capability: ResolvingFunctions,
}

impl PromiseReaction {
    /// Runs the matching handler and reports into the derived promise.
    ///
    /// `outcome` is the source's fulfillment value (`Ok`) or rejection reason
    /// (`Err`). A missing handler passes the outcome through unchanged; a
    /// rejection handler that returns normally fulfills the derived promise.
    fn run(self, outcome: JsResult<Value>) {
        let result = match outcome {
            Ok(value) => match &self.on_fulfilled {
                Some(handler) => handler.call(&[value]),
                None => Ok(value),
            },
            Err(reason) => match &self.on_rejected {
                Some(handler) => handler.call(&[reason]),
                None => Err(reason),
            },
        };
        self.capability.settle(result);
    }
}

/// A pending promise together with its resolving functions.
///
/// Returned by [`Promise::with_resolvers`].
#[derive(Debug, Clone)]
pub struct Deferred {
    /// The promise settled by `resolve`/`reject`
    pub promise: Promise,
    /// Resolves `promise` through the resolution procedure
    pub resolve: Function,
    /// Rejects `promise`
    pub reject: Function,
}

pub(crate) struct PromiseRecord {
    pub(crate) state: PromiseState,
    pub(crate) result: Option<Value>,
    pub(crate) reactions: Vec<PromiseReaction>,
}

struct PromiseSlot {
    id: u64,
    scheduler: SchedulerRef,
    record: RefCell<PromiseRecord>,
}

thread_local! {
    /// Reaction lists waiting to be dropped by the outermost slot drop.
    static RELEASING: RefCell<Option<Vec<Vec<PromiseReaction>>>> = const { RefCell::new(None) };
}

// A pending chain owns its derived promises through reaction capabilities,
// so dropping the head would recurse once per link. Unregistered reactions
// are handed to the outermost drop, which releases them in a loop.
impl Drop for PromiseSlot {
    fn drop(&mut self) {
        let reactions = mem::take(&mut self.record.get_mut().reactions);
        if !reactions.is_empty() {
            release_reactions(reactions);
        }
    }
}

fn release_reactions(reactions: Vec<PromiseReaction>) {
    let first = RELEASING.try_with(move |releasing| {
        let mut releasing = releasing.borrow_mut();
        match releasing.as_mut() {
            Some(pending) => {
                pending.push(reactions);
                None
            }
            None => {
                *releasing = Some(Vec::new());
                Some(reactions)
            }
        }
    });

    // Thread-local storage is gone during thread teardown; the list was
    // dropped in place.
    let Ok(Some(first)) = first else {
        return;
    };

    let mut next = Some(first);
    while let Some(batch) = next {
        drop(batch);
        next = RELEASING
            .try_with(|releasing| releasing.borrow_mut().as_mut().and_then(Vec::pop))
            .ok()
            .flatten();
    }
    let _ = RELEASING.try_with(|releasing| releasing.borrow_mut().take());
}

/// A JavaScript Promise.
///
/// Promises represent the eventual completion (or failure) of an asynchronous
/// operation and its resulting value. A `Promise` is a cheap handle: clones
/// refer to the same promise.
///
/// Handlers never run synchronously. Every reaction becomes a job on the
/// scheduler the promise was created with.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Promise, PromiseState};
/// use core_types::Value;
///
/// let mut event_loop = EventLoop::new();
/// let promise = Promise::new(&event_loop.scheduler(), |resolve, _reject| {
///     resolve.call(&[Value::Smi(42)])?;
///     Ok(())
/// });
///
/// assert_eq!(promise.state(), PromiseState::Fulfilled);
/// assert_eq!(promise.result(), Some(Value::Smi(42)));
/// event_loop.run_until_done().unwrap();
/// ```
#[derive(Clone)]
pub struct Promise {
    slot: Rc<PromiseSlot>,
}

impl Promise {
    /// Creates a promise and runs `executor` synchronously with its
    /// resolving functions.
    ///
    /// If the executor throws, the promise is rejected with the thrown value
    /// (unless it already resolved).
    pub fn new<F>(scheduler: &SchedulerRef, executor: F) -> Promise
    where
        F: FnOnce(Function, Function) -> JsResult<()>,
    {
        let promise = Promise::pending(scheduler);
        let ResolvingFunctions { resolve, reject } = promise.create_resolving_functions();
        if let Err(thrown) = executor(resolve, reject.clone()) {
            trace!(promise = promise.id(), "executor threw");
            let _ = reject.call(&[thrown]);
        }
        promise
    }

    /// Creates a pending promise and hands out its resolving functions.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_runtime::{Deferred, EventLoop, Promise, PromiseState};
    /// use core_types::Value;
    ///
    /// let event_loop = EventLoop::new();
    /// let Deferred { promise, reject, .. } = Promise::with_resolvers(&event_loop.scheduler());
    /// assert!(promise.is_pending());
    ///
    /// reject.call(&[Value::from("nope")]).unwrap();
    /// assert_eq!(promise.state(), PromiseState::Rejected);
    /// ```
    pub fn with_resolvers(scheduler: &SchedulerRef) -> Deferred {
        let promise = Promise::pending(scheduler);
        let ResolvingFunctions { resolve, reject } = promise.create_resolving_functions();
        Deferred {
            promise,
            resolve,
            reject,
        }
    }

    /// Returns `value` itself if it is already a promise, otherwise a new
    /// promise resolved with `value`.
    pub fn resolve(scheduler: &SchedulerRef, value: Value) -> Promise {
        if let Some(promise) = Promise::from_value(&value) {
            return promise;
        }
        let Deferred {
            promise, resolve, ..
        } = Promise::with_resolvers(scheduler);
        let _ = resolve.call(&[value]);
        promise
    }

    /// Returns a new promise rejected with `reason`.
    pub fn reject(scheduler: &SchedulerRef, reason: Value) -> Promise {
        let Deferred {
            promise, reject, ..
        } = Promise::with_resolvers(scheduler);
        let _ = reject.call(&[reason]);
        promise
    }

    fn pending(scheduler: &SchedulerRef) -> Promise {
        let id = NEXT_PROMISE_ID.fetch_add(1, Ordering::Relaxed);
        Promise {
            slot: Rc::new(PromiseSlot {
                id,
                scheduler: scheduler.clone(),
                record: RefCell::new(PromiseRecord {
                    state: PromiseState::Pending,
                    result: None,
                    reactions: Vec::new(),
                }),
            }),
        }
    }

    /// Recognises a promise stored in a [`Value`].
    pub fn from_value(value: &Value) -> Option<Promise> {
        match value {
            Value::Object(object) => object.as_any().downcast_ref::<Promise>().cloned(),
            _ => None,
        }
    }

    /// Process-unique identifier, used in traces.
    pub fn id(&self) -> u64 {
        self.slot.id
    }

    /// The scheduler this promise and every promise derived from it report into.
    pub fn scheduler(&self) -> &SchedulerRef {
        &self.slot.scheduler
    }

    /// Returns true if both handles refer to the same promise.
    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    /// The current state.
    pub fn state(&self) -> PromiseState {
        self.slot.record.borrow().state
    }

    /// Returns true while the promise is neither fulfilled nor rejected.
    pub fn is_pending(&self) -> bool {
        self.state() == PromiseState::Pending
    }

    /// The fulfillment value or rejection reason, once settled.
    pub fn result(&self) -> Option<Value> {
        self.slot.record.borrow().result.clone()
    }

    /// `Some(Ok(value))` once fulfilled, `Some(Err(reason))` once rejected.
    pub fn outcome(&self) -> Option<JsResult<Value>> {
        let record = self.slot.record.borrow();
        match (record.state, &record.result) {
            (PromiseState::Fulfilled, Some(value)) => Some(Ok(value.clone())),
            (PromiseState::Rejected, Some(reason)) => Some(Err(reason.clone())),
            _ => None,
        }
    }

    /// Checks if there are reactions waiting for settlement.
    pub fn has_pending_reactions(&self) -> bool {
        !self.slot.record.borrow().reactions.is_empty()
    }

    /// Adds handlers for fulfillment and/or rejection.
    ///
    /// Returns a new Promise that will be resolved based on the handlers' results.
    /// If this promise is already settled the reaction is scheduled at once;
    /// it still runs as a job, never inside this call.
    ///
    /// # Arguments
    ///
    /// * `on_fulfilled` - Optional handler called when Promise fulfills
    /// * `on_rejected` - Optional handler called when Promise rejects
    ///
    /// # Returns
    ///
    /// A new Promise that chains after this one
    pub fn then(&self, on_fulfilled: Option<Function>, on_rejected: Option<Function>) -> Promise {
        let derived = Promise::pending(&self.slot.scheduler);
        let reaction = PromiseReaction {
            on_fulfilled,
            on_rejected,
            capability: derived.create_resolving_functions(),
        };

        let ready = {
            let mut record = self.slot.record.borrow_mut();
            if record.state == PromiseState::Pending {
                record.reactions.push(reaction);
                None
            } else {
                Some(reaction)
            }
        };
        if let Some(reaction) = ready {
            self.enqueue_reaction_job(reaction);
        }

        derived
    }

    /// Adds a rejection handler. Same as `then(None, on_rejected)`.
    pub fn catch(&self, on_rejected: Option<Function>) -> Promise {
        self.then(None, on_rejected)
    }

    /// Runs `on_finally` once this promise settles, whichever way.
    ///
    /// The returned promise settles like this one, after any promise or
    /// thenable returned by `on_finally` has settled. If `on_finally` throws,
    /// or what it returned rejects, that failure replaces the outcome.
    pub fn finally(&self, on_finally: Option<Function>) -> Promise {
        let Some(on_finally) = on_finally else {
            return self.then(None, None);
        };
        let scheduler = self.slot.scheduler.clone();

        let then_finally = {
            let on_finally = on_finally.clone();
            let scheduler = scheduler.clone();
            Function::unary(move |value| {
                let settled = Promise::resolve(&scheduler, on_finally.call(&[])?);
                let pass_value = Function::unary(move |_| Ok(value.clone()));
                Ok(settled.then(Some(pass_value), None).into())
            })
        };
        let catch_finally = Function::unary(move |reason| {
            let settled = Promise::resolve(&scheduler, on_finally.call(&[])?);
            let pass_reason = Function::unary(move |_| Err(reason.clone()));
            Ok(settled.then(Some(pass_reason), None).into())
        });

        self.then(Some(then_finally), Some(catch_finally))
    }

    /// Moves a pending promise to its final state and schedules its reactions.
    ///
    /// No-op once settled.
    pub(crate) fn settle(&self, state: PromiseState, value: Value) {
        let reactions = {
            let mut record = self.slot.record.borrow_mut();
            if record.state != PromiseState::Pending {
                return;
            }
            record.state = state;
            record.result = Some(value);
            std::mem::take(&mut record.reactions)
        };
        trace!(promise = self.id(), ?state, reactions = reactions.len(), "settled");
        self.trigger_reactions(reactions);
    }

    /// Schedules one job per reaction, in registration order.
    fn trigger_reactions(&self, reactions: Vec<PromiseReaction>) {
        for reaction in reactions {
            self.enqueue_reaction_job(reaction);
        }
    }

    fn enqueue_reaction_job(&self, reaction: PromiseReaction) {
        let Some(outcome) = self.outcome() else {
            return;
        };
        self.slot.scheduler.enqueue_microtask(MicroTask::named(
            "PromiseReactionJob",
            move || {
                reaction.run(outcome);
                Ok(())
            },
        ));
    }
}

impl Thenable for Promise {
    /// A promise's `then` member, so foreign code can chain on it.
    fn get_then(&self) -> JsResult<Value> {
        let promise = self.clone();
        Ok(Value::Function(Function::new(move |args| {
            let on_fulfilled = argument(args, 0).as_function().cloned();
            let on_rejected = argument(args, 1).as_function().cloned();
            Ok(promise.then(on_fulfilled, on_rejected).into())
        })))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl From<Promise> for Value {
    fn from(promise: Promise) -> Self {
        Value::Object(Rc::new(promise))
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("id", &self.id())
            .field("state", &self.state())
            .finish()
    }
}
