//! The adapter conformance suites drive promises through.

use async_runtime::{Deferred, Promise, SchedulerRef};
use core_types::Value;

/// `resolved`, `rejected` and `deferred`, bound to one scheduler.
///
/// # Examples
///
/// ```
/// use aplus_harness::Adapter;
/// use async_runtime::{EventLoop, PromiseState};
/// use core_types::Value;
///
/// let event_loop = EventLoop::new();
/// let adapter = Adapter::new(event_loop.scheduler());
///
/// assert_eq!(adapter.resolved(Value::Smi(1)).state(), PromiseState::Fulfilled);
/// assert_eq!(adapter.rejected(Value::Smi(1)).state(), PromiseState::Rejected);
/// assert!(adapter.deferred().promise.is_pending());
/// ```
#[derive(Clone)]
pub struct Adapter {
    scheduler: SchedulerRef,
}

impl Adapter {
    /// Creates an adapter whose promises report into `scheduler`.
    pub fn new(scheduler: SchedulerRef) -> Self {
        Self { scheduler }
    }

    /// The scheduler every adapter promise uses.
    pub fn scheduler(&self) -> &SchedulerRef {
        &self.scheduler
    }

    /// A promise already resolved with `value`.
    pub fn resolved(&self, value: Value) -> Promise {
        Promise::resolve(&self.scheduler, value)
    }

    /// A promise already rejected with `reason`.
    pub fn rejected(&self, reason: Value) -> Promise {
        Promise::reject(&self.scheduler, reason)
    }

    /// A pending promise with its resolving functions.
    pub fn deferred(&self) -> Deferred {
        Promise::with_resolvers(&self.scheduler)
    }
}
