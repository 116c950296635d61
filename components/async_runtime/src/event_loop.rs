//! Event loop implementation.
//!
//! This module provides the main event loop that coordinates task and microtask
//! execution following the JavaScript event loop model.

use crate::error::{RuntimeError, RuntimeResult};
use crate::scheduler::{JobQueue, Scheduler, SchedulerRef};
use crate::task_queue::{MicroTask, Task, TaskQueue};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

/// Event loop settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLoopConfig {
    /// Maximum number of microtasks a single drain may run. `None` is unlimited.
    pub microtask_limit: Option<usize>,
}

/// The JavaScript event loop.
///
/// The event loop processes tasks and microtasks according to the HTML5 event loop
/// specification. Each iteration (turn) of the loop:
/// 1. Takes the oldest task from the task queue and executes it
/// 2. Drains all microtasks in the microtask queue
/// 3. Repeats
///
/// Promises reach the microtask queue through [`EventLoop::scheduler`].
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Promise};
/// use core_types::Value;
///
/// let mut event_loop = EventLoop::new();
/// let promise = Promise::resolve(&event_loop.scheduler(), Value::Smi(1));
/// let doubled = promise.then(Some(core_types::Function::unary(|v| match v {
///     Value::Smi(n) => Ok(Value::Smi(n * 2)),
///     other => Ok(other),
/// })), None);
///
/// assert!(doubled.is_pending());
/// event_loop.run_until_done().unwrap();
/// assert_eq!(doubled.result(), Some(Value::Smi(2)));
/// ```
#[derive(Debug, Default)]
pub struct EventLoop {
    task_queue: TaskQueue,
    microtask_queue: JobQueue,
    config: EventLoopConfig,
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues.
    pub fn new() -> Self {
        Self::with_config(EventLoopConfig::default())
    }

    /// Creates a new EventLoop with the given settings.
    pub fn with_config(config: EventLoopConfig) -> Self {
        Self {
            task_queue: TaskQueue::new(),
            microtask_queue: JobQueue::new(),
            config,
        }
    }

    /// Returns the settings this loop runs with.
    pub fn config(&self) -> &EventLoopConfig {
        &self.config
    }

    /// Returns a scheduler handle feeding this loop's microtask queue.
    pub fn scheduler(&self) -> SchedulerRef {
        Rc::new(self.microtask_queue.clone())
    }

    /// Runs the event loop until all tasks and microtasks are processed.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all tasks completed successfully, or an error if any task failed.
    pub fn run_until_done(&mut self) -> RuntimeResult<()> {
        // Microtasks queued before the first task run first
        self.run_all_microtasks()?;
        while !self.task_queue.is_empty() || !self.microtask_queue.is_empty() {
            self.process_one_cycle()?;
        }

        Ok(())
    }

    /// Adds a task to the task queue.
    ///
    /// The task will be executed in the next available iteration of the event loop.
    pub fn enqueue_task(&mut self, task: Task) {
        self.task_queue.enqueue(task);
    }

    /// Adds a microtask to the microtask queue.
    ///
    /// The microtask will be executed after the current task completes.
    pub fn enqueue_microtask(&mut self, microtask: MicroTask) {
        self.microtask_queue.enqueue_microtask(microtask);
    }

    /// Returns true if the task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.task_queue.is_empty()
    }

    /// Returns true if the microtask queue is empty.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.microtask_queue.is_empty()
    }

    /// Runs all microtasks in the queue until empty.
    ///
    /// This drains the microtask queue completely. New microtasks added during
    /// execution will also be processed before this method returns.
    ///
    /// # Returns
    ///
    /// The number of microtasks that ran.
    pub fn run_all_microtasks(&mut self) -> RuntimeResult<usize> {
        let mut ran = 0;
        while let Some(microtask) = self.microtask_queue.dequeue() {
            if let Some(limit) = self.config.microtask_limit {
                if ran >= limit {
                    return Err(RuntimeError::MicrotaskLimitExceeded { limit });
                }
            }
            ran += 1;
            microtask.run().map_err(RuntimeError::Uncaught)?;
        }
        if ran > 0 {
            debug!(jobs = ran, "drained microtask queue");
        }
        Ok(ran)
    }

    /// Runs all tasks in the queue (without processing microtasks between them).
    ///
    /// This is primarily for testing purposes.
    pub fn run_all_tasks(&mut self) -> RuntimeResult<()> {
        while let Some(task) = self.task_queue.dequeue() {
            task.run().map_err(RuntimeError::Uncaught)?;
        }
        Ok(())
    }

    /// Processes one complete cycle: one task followed by all microtasks.
    ///
    /// This represents one iteration of the event loop.
    pub fn process_one_cycle(&mut self) -> RuntimeResult<()> {
        // Execute one task if available
        if let Some(task) = self.task_queue.dequeue() {
            task.run().map_err(RuntimeError::Uncaught)?;
        }

        // Drain all microtasks
        self.run_all_microtasks().map(|_| ())
    }
}
