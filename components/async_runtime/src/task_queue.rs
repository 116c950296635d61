//! Task and microtask queue management.
//!
//! This module provides the task and microtask queues used by the event loop.
//! Tasks are executed one at a time, with all microtasks draining after each task.

use core_types::JsResult;
use std::collections::VecDeque;

/// A task to be executed by the event loop.
///
/// Tasks represent host work done in a later iteration of the event loop,
/// such as a timer firing or an I/O completion settling a promise.
pub struct Task {
    callback: Box<dyn FnOnce() -> JsResult<()>>,
}

impl Task {
    /// Creates a new Task from a closure.
    ///
    /// # Arguments
    ///
    /// * `f` - The function to execute when the task runs
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> JsResult<()> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the task.
    ///
    /// # Returns
    ///
    /// `Err` with the thrown value if the task threw.
    pub fn run(self) -> JsResult<()> {
        (self.callback)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ ... }}")
    }
}

/// A microtask to be executed by the event loop.
///
/// Microtasks are executed after each task. Promise reaction jobs and
/// thenable adoption jobs are microtasks.
pub struct MicroTask {
    name: &'static str,
    callback: Box<dyn FnOnce() -> JsResult<()>>,
}

impl MicroTask {
    /// Creates a new MicroTask from a closure.
    ///
    /// # Arguments
    ///
    /// * `f` - The function to execute when the microtask runs
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> JsResult<()> + 'static,
    {
        Self::named("MicroTask", f)
    }

    /// Creates a MicroTask carrying a job name for tracing.
    pub fn named<F>(name: &'static str, f: F) -> Self
    where
        F: FnOnce() -> JsResult<()> + 'static,
    {
        Self {
            name,
            callback: Box::new(f),
        }
    }

    /// The job name given at creation.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Executes the microtask.
    ///
    /// # Returns
    ///
    /// `Err` with the thrown value if the microtask threw.
    pub fn run(self) -> JsResult<()> {
        (self.callback)()
    }
}

impl std::fmt::Debug for MicroTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MicroTask {{ name: {:?}, ... }}", self.name)
    }
}

/// A queue for tasks.
///
/// Tasks are processed in FIFO order, one at a time.
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
}

impl TaskQueue {
    /// Creates a new empty TaskQueue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a task to the end of the queue.
    pub fn enqueue(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Removes and returns the next task from the queue.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of tasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// A queue for microtasks.
///
/// Microtasks are drained completely after each task.
#[derive(Debug, Default)]
pub struct MicrotaskQueue {
    queue: VecDeque<MicroTask>,
}

impl MicrotaskQueue {
    /// Creates a new empty MicrotaskQueue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a microtask to the end of the queue.
    pub fn enqueue(&mut self, microtask: MicroTask) {
        self.queue.push_back(microtask);
    }

    /// Removes and returns the next microtask from the queue.
    pub fn dequeue(&mut self) -> Option<MicroTask> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of microtasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
