//! The job scheduler promises submit their work to.
//!
//! Promises never run handlers on the stack that registered or settled them;
//! every reaction becomes a [`MicroTask`] handed to a [`Scheduler`]. The
//! scheduler is injected when a promise is created and inherited by every
//! promise derived from it.

use crate::task_queue::{MicroTask, MicrotaskQueue};
use std::cell::RefCell;
use std::rc::Rc;

/// A single-threaded FIFO job queue.
///
/// Implementations must run jobs in submission order and never run a job
/// inside `enqueue_microtask` itself.
pub trait Scheduler {
    /// Submits a job to run after the current synchronous work completes.
    fn enqueue_microtask(&self, job: MicroTask);
}

/// Shared handle to the scheduler a promise reports into.
pub type SchedulerRef = Rc<dyn Scheduler>;

/// A cloneable handle onto a shared [`MicrotaskQueue`].
///
/// All clones feed the same queue, so a `JobQueue` can be handed to promises
/// while the event loop keeps draining it.
///
/// # Examples
///
/// ```
/// use async_runtime::{JobQueue, MicroTask, Scheduler};
///
/// let jobs = JobQueue::new();
/// jobs.clone().enqueue_microtask(MicroTask::new(|| Ok(())));
/// assert_eq!(jobs.len(), 1);
/// assert!(jobs.dequeue().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct JobQueue {
    queue: Rc<RefCell<MicrotaskQueue>>,
}

impl JobQueue {
    /// Creates an empty job queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the oldest job.
    ///
    /// The queue is not borrowed while the returned job runs, so the job may
    /// enqueue further jobs.
    pub fn dequeue(&self) -> Option<MicroTask> {
        self.queue.borrow_mut().dequeue()
    }

    /// Returns true if no job is waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Returns the number of waiting jobs.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Scheduler for JobQueue {
    fn enqueue_microtask(&self, job: MicroTask) {
        tracing::trace!(job = job.name(), "enqueue microtask");
        self.queue.borrow_mut().enqueue(job);
    }
}
