//! Async runtime for JavaScript execution.
//!
//! This crate provides the async runtime components for a JavaScript engine:
//! - Event loop with task and microtask queues
//! - Promise implementation following the Promises/A+ specification
//! - The `all`, `allSettled`, `race` and `any` combinators
//!
//! # Overview
//!
//! - [`EventLoop`] - Main event loop coordinating task execution
//! - [`Promise`] - Promises/A+ compliant promise handle
//! - [`Scheduler`] - Where promises queue their jobs; [`EventLoop::scheduler`]
//!   hands one out
//!
//! # Examples
//!
//! ## Event Loop Usage
//!
//! ```
//! use async_runtime::{EventLoop, Task};
//!
//! let mut event_loop = EventLoop::new();
//! event_loop.enqueue_task(Task::new(|| Ok(())));
//! event_loop.run_until_done().unwrap();
//! ```
//!
//! ## Promise Usage
//!
//! ```
//! use async_runtime::{EventLoop, Promise, PromiseState};
//! use core_types::{Function, Value};
//!
//! let mut event_loop = EventLoop::new();
//! let scheduler = event_loop.scheduler();
//!
//! let failed = Promise::reject(&scheduler, Value::from("boom"));
//! let recovered = failed.catch(Some(Function::unary(|_| Ok(Value::from("recovered")))));
//!
//! event_loop.run_until_done().unwrap();
//! assert_eq!(recovered.state(), PromiseState::Fulfilled);
//! assert_eq!(recovered.result(), Some(Value::from("recovered")));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod combinators;
pub mod error;
pub mod event_loop;
pub mod promise;
pub mod resolution;
pub mod scheduler;
pub mod task_queue;

// Re-export main types at crate root
pub use error::{RuntimeError, RuntimeResult};
pub use event_loop::{EventLoop, EventLoopConfig};
pub use promise::{Deferred, Promise, PromiseReaction, PromiseState, ResolvingFunctions};
pub use scheduler::{JobQueue, Scheduler, SchedulerRef};
pub use task_queue::{MicroTask, MicrotaskQueue, Task, TaskQueue};
