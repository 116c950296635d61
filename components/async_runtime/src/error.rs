//! Errors surfaced by the event loop.

use core_types::Value;
use thiserror::Error;

/// Failure of an event loop run.
///
/// Promise jobs never fail: handler throws become rejections. These errors
/// come from host tasks or microtasks that threw, or from a configured
/// microtask budget running out.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A task or microtask threw and nothing caught it.
    #[error("uncaught exception: {0}")]
    Uncaught(Value),

    /// A single drain ran more microtasks than the configured limit.
    #[error("microtask limit of {limit} exceeded in a single drain")]
    MicrotaskLimitExceeded {
        /// The configured limit
        limit: usize,
    },
}

/// Result type for event loop operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
