//! JavaScript error types.
//!
//! This module provides the native error objects that promises use as
//! rejection reasons, including `AggregateError` for `Promise.any`.

use crate::Value;
use std::fmt;
use thiserror::Error;

/// The kind of JavaScript error.
///
/// These correspond to JavaScript's built-in error constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Plain `Error`
    Error,
    /// Type error (e.g., resolving a promise with itself)
    TypeError,
    /// Value out of allowed range
    RangeError,
    /// Several errors wrapped in one (e.g., every input of `Promise.any` rejected)
    AggregateError,
    /// Internal engine error
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::AggregateError => "AggregateError",
            ErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// A JavaScript error object.
///
/// For [`ErrorKind::AggregateError`] the wrapped reasons are kept in
/// `errors`, in the order of the inputs that produced them.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, JsError, Value};
///
/// let error = JsError::type_error("undefined is not a function");
/// assert_eq!(error.kind, ErrorKind::TypeError);
/// assert_eq!(error.to_string(), "TypeError: undefined is not a function");
///
/// let aggregate = JsError::aggregate(vec![Value::from("a"), Value::from("b")]);
/// assert_eq!(aggregate.errors.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Wrapped reasons (only populated for `AggregateError`)
    pub errors: Vec<Value>,
}

impl JsError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Creates a `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// Creates an `AggregateError` carrying `errors` in order.
    pub fn aggregate(errors: Vec<Value>) -> Self {
        Self {
            kind: ErrorKind::AggregateError,
            message: "All promises were rejected".to_string(),
            errors,
        }
    }
}
