//! Core JavaScript value types and error handling.
//!
//! This crate provides the foundational types shared by the promise runtime:
//! dynamically typed values, native callables, the thenable capability and
//! the error objects used as rejection reasons.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of JavaScript values
//! - [`Function`] - Reference-counted native callable
//! - [`Thenable`] - Host objects whose `then` member may be read
//! - [`JsError`] - Native error objects (`TypeError`, `AggregateError`, ...)
//! - [`ErrorKind`] - Types of JavaScript errors
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, Function, JsError, Value};
//!
//! // Create JavaScript values
//! let num = Value::Smi(42);
//! assert!(num.is_truthy());
//! assert_eq!(num.type_of(), "number");
//!
//! // Anything can be thrown, including native errors
//! let thrower = Function::new(|_args| Err(JsError::type_error("not a function").into()));
//! let thrown = thrower.call(&[]).unwrap_err();
//! assert!(matches!(thrown.as_error().map(|e| &e.kind), Some(ErrorKind::TypeError)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod function;
mod object;
mod value;

pub use error::{ErrorKind, JsError};
pub use function::{argument, Function, JsResult};
pub use object::Thenable;
pub use value::Value;
