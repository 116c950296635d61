//! Host objects that take part in thenable adoption.

use crate::{JsResult, Value};
use std::any::Any;

/// An object whose `then` member can be read.
///
/// This is the only capability the promise resolution procedure needs from a
/// host object. Reading the member runs arbitrary code: it may throw, and it
/// may return a different value on every read. Objects without a `then`
/// member return `undefined`.
///
/// # Examples
///
/// ```
/// use core_types::{JsResult, Thenable, Value};
/// use std::any::Any;
/// use std::rc::Rc;
///
/// struct Poisoned;
///
/// impl Thenable for Poisoned {
///     fn get_then(&self) -> JsResult<Value> {
///         Err(Value::from("getter threw"))
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let value = Value::Object(Rc::new(Poisoned));
/// assert_eq!(value.get_then(), Err(Value::from("getter threw")));
/// ```
pub trait Thenable: Any {
    /// Reads the `then` member.
    ///
    /// When the result is a function, resolution calls it with this object's
    /// `Value::Object` as the receiver.
    fn get_then(&self) -> JsResult<Value>;

    /// Returns `self` for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}
