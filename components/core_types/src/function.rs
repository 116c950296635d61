//! Native callable values.

use crate::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Result of running JavaScript-visible code. The error side is the thrown value.
pub type JsResult<T> = Result<T, Value>;

type Callback = dyn Fn(&Value, &[Value]) -> JsResult<Value>;

struct FunctionInner {
    callback: Box<Callback>,
    members: RefCell<BTreeMap<String, Value>>,
}

/// A function that can be called with arguments and may throw.
///
/// Cloning a `Function` yields another handle to the same callable, so
/// identity is preserved through [`Function::ptr_eq`]. Functions are objects:
/// named members set on one handle are visible through every clone, which
/// lets a function carry its own `then`.
///
/// # Examples
///
/// ```
/// use core_types::{Function, Value};
///
/// let double = Function::unary(|value| match value {
///     Value::Smi(n) => Ok(Value::Smi(n * 2)),
///     other => Err(other),
/// });
/// assert_eq!(double.call(&[Value::Smi(21)]), Ok(Value::Smi(42)));
/// assert_eq!(double.call(&[]), Err(Value::Undefined));
/// ```
#[derive(Clone)]
pub struct Function {
    inner: Rc<FunctionInner>,
}

impl Function {
    /// Creates a new Function from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> JsResult<Value> + 'static,
    {
        Self::method(move |_this, args| f(args))
    }

    /// Creates a Function that also sees the receiver it was called on.
    ///
    /// Plain [`Function::call`] passes `undefined` as the receiver.
    pub fn method<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> JsResult<Value> + 'static,
    {
        Self {
            inner: Rc::new(FunctionInner {
                callback: Box::new(f),
                members: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    /// Creates a Function that only looks at its first argument.
    ///
    /// A missing argument is passed as `undefined`.
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(Value) -> JsResult<Value> + 'static,
    {
        Self::new(move |args| f(argument(args, 0)))
    }

    /// Calls the function with the given arguments.
    pub fn call(&self, args: &[Value]) -> JsResult<Value> {
        self.call_with_this(&Value::Undefined, args)
    }

    /// Calls the function with `this` as the receiver.
    pub fn call_with_this(&self, this: &Value, args: &[Value]) -> JsResult<Value> {
        (self.inner.callback)(this, args)
    }

    /// Reads a named member. `None` when it was never set.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.members.borrow().get(name).cloned()
    }

    /// Sets a named member, visible through every clone of this handle.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.inner.members.borrow_mut().insert(name.into(), value);
    }

    /// Builder form of [`Function::set`].
    pub fn with_member(self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Returns true if both handles refer to the same callable.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function {{ ... }}")
    }
}

/// Returns argument `index`, or `undefined` when the caller passed fewer.
pub fn argument(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}
