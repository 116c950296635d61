//! JavaScript value representation.
//!
//! This module provides the core `Value` enum carried by promises as
//! fulfillment values and rejection reasons.

use crate::{Function, JsError, JsResult, Thenable};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Represents any JavaScript value.
///
/// Primitive values are stored inline. Records are plain data objects whose
/// members are ordinary keys, so a record holding a `then` function is a
/// thenable. Host objects implement [`Thenable`] and are shared by reference.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let undefined = Value::Undefined;
/// let number = Value::Smi(42);
/// let float = Value::Double(3.14);
///
/// assert!(!undefined.is_truthy());
/// assert!(number.is_truthy());
/// assert!(float.is_truthy());
/// assert_eq!(number.type_of(), "number");
/// ```
#[derive(Clone)]
pub enum Value {
    /// JavaScript undefined value
    Undefined,
    /// JavaScript null value
    Null,
    /// JavaScript boolean (true or false)
    Boolean(bool),
    /// Small integer
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// JavaScript string value
    String(std::string::String),
    /// Array of values
    Array(Vec<Value>),
    /// Plain object with named members
    Record(BTreeMap<std::string::String, Value>),
    /// Callable function
    Function(Function),
    /// Host object (promises, exotic thenables)
    Object(Rc<dyn Thenable>),
    /// Native error object
    Error(Box<JsError>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Record(members) => f.debug_tuple("Record").field(members).finish(),
            Value::Function(_) => write!(f, "Function(...)"),
            Value::Object(_) => write!(f, "Object(...)"),
            Value::Error(e) => f.debug_tuple("Error").field(e).finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Builds a record from `(key, value)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// let record = Value::record([("status", Value::from("fulfilled")), ("value", Value::Smi(1))]);
    /// assert_eq!(record.get("status"), Some(Value::from("fulfilled")));
    /// assert_eq!(record.get("reason"), None);
    /// ```
    pub fn record<K, I>(members: I) -> Value
    where
        K: Into<std::string::String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Truthiness as used when a value is tested in a condition.
    ///
    /// `undefined`, `null`, `false`, `0`, `NaN` and `""` are falsy; arrays,
    /// records, functions, host objects and errors are always truthy.
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert!(!Value::Double(f64::NAN).is_truthy());
    /// assert!(!Value::from("").is_truthy());
    /// assert!(Value::Array(vec![]).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Smi(n) => *n != 0,
            Value::Double(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(_)
            | Value::Record(_)
            | Value::Function(_)
            | Value::Object(_)
            | Value::Error(_) => true,
        }
    }

    /// Returns the JavaScript typeof result for this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{Function, Value};
    ///
    /// assert_eq!(Value::Undefined.type_of(), "undefined");
    /// assert_eq!(Value::Null.type_of(), "object");
    /// assert_eq!(Value::Boolean(true).type_of(), "boolean");
    /// assert_eq!(Value::Smi(42).type_of(), "number");
    /// assert_eq!(Value::Function(Function::new(|_| Ok(Value::Undefined))).type_of(), "function");
    /// ```
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object", // JavaScript quirk
            Value::Boolean(_) => "boolean",
            Value::Smi(_) | Value::Double(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Array(_) | Value::Record(_) | Value::Object(_) | Value::Error(_) => "object",
        }
    }

    /// Returns true for objects and functions, i.e. values that may carry a `then` member.
    pub fn is_object(&self) -> bool {
        matches!(self.type_of(), "object" | "function") && !matches!(self, Value::Null)
    }

    /// Reads the `then` member of an object or function.
    ///
    /// Records and functions yield their `then` member, if set. Primitives,
    /// arrays and errors yield `undefined`. Host objects may throw.
    pub fn get_then(&self) -> JsResult<Value> {
        match self {
            Value::Record(members) => Ok(members.get("then").cloned().unwrap_or(Value::Undefined)),
            Value::Function(function) => Ok(function.get("then").unwrap_or(Value::Undefined)),
            Value::Object(object) => object.get_then(),
            _ => Ok(Value::Undefined),
        }
    }

    /// Reads a record or function member.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Record(members) => members.get(key).cloned(),
            Value::Function(function) => function.get(key),
            _ => None,
        }
    }

    /// Returns the callable if this value is a function.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the elements if this value is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the native error if this value is one.
    pub fn as_error(&self) -> Option<&JsError> {
        match self {
            Value::Error(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Smi(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<std::string::String> for Value {
    fn from(s: std::string::String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<JsError> for Value {
    fn from(e: JsError) -> Self {
        Value::Error(Box::new(e))
    }
}

/// String conversion, used for error messages and report output.
///
/// Arrays join their elements with `,` (nullish elements print empty),
/// records and host objects print as `[object Object]` and errors as
/// `Kind: message`.
///
/// ```
/// use core_types::Value;
///
/// assert_eq!(Value::Double(f64::INFINITY).to_string(), "Infinity");
/// assert_eq!(Value::Array(vec![Value::Smi(1), Value::Null, Value::Smi(2)]).to_string(), "1,,2");
/// assert_eq!(Value::record([("a", Value::Smi(1))]).to_string(), "[object Object]");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Smi(n) => write!(f, "{}", n),
            Value::Double(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    // Integer-valued doubles display without decimal point
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    match item {
                        Value::Undefined | Value::Null => {}
                        other => write!(f, "{}", other)?,
                    }
                }
                Ok(())
            }
            Value::Record(_) | Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(_) => write!(f, "function () {{ [native code] }}"),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}
