use std::fmt;

use itertools::Itertools;

use super::Thunk;
use crate::backend::callable::Callable;
use crate::backend::errors::{RuntimeError, RuntimeResult};

/// Dynamically-typed value passed between callables and continuations
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value (what a bare `return` sends through `cc`)
    Nil,
    /// A boolean literal
    Bool(bool),
    /// An integer literal
    Long(i64),
    /// A floating point literal
    Float(f64),
    /// A string literal
    String(String),
    /// Multiple values travelling as one
    Tuple(Vec<Value>),
    /// A list treated as a single value
    List(Vec<Value>),
    /// Anything invocable: functions, continuations, escape handles
    Callable(Callable),
    /// A lazily-evaluated argument (deferred-argument mode)
    Thunk(Thunk),
}

impl Value {
    pub fn tuple<I, V>(items: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn list<I, V>(items: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, used in type mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Callable(_) => "callable",
            Value::Thunk(_) => "thunk",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Falsy values are nil, false, zero and empty containers
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Long(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Tuple(items) | Value::List(items) => !items.is_empty(),
            Value::Callable(_) | Value::Thunk(_) => true,
        }
    }

    /// Resolve a thunk to its value; any other value is returned as is
    pub fn force(self) -> RuntimeResult<Value> {
        match self {
            Value::Thunk(thunk) => thunk.force(),
            other => Ok(other),
        }
    }

    pub fn as_long(&self) -> RuntimeResult<i64> {
        match self {
            Value::Long(n) => Ok(*n),
            other => Err(mismatch("long", other)),
        }
    }

    pub fn as_bool(&self) -> RuntimeResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn as_str(&self) -> RuntimeResult<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn as_callable(&self) -> RuntimeResult<&Callable> {
        match self {
            Value::Callable(c) => Ok(c),
            other => Err(mismatch("callable", other)),
        }
    }

    /// Items of a tuple or list
    pub fn as_items(&self) -> RuntimeResult<&[Value]> {
        match self {
            Value::Tuple(items) | Value::List(items) => Ok(items),
            other => Err(mismatch("tuple or list", other)),
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected,
        found: format!("{} {}", found.type_name(), found),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            Value::Tuple(items) => write!(f, "({})", items.iter().join(", ")),
            Value::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Callable(c) => write!(f, "<{}>", c.name()),
            Value::Thunk(t) => write!(f, "{}", t),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Long(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}

impl From<&Callable> for Value {
    fn from(c: &Callable) -> Self {
        Value::Callable(c.clone())
    }
}

impl From<Thunk> for Value {
    fn from(t: Thunk) -> Self {
        Value::Thunk(t)
    }
}
