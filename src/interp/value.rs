//! Runtime values for the interpreter

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::eval::FunctionId;
use super::frame::FrameRef;
use crate::diagnostics::RuntimeError;

/// Opaque handle standing in for an arbitrary-precision integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BigIntHandle(pub u32);

/// A function value: the declared name, a handle into the interpreter's
/// function table, and the frame the declaration ran in. Copies of the value
/// share the same body and the same captured frame.
#[derive(Clone)]
pub struct FunctionRef {
    pub name: String,
    pub id: FunctionId,
    pub scope: FrameRef,
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.scope, &other.scope)
    }
}

// The captured frame may bind this very value
impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRef")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Runtime value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    /// 64-bit float
    Number(#[serde(with = "number_repr")] f64),
    /// 32-bit signed integer
    Int(i32),
    String(String),
    BigInt(BigIntHandle),
    /// Objects are tagged only; they carry no properties
    Object,
    /// Only the interpreter creates functions, so they never appear in a
    /// serialized tree
    #[serde(skip)]
    Function(FunctionRef),
}

impl Value {
    /// The "not a number" placeholder produced by arithmetic without a rule
    pub fn nan() -> Self {
        Value::Number(f64::NAN)
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::Int(_) => "int",
            Value::String(_) => "string",
            Value::BigInt(_) => "bigint",
            Value::Object => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_bigint(&self) -> bool {
        matches!(self, Value::BigInt(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    fn wrong_variant(&self, expected: &'static str) -> RuntimeError {
        RuntimeError::WrongVariant {
            expected,
            found: self.type_name(),
        }
    }

    /// The payload of a `Number`; any other variant is a contract violation
    pub fn as_f64(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::Number(n) => Ok(*n),
            _ => Err(self.wrong_variant("number")),
        }
    }

    pub fn as_i32(&self) -> Result<i32, RuntimeError> {
        match self {
            Value::Int(n) => Ok(*n),
            _ => Err(self.wrong_variant("int")),
        }
    }

    pub fn as_str(&self) -> Result<&str, RuntimeError> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.wrong_variant("string")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.wrong_variant("boolean")),
        }
    }

    pub fn as_function(&self) -> Result<&FunctionRef, RuntimeError> {
        match self {
            Value::Function(f) => Ok(f),
            _ => Err(self.wrong_variant("function")),
        }
    }

    /// Truthiness
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
            // NaN compares unequal to zero but is still falsy
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Int(n) => *n != 0,
            Value::Object | Value::Function(_) => true,
            Value::Undefined | Value::Null | Value::BigInt(_) => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
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

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write_number(f, *n),
            Value::Int(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::BigInt(_) => write!(f, "[object BigInt]"),
            Value::Object => write!(f, "[object Object]"),
            Value::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name),
        }
    }
}

/// `Number` payloads as plain numbers, with `NaN`, `Infinity` and `-Infinity`
/// spelled out as strings since JSON has no literal for them
mod number_repr {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if n.is_nan() {
            serializer.serialize_str("NaN")
        } else if n.is_infinite() {
            serializer.serialize_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
        } else {
            serializer.serialize_f64(*n)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Finite(f64),
        Named(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Finite(n) => Ok(n),
            Repr::Named(name) => match name.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                _ => Err(D::Error::custom(format!("invalid number `{}`", name))),
            },
        }
    }
}

/// Outcome of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Execution continues with the next statement
    Normal(Value),
    /// A `return` is unwinding to the nearest call site
    Return(Value),
}

impl Completion {
    pub fn value(&self) -> &Value {
        match self {
            Completion::Normal(v) | Completion::Return(v) => v,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Completion::Normal(v) | Completion::Return(v) => v,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Completion::Return(_))
    }
}
