//! Arithmetic Coercion
//!
//! Numeric promotion rules for incr/decr: int + int stays int, any float
//! operand makes the result a float. Overflow and non-finite results are
//! rejected rather than wrapped.

use std::fmt;

use crate::error::{CacheError, Result};
use crate::value::Value;

// == Number ==
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Numeric view of a value. Bools are not numbers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    // == Checked Add ==
    /// Adds with promotion; `None` on i64 overflow or a non-finite float.
    pub fn checked_add(self, other: Number) -> Option<Number> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.checked_add(b).map(Number::Int),
            (a, b) => {
                let sum = a.as_f64() + b.as_f64();
                sum.is_finite().then_some(Number::Float(sum))
            }
        }
    }

    pub fn checked_neg(self) -> Option<Number> {
        match self {
            Number::Int(n) => n.checked_neg().map(Number::Int),
            Number::Float(f) => Some(Number::Float(-f)),
        }
    }

    // == Byte Form ==
    /// Parses the decimal text a store holds for a numeric entry.
    pub fn parse(bytes: &[u8]) -> Option<Number> {
        let n: serde_json::Number = serde_json::from_slice(bytes).ok()?;
        match n.as_i64() {
            Some(i) => Some(Number::Int(i)),
            None => n.as_f64().map(Number::Float),
        }
    }

    /// Decimal text; floats always keep a fraction or exponent so they
    /// parse back as floats.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        match self {
            Number::Int(n) => Ok(n.to_string().into_bytes()),
            Number::Float(f) => serde_json::Number::from_f64(f)
                .map(|n| n.to_string().into_bytes())
                .ok_or_else(|| CacheError::Serialization(format!("non-finite float {f}"))),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl PartialEq<i64> for Number {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Number::Int(n) if n == other)
    }
}

impl PartialEq<f64> for Number {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Number::Float(x) if x == other)
    }
}
