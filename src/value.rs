//! Value Module
//!
//! The dynamically-typed payload stored in the cache. Values of different
//! shapes can be stored interchangeably under any key; only `incr`/`decr`
//! care about the variant.

use std::collections::BTreeMap;

// == Value ==
/// A cacheable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
    Bytes(Vec<u8>),
}

impl Value {
    /// Wraps raw bytes. Kept explicit so `Vec<u8>` is never confused with a sequence.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Builds a mapping from `(key, value)` pairs.
    pub fn mapping<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Short variant name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Bytes(_) => "bytes",
        }
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Mapping(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from("hi"), Value::String("hi".to_string()));
        assert_eq!(Value::from(10), Value::Int(10));
        assert_eq!(Value::from(2.5), Value::Float(2.5));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::bytes(vec![1u8, 2]), Value::Bytes(vec![1, 2]));
    }

    #[test]
    fn test_kind_names_variants() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Float(1.5).kind(), "float");
        assert_eq!(Value::bytes(vec![0u8]).kind(), "bytes");
    }

    #[test]
    fn test_mapping_builder() {
        let value = Value::mapping([("hello", "world")]);
        match value {
            Value::Mapping(map) => assert_eq!(map["hello"], Value::from("world")),
            other => panic!("expected mapping, got {}", other.kind()),
        }
    }
}
