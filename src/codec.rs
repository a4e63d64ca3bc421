//! Codec Module
//!
//! Serialization boundary between [`Value`] and the bytes handed to a store.
//!
//! `JsonCodec` writes plain JSON. Raw bytes travel
//! as `{"$bytes": "<base64>"}`; mapping keys that start with `$` get one extra
//! `$` so they can never be mistaken for that marker.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Number as JsonNumber, Value as Json};

use crate::error::{CacheError, Result};
use crate::value::Value;

const BYTES_MARKER: &str = "$bytes";

// == Codec Trait ==
/// Converts values to and from the store's byte representation.
///
/// Implementations must round-trip every `Value` variant. `Cache` never hands
/// a codec an `Int` or `Float` at the top level: those are stored as decimal
/// text so the store can increment them in place. Encodings of other values
/// must not parse as a bare JSON number.
pub trait Codec: Send + Sync + std::fmt::Debug {
    fn encode(&self, value: &Value) -> Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> Result<Value>;
}

// == JSON Codec ==
/// Default codec backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&to_json(value)?)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let json: Json = serde_json::from_slice(bytes)?;
        from_json(json)
    }
}

fn to_json(value: &Value) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::Number((*n).into()),
        Value::Float(f) => JsonNumber::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| CacheError::Serialization(format!("non-finite float {f}")))?,
        Value::String(s) => Json::String(s.clone()),
        Value::Sequence(items) => Json::Array(items.iter().map(to_json).collect::<Result<_>>()?),
        Value::Mapping(map) => {
            let mut object = Map::with_capacity(map.len());
            for (key, item) in map {
                object.insert(escape_key(key), to_json(item)?);
            }
            Json::Object(object)
        }
        Value::Bytes(data) => {
            let mut object = Map::with_capacity(1);
            object.insert(BYTES_MARKER.to_string(), Json::String(STANDARD.encode(data)));
            Json::Object(object)
        }
    })
}

fn from_json(json: Json) -> Result<Value> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| CacheError::Serialization(format!("unsupported number {n}")))?,
        },
        Json::String(s) => Value::String(s),
        Json::Array(items) => {
            Value::Sequence(items.into_iter().map(from_json).collect::<Result<_>>()?)
        }
        Json::Object(object) => {
            if object.len() == 1 {
                if let Some(Json::String(encoded)) = object.get(BYTES_MARKER) {
                    return Ok(Value::Bytes(STANDARD.decode(encoded)?));
                }
            }
            let mut map = BTreeMap::new();
            for (key, item) in object {
                map.insert(unescape_key(&key).to_string(), from_json(item)?);
            }
            Value::Mapping(map)
        }
    })
}

fn escape_key(key: &str) -> String {
    if key.starts_with('$') {
        format!("${key}")
    } else {
        key.to_string()
    }
}

fn unescape_key(key: &str) -> &str {
    key.strip_prefix('$').unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: Value) -> Value {
        let codec = JsonCodec;
        let bytes = codec.encode(&value).unwrap();
        codec.decode(&bytes).unwrap()
    }

    #[test]
    fn test_unicode_string_roundtrip() {
        assert_eq!(roundtrip(Value::from("łóć")), Value::from("łóć"));
    }

    #[test]
    fn test_nested_roundtrip() {
        let value = Value::mapping([
            ("hello", Value::from("world")),
            ("list", Value::Sequence(vec![Value::Int(1), Value::Float(2.0), Value::Null])),
            ("flag", Value::Bool(false)),
        ]);
        assert_eq!(roundtrip(value.clone()), value);
    }

    #[test]
    fn test_int_and_float_stay_distinct() {
        assert_eq!(roundtrip(Value::Float(10.0)), Value::Float(10.0));
        assert_eq!(roundtrip(Value::Int(10)), Value::Int(10));
    }

    #[test]
    fn test_floats_roundtrip_exactly() {
        for f in [971.9863718547629, 0.1 + 0.2, 5e-324, f64::MAX, -1.7976931348623157e300] {
            assert_eq!(roundtrip(Value::Float(f)), Value::Float(f));
        }
    }

    #[test]
    fn test_numbers_encode_as_decimal_text() {
        assert_eq!(JsonCodec.encode(&Value::Int(10)).unwrap(), b"10".to_vec());
        assert_eq!(JsonCodec.encode(&Value::Float(12.5)).unwrap(), b"12.5".to_vec());
    }

    #[test]
    fn test_bytes_do_not_collide_with_user_mappings() {
        let bytes = Value::bytes(vec![0u8, 159, 255]);
        assert_eq!(roundtrip(bytes.clone()), bytes);

        let lookalike = Value::mapping([("$bytes", "AJ//")]);
        assert_eq!(roundtrip(lookalike.clone()), lookalike);

        let dollars = Value::mapping([("$$x", 1)]);
        assert_eq!(roundtrip(dollars.clone()), dollars);
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let result = JsonCodec.encode(&Value::Float(f64::NAN));
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = JsonCodec.decode(b"\xff\xfe");
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }
}
