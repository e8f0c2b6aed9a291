use std::collections::BTreeMap;

use bytes::Bytes;

use crate::error::{CodecError, Result};

/// String-keyed fields of a record value.
pub type Record = BTreeMap<String, Value>;

/// A dynamically typed wire value.
///
/// `Absent` is the distinguished "no value", distinct from JSON `null`; the
/// two travel under different tags and must not be conflated.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Absent,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Bytes(Bytes),
    Array(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Whether this is the absent value.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Borrow as a string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow as an array, if this is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as a record, if this is one.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Borrow as raw bytes, if this is a byte blob.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Convert a JSON document into a wire value.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert to a JSON document.
    ///
    /// Fails for content JSON cannot express: the absent value, raw bytes,
    /// and non-finite numbers.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        match self {
            Value::Absent => Err(CodecError::NotJson("absent value")),
            Value::Null => Ok(serde_json::Value::Null),
            Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .ok_or(CodecError::NotJson("non-finite number")),
            Value::String(s) => Ok(serde_json::Value::String(s.clone())),
            Value::Bytes(_) => Err(CodecError::NotJson("raw bytes")),
            Value::Array(items) => Ok(serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Record(fields) => {
                let mut map = serde_json::Map::with_capacity(fields.len());
                for (key, value) in fields {
                    map.insert(key.clone(), value.to_json()?);
                }
                Ok(serde_json::Value::Object(map))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip_preserves_structure() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a":[1,true,null],"b":{"c":"x"}}"#).unwrap();
        let value = Value::from_json(json.clone());
        assert_eq!(value.to_json().unwrap(), json);
    }

    #[test]
    fn absent_is_not_json() {
        assert!(matches!(
            Value::Absent.to_json(),
            Err(CodecError::NotJson(_))
        ));
    }

    #[test]
    fn bytes_are_not_json() {
        let value = Value::Array(vec![Value::Bytes(Bytes::from_static(b"x"))]);
        assert!(matches!(value.to_json(), Err(CodecError::NotJson(_))));
    }

    #[test]
    fn non_finite_number_is_not_json() {
        assert!(matches!(
            Value::Number(f64::NAN).to_json(),
            Err(CodecError::NotJson(_))
        ));
    }

    #[test]
    fn null_and_absent_are_distinct() {
        assert_ne!(Value::Null, Value::Absent);
        assert!(!Value::Null.is_absent());
        assert!(Value::Absent.is_absent());
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(3).as_f64(), Some(3.0));
        assert!(Value::from(3).as_str().is_none());
        let arr = Value::Array(vec![Value::Null]);
        assert_eq!(arr.as_array().map(<[Value]>::len), Some(1));
    }
}
