//! # Typed Values
//!
//! `TypedValue` is the in-memory form produced by decoding a JSON document
//! against a descriptor, and the input to encoding. It mirrors the JSON data
//! model and adds one structured variant, [`TypedValue::Timestamp`].
//!
//! Objects are keyed by the internal (typed-side) field names and kept in
//! key order.

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};
use serde_json::{Number, Value};

use crate::temporal::Timestamp;

/// A typed value: JSON plus structured timestamps.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Timestamp(Timestamp),
    Array(Vec<TypedValue>),
    Object(BTreeMap<String, TypedValue>),
}

impl TypedValue {
    /// Name of this value's kind, as used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Timestamp(_) => "Date",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[TypedValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, TypedValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key on an object value. `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Convert to JSON, rendering timestamps in their wire form.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Timestamp(ts) => Value::String(ts.to_wire_string()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Consuming variant of [`TypedValue::to_json`].
    pub fn into_json(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Number(n) => Value::Number(n),
            Self::String(s) => Value::String(s),
            Self::Timestamp(ts) => Value::String(ts.to_wire_string()),
            Self::Array(items) => Value::Array(items.into_iter().map(Self::into_json).collect()),
            Self::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for TypedValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for TypedValue {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<Timestamp> for TypedValue {
    fn from(ts: Timestamp) -> Self {
        Self::Timestamp(ts)
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Timestamp(ts) => ts.serialize(serializer),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Object(map) => serializer.collect_map(map),
        }
    }
}
