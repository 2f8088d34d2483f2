//! Raw template values
//!
//! Template documents are schemaless JSON. [`RawValue`] is the closed sum
//! type the interpreter matches over; it is decoded from any
//! `serde_json::Value`.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// A raw template document: field name to arbitrary value
pub type RawTemplate = BTreeMap<String, RawValue>;

/// One value of a raw template document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub enum RawValue {
    /// JSON `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Number representable as `i64`
    Integer(i64),
    /// Any other number
    Float(f64),
    /// String
    String(String),
    /// Ordered sequence of values
    Sequence(Vec<RawValue>),
    /// Nested mapping
    Mapping(BTreeMap<String, RawValue>),
}

/// Element shape of a sequence value
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceShape {
    /// Every element is a string (also used for the empty sequence)
    Strings(Vec<String>),
    /// Every element is an integer
    Integers(Vec<i64>),
    /// Every element is numeric and at least one is a float
    Floats(Vec<f64>),
    /// Anything else
    Mixed,
}

impl RawValue {
    /// Get as string slice, if this is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in log output
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Default string form
    ///
    /// Strings render bare, numbers in their shortest decimal form,
    /// sequences and mappings as compact JSON.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
            Self::Sequence(_) | Self::Mapping(_) => {
                serde_json::to_string(self).unwrap_or_else(|e| format!("Error: {e}"))
            }
        }
    }

    /// Classify the elements of a sequence
    #[must_use]
    pub fn classify_sequence(items: &[RawValue]) -> SequenceShape {
        if items.iter().all(|v| matches!(v, Self::String(_))) {
            return SequenceShape::Strings(items.iter().map(Self::render).collect());
        }
        if items.iter().all(|v| matches!(v, Self::Integer(_))) {
            return SequenceShape::Integers(
                items
                    .iter()
                    .filter_map(|v| match v {
                        Self::Integer(i) => Some(*i),
                        _ => None,
                    })
                    .collect(),
            );
        }
        #[allow(clippy::cast_precision_loss)]
        let numbers: Option<Vec<f64>> = items
            .iter()
            .map(|v| match v {
                Self::Integer(i) => Some(*i as f64),
                Self::Float(f) => Some(*f),
                _ => None,
            })
            .collect();
        numbers.map_or(SequenceShape::Mixed, SequenceShape::Floats)
    }
}

impl From<JsonValue> for RawValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Self::Float(f) => Err(S::Error::custom(format!(
                "{f} has no JSON representation"
            ))),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
