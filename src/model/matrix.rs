// src/model/matrix.rs

//! Matrix value-records.
//!
//! A [`MatrixRecord`] is the value-record a single matrix child task was
//! expanded from. Records are compared structurally: two records are the
//! same instance iff they hold the same keys with the same string values,
//! regardless of the order the keys arrived in.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical, order-independent matrix value-record.
///
/// Backed by a `BTreeMap`, so `Eq`/`Hash`/`Ord` all operate over the sorted
/// key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct MatrixRecord(BTreeMap<String, String>);

impl MatrixRecord {
    /// Coerce a JSON value into a record.
    ///
    /// Returns `None` if the value is not a JSON object.
    pub fn from_json(value: &Value) -> Option<Self> {
        value.as_object().map(|obj| Self::from(obj.clone()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Convert back into a JSON object (all values are strings).
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}

/// String coercion for a single record value.
///
/// `null` yields `None` and the key is dropped.
fn coerce_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

impl From<Map<String, Value>> for MatrixRecord {
    fn from(obj: Map<String, Value>) -> Self {
        let inner = obj
            .iter()
            .filter_map(|(k, v)| coerce_value(v).map(|s| (k.clone(), s)))
            .collect();
        Self(inner)
    }
}

impl From<BTreeMap<String, String>> for MatrixRecord {
    fn from(inner: BTreeMap<String, String>) -> Self {
        Self(inner)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for MatrixRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for MatrixRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        write!(f, "}}")
    }
}
