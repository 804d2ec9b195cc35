//! Schema-free records and their identifiers.
//!
//! A [`Record`] is one row of a remote resource collection: a JSON object whose
//! fields the table knows nothing about, except the configured uid field.
//! Identifiers are interned with `Ustr` because they are compared and cloned on
//! every reconciliation pass.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ustr::Ustr;

/// Normalized unique identifier of a record.
///
/// JSON strings are taken verbatim, numbers by their JSON text, so `1` and `"1"`
/// address the same record. Any other JSON type is not a valid identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uid(Ustr);

impl Uid {
    pub fn new(value: &str) -> Self {
        Self(Ustr::from(value))
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self::new(s)),
            Value::Number(n) => Some(Self::new(&n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for Uid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for Uid {
    fn from(value: u64) -> Self {
        Self::new(&value.to_string())
    }
}

/// One row of a resource collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

/// Partial record carrying only the fields to change.
pub type Patch = Record;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion, handy for literals in call sites and tests.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn uid(&self, uid_field: &str) -> Option<Uid> {
        self.get(uid_field).and_then(Uid::from_value)
    }

    /// Shallow merge: every top-level field of `patch` overwrites ours.
    pub fn merge(&mut self, patch: &Patch) {
        for (field, value) in &patch.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }

    pub fn merged(&self, patch: &Patch) -> Self {
        let mut next = self.clone();
        next.merge(patch);
        next
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
