//! Discovery document data model
//!
//! A discovery document is an arbitrary JSON object; no schema is enforced at
//! parse time. Fields are interpreted opportunistically by the classifier and
//! validator, so unknown servers (and unknown extensions) never fail to load.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parsed discovery document: a raw JSON object keyed by field name.
///
/// Wraps `serde_json::Map` rather than a fixed struct so that every top-level
/// key survives the parse, including ones no RFC names. The classifier decides
/// what each key means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoveryDocument(serde_json::Map<String, Value>);

impl DiscoveryDocument {
    /// Wrap an already-parsed JSON value. Returns `None` unless the value is
    /// an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Get a field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over all top-level fields in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Get a field as a non-blank string, if it is one.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }
}

impl From<serde_json::Map<String, Value>> for DiscoveryDocument {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One classified field, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayField {
    /// The raw document key, e.g. `token_endpoint`.
    pub key: String,
    /// Human-friendly label derived from the key.
    pub label: String,
    /// The value flattened to a display string.
    pub value: String,
}

impl DisplayField {
    pub(crate) fn new(key: &str, value: String) -> Self {
        Self {
            key: key.to_string(),
            label: field_label(key),
            value,
        }
    }
}

/// Derive a human-friendly label from a snake_case key.
///
/// Underscores become spaces, then the first letter of every word is
/// uppercased: `token_endpoint` -> `Token Endpoint`. Pure and deterministic.
pub fn field_label(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flatten a JSON value to a display string.
///
/// Arrays are comma-joined, objects pretty-printed, scalars stringified.
/// Returns `None` for null and for anything that flattens to a blank string;
/// such fields are omitted from classification entirely.
pub fn flatten_value(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_scalar)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string_pretty(value).unwrap_or_default(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    };

    if rendered.trim().is_empty() {
        None
    } else {
        Some(rendered)
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
