//! Dynamically shaped field values

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Value held by a field. The shape follows the field's `TypeTag`.
///
/// Serialized untagged so it round-trips through node template JSON as the
/// plain value (`"abc"`, `3`, `["a"]`, `{"k": "v"}`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
    Map(Map<String, Value>),
    Records(Vec<Map<String, Value>>),
    Json(Value),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Json(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(text) => text.trim().parse().ok(),
            FieldValue::Json(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Json(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Text content, treating anything non-textual as empty
    pub fn text_or_empty(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(text) => text.clone(),
            other => other.display_string(),
        }
    }

    /// Coerce to a list of strings. A scalar becomes a single entry.
    pub fn to_string_list(&self) -> Vec<String> {
        match self {
            FieldValue::Null => Vec::new(),
            FieldValue::List(items) => items.clone(),
            FieldValue::Text(text) => vec![text.clone()],
            FieldValue::Json(Value::Array(items)) => items.iter().map(value_to_text).collect(),
            other => vec![other.display_string()],
        }
    }

    /// Coerce to a list of records, accepting a single object as one record
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        match self {
            FieldValue::Records(records) => records.clone(),
            FieldValue::Map(map) => vec![map.clone()],
            FieldValue::Json(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Human readable form used by previews and the read-only fallback
    pub fn display_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join(", "),
            other => serde_json::to_string(&other.to_json()).unwrap_or_default(),
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(FieldValue::Json(value))
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

/// String form of a JSON scalar without the surrounding quotes
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_shapes() {
        assert_eq!(FieldValue::from(json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from(json!(3)), FieldValue::Int(3));
        assert_eq!(FieldValue::from(json!(2.5)), FieldValue::Float(2.5));
        assert_eq!(FieldValue::from(json!(["a", "b"])), FieldValue::List(vec!["a".into(), "b".into()]));
        assert!(matches!(FieldValue::from(json!({"k": 1})), FieldValue::Map(_)));
        assert!(matches!(FieldValue::from(json!([{"k": 1}])), FieldValue::Records(_)));
        assert!(matches!(FieldValue::from(json!([1, "x"])), FieldValue::Json(_)));
    }

    #[test]
    fn test_string_list_coercion() {
        assert_eq!(FieldValue::text("a").to_string_list(), vec!["a".to_string()]);
        assert!(FieldValue::Null.to_string_list().is_empty());
        assert_eq!(
            FieldValue::from(json!([1, "x"])).to_string_list(),
            vec!["1".to_string(), "x".to_string()]
        );
    }

    #[test]
    fn test_display_string() {
        assert_eq!(FieldValue::List(vec!["a".into(), "b".into()]).display_string(), "a, b");
        assert_eq!(FieldValue::from(json!({"k": 1})).display_string(), r#"{"k":1}"#);
    }
}
