//! The one change shape every widget reports

use serde::{Deserialize, Serialize};

use super::value::FieldValue;

/// Normalized change emitted by every widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub value: FieldValue,
    /// Set when the value names a global variable rather than a literal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_from_db: Option<bool>,
    /// Programmatic change that must not create an undo checkpoint
    #[serde(default)]
    pub skip_history_snapshot: bool,
    /// Backend storage path(s) for file fields; `value` holds the display name(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<FieldValue>,
}

impl UpdatePayload {
    pub fn new(value: impl Into<FieldValue>) -> Self {
        Self {
            value: value.into(),
            load_from_db: None,
            skip_history_snapshot: false,
            file_path: None,
        }
    }

    pub fn with_load_from_db(mut self, load_from_db: bool) -> Self {
        self.load_from_db = Some(load_from_db);
        self
    }

    pub fn without_snapshot(mut self) -> Self {
        self.skip_history_snapshot = true;
        self
    }

    pub fn with_file_path(mut self, file_path: impl Into<FieldValue>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }
}

/// An update addressed to a named field of the owning form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub payload: UpdatePayload,
}

impl FieldChange {
    pub fn new(field: impl Into<String>, payload: UpdatePayload) -> Self {
        Self {
            field: field.into(),
            payload,
        }
    }
}
