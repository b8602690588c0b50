//! Owning form for a node's parameters
//!
//! Receives every `FieldChange`, keeps undo checkpoints, and tracks which
//! fields are fed by an upstream connection (and therefore disabled).

use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::adapter::FormSink;
use crate::constants::form::DEFAULT_HISTORY_DEPTH;
use crate::error::TemplateError;
use crate::fields::{FieldChange, FieldDescriptor, FieldValue};

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub descriptor: FieldDescriptor,
    pub value: FieldValue,
    pub file_path: Option<FieldValue>,
    pub load_from_db: bool,
    /// Value comes from an upstream connection
    pub connected: bool,
}

impl FormField {
    pub fn new(descriptor: FieldDescriptor, value: FieldValue) -> Self {
        Self {
            load_from_db: descriptor.load_from_db,
            descriptor,
            value,
            file_path: None,
            connected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    value: FieldValue,
    file_path: Option<FieldValue>,
    load_from_db: bool,
}

#[derive(Debug, Clone)]
pub struct NodeForm {
    pub title: String,
    fields: Vec<FormField>,
    history: Vec<Vec<Snapshot>>,
    history_depth: usize,
    /// Bumped on every applied change and undo
    revision: u64,
}

impl NodeForm {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
            history: Vec::new(),
            history_depth: DEFAULT_HISTORY_DEPTH,
            revision: 0,
        }
    }

    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.descriptor.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(|f| &f.value)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Mark a field as fed (or no longer fed) by an upstream connection
    pub fn set_connected(&mut self, name: &str, connected: bool) -> bool {
        match self.fields.iter_mut().find(|f| f.descriptor.name == name) {
            Some(field) => {
                field.connected = connected;
                true
            }
            None => false,
        }
    }

    /// Apply a change. Unknown fields are ignored and reported as `false`.
    pub fn apply(&mut self, change: FieldChange) -> bool {
        let Some(index) = self.fields.iter().position(|f| f.descriptor.name == change.field) else {
            warn!("Change for unknown field '{}' ignored", change.field);
            return false;
        };

        if !change.payload.skip_history_snapshot {
            self.push_snapshot();
        }

        let field = &mut self.fields[index];
        field.value = change.payload.value;
        if let Some(load_from_db) = change.payload.load_from_db {
            field.load_from_db = load_from_db;
        }
        if let Some(file_path) = change.payload.file_path {
            field.file_path = Some(file_path);
        }
        self.revision += 1;
        true
    }

    /// Restore the state before the last checkpointed change
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        for (field, saved) in self.fields.iter_mut().zip(snapshot) {
            field.value = saved.value;
            field.file_path = saved.file_path;
            field.load_from_db = saved.load_from_db;
        }
        self.revision += 1;
        info!("Undo on '{}' ({} checkpoints left)", self.title, self.history.len());
        true
    }

    fn push_snapshot(&mut self) {
        if self.history_depth == 0 {
            return;
        }
        let snapshot = self
            .fields
            .iter()
            .map(|f| Snapshot {
                value: f.value.clone(),
                file_path: f.file_path.clone(),
                load_from_db: f.load_from_db,
            })
            .collect();
        self.history.push(snapshot);
        if self.history.len() > self.history_depth {
            let overflow = self.history.len() - self.history_depth;
            self.history.drain(..overflow);
        }
    }

    /// Current values keyed by field name
    pub fn values_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.descriptor.name.clone(), f.value.to_json()))
            .collect();
        Value::Object(map)
    }

    pub fn from_template_file(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_template_json(&text)
    }

    /// Load a node template: `{"display_name", "template": {field: {...}},
    /// "field_order"}`. Keys starting with `_` and fields with `show: false`
    /// are skipped.
    pub fn from_template_json(json: &str) -> Result<Self, TemplateError> {
        let root: Value = serde_json::from_str(json)?;
        let node = root.get("node").unwrap_or(&root);
        let template = node
            .get("template")
            .and_then(Value::as_object)
            .ok_or(TemplateError::MissingTemplate)?;

        let title = node
            .get("display_name")
            .and_then(Value::as_str)
            .unwrap_or("Node")
            .to_string();

        let mut order: Vec<String> = node
            .get("field_order")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|name| template.contains_key(*name))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        for name in template.keys() {
            if !order.contains(name) {
                order.push(name.clone());
            }
        }

        let mut fields = Vec::new();
        for name in order {
            if name.starts_with('_') {
                continue;
            }
            let Some(raw) = template.get(&name).filter(|raw| raw.is_object()) else {
                continue;
            };
            if raw.get("show").and_then(Value::as_bool) == Some(false) {
                continue;
            }
            fields.push(parse_field(&name, raw)?);
        }

        info!("Loaded template '{}' with {} fields", title, fields.len());
        Ok(Self::new(title, fields))
    }
}

fn parse_field(name: &str, raw: &Value) -> Result<FormField, TemplateError> {
    let mut descriptor = FieldDescriptor::deserialize(raw).map_err(|source| TemplateError::Field {
        name: name.to_string(),
        source,
    })?;
    if descriptor.name.is_empty() {
        descriptor.name = name.to_string();
    }

    let value = raw.get("value").cloned().map(FieldValue::from).unwrap_or_default();
    let mut field = FormField::new(descriptor, value);
    field.file_path = raw
        .get("file_path")
        .filter(|path| !path.is_null())
        .cloned()
        .map(FieldValue::from);
    Ok(field)
}

impl FormSink for NodeForm {
    fn apply_change(&mut self, change: FieldChange) {
        self.apply(change);
    }
}
