//! Dictionary editors: key/value rows, the list-of-pairs variant, and a raw
//! JSON mode for nested dictionaries

use log::warn;
use serde_json::{Map, Value};

use super::{show_error, FieldWidget, WidgetEnv, WidgetKind};
use crate::error::FieldError;
use crate::fields::value::value_to_text;
use crate::fields::{FieldDescriptor, FieldValue, TypeTag, UpdatePayload};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// Record the row belongs to; always 0 outside the list variant
    pub record: usize,
    /// Loaded value, emitted as-is until the row's value text is edited
    stored: Option<Value>,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    fn loaded(key: &str, value: &Value, record: usize) -> Self {
        Self {
            key: key.to_string(),
            value: value_to_text(value),
            record,
            stored: Some(value.clone()),
        }
    }
}

/// Rows are kept in edit order. Emission is suppressed while two rows of the
/// same record share a key.
#[derive(Debug, Clone)]
pub struct DictWidget {
    list: bool,
    nested: bool,
    entries: Vec<Entry>,
    raw: Option<String>,
    error: Option<FieldError>,
}

impl DictWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        let nested = descriptor.type_tag == TypeTag::NestedDict;
        Self {
            list: descriptor.list,
            nested,
            entries: entries_from(value),
            raw: None,
            error: None,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw.is_some()
    }

    /// Append an empty row; in the list variant it starts a new record
    pub fn add(&mut self) -> Option<UpdatePayload> {
        let mut next = self.entries.clone();
        let record = match (self.list, next.last()) {
            (true, Some(last)) => last.record + 1,
            _ => 0,
        };
        next.push(Entry {
            record,
            ..Default::default()
        });
        self.replace(next)
    }

    pub fn remove(&mut self, index: usize) -> Option<UpdatePayload> {
        if index >= self.entries.len() {
            return None;
        }
        let mut next = self.entries.clone();
        next.remove(index);
        self.replace(non_empty(next))
    }

    pub fn set_key(&mut self, index: usize, key: impl Into<String>) -> Option<UpdatePayload> {
        let mut next = self.entries.clone();
        next.get_mut(index)?.key = key.into();
        self.replace(next)
    }

    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> Option<UpdatePayload> {
        let mut next = self.entries.clone();
        let entry = next.get_mut(index)?;
        entry.value = value.into();
        entry.stored = None;
        self.replace(next)
    }

    /// Switch to editing the whole value as JSON text
    pub fn open_raw(&mut self) {
        let json = self.build_value().to_json();
        self.raw = Some(serde_json::to_string_pretty(&json).unwrap_or_default());
    }

    pub fn set_raw(&mut self, text: impl Into<String>) {
        self.raw = Some(text.into());
    }

    /// Parse the raw JSON text and replace all rows with it
    pub fn commit_raw(&mut self) -> Result<Option<UpdatePayload>, FieldError> {
        let Some(text) = self.raw.clone() else {
            return Ok(None);
        };
        let parsed: Value = serde_json::from_str(&text).map_err(|e| {
            let error = FieldError::InvalidJson(e.to_string());
            self.error = Some(error.clone());
            error
        })?;
        let shape_ok = if self.list {
            parsed.as_array().is_some_and(|items| items.iter().all(Value::is_object))
        } else {
            parsed.is_object()
        };
        if !shape_ok {
            let expected = if self.list { "an array of objects" } else { "an object" };
            let error = FieldError::InvalidJson(format!("expected {}", expected));
            self.error = Some(error.clone());
            return Err(error);
        }

        self.raw = None;
        Ok(self.replace(non_empty(entries_from(&FieldValue::from(parsed)))))
    }

    pub fn cancel_raw(&mut self) {
        self.raw = None;
        self.error = None;
    }

    fn replace(&mut self, next: Vec<Entry>) -> Option<UpdatePayload> {
        self.entries = next;
        if let Some(key) = first_duplicate(&self.entries) {
            warn!("Duplicate dictionary key '{}'", key);
            self.error = Some(FieldError::DuplicateKey { key });
            return None;
        }
        self.error = None;
        Some(UpdatePayload::new(self.build_value()))
    }

    fn cell(&self, entry: &Entry) -> Value {
        if let Some(stored) = &entry.stored {
            return stored.clone();
        }
        if self.nested {
            serde_json::from_str(&entry.value).unwrap_or_else(|_| Value::String(entry.value.clone()))
        } else {
            Value::String(entry.value.clone())
        }
    }

    fn build_value(&self) -> FieldValue {
        if self.list {
            let mut records: Vec<Map<String, Value>> = Vec::new();
            let mut current = None;
            for entry in &self.entries {
                if current != Some(entry.record) {
                    records.push(Map::new());
                    current = Some(entry.record);
                }
                if let Some(record) = records.last_mut() {
                    if !entry.key.is_empty() {
                        record.insert(entry.key.clone(), self.cell(entry));
                    }
                }
            }
            FieldValue::Records(records)
        } else {
            let map = self
                .entries
                .iter()
                .filter(|entry| !entry.key.is_empty())
                .map(|entry| (entry.key.clone(), self.cell(entry)))
                .collect();
            FieldValue::Map(map)
        }
    }

    fn show_raw(&mut self, ui: &mut egui::Ui) -> Option<UpdatePayload> {
        let mut change = None;
        let mut text = self.raw.clone().unwrap_or_default();
        if ui
            .add(egui::TextEdit::multiline(&mut text).code_editor().desired_width(f32::INFINITY))
            .changed()
        {
            self.set_raw(text);
        }
        ui.horizontal(|ui| {
            if ui.button("Apply").clicked() {
                change = self.commit_raw().ok().flatten();
            }
            if ui.button("Cancel").clicked() {
                self.cancel_raw();
            }
        });
        change
    }
}

fn entries_from(value: &FieldValue) -> Vec<Entry> {
    let pairs: Vec<Entry> = match value {
        FieldValue::Map(map) => map.iter().map(|(k, v)| Entry::loaded(k, v, 0)).collect(),
        FieldValue::Records(_) | FieldValue::Json(_) => value
            .to_records()
            .iter()
            .enumerate()
            .flat_map(|(index, record)| {
                if record.is_empty() {
                    vec![Entry {
                        record: index,
                        ..Default::default()
                    }]
                } else {
                    record.iter().map(|(k, v)| Entry::loaded(k, v, index)).collect()
                }
            })
            .collect(),
        _ => Vec::new(),
    };
    non_empty(pairs)
}

fn non_empty(mut entries: Vec<Entry>) -> Vec<Entry> {
    if entries.is_empty() {
        entries.push(Entry::default());
    }
    entries
}

fn first_duplicate(entries: &[Entry]) -> Option<String> {
    entries.iter().enumerate().find_map(|(i, entry)| {
        let clash = !entry.key.is_empty()
            && entries[..i]
                .iter()
                .any(|prev| prev.record == entry.record && prev.key == entry.key);
        clash.then(|| entry.key.clone())
    })
}

enum DictEdit {
    Key(usize, String),
    Value(usize, String),
    Remove(usize),
    Add,
}

impl FieldWidget for DictWidget {
    fn kind(&self) -> WidgetKind {
        if self.list {
            WidgetKind::KeyValueList
        } else {
            WidgetKind::Dict
        }
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let mut change = None;

        ui.add_enabled_ui(!env.disabled, |ui| {
            if self.raw.is_some() {
                change = self.show_raw(ui);
                return;
            }

            let mut edit = None;
            let single = self.entries.len() == 1;
            for (index, entry) in self.entries.iter().enumerate() {
                if self.list && index > 0 && self.entries[index - 1].record != entry.record {
                    ui.separator();
                }
                ui.push_id(index, |ui| {
                    ui.horizontal(|ui| {
                        let mut key = entry.key.clone();
                        if ui
                            .add(egui::TextEdit::singleline(&mut key).hint_text("key").desired_width(110.0))
                            .changed()
                        {
                            edit = Some(DictEdit::Key(index, key));
                        }
                        let mut value = entry.value.clone();
                        if ui
                            .add(egui::TextEdit::singleline(&mut value).hint_text("value"))
                            .changed()
                        {
                            edit = Some(DictEdit::Value(index, value));
                        }
                        if !single && ui.small_button("➖").clicked() {
                            edit = Some(DictEdit::Remove(index));
                        }
                    });
                });
            }

            ui.horizontal(|ui| {
                if ui.small_button("➕ Add").clicked() {
                    edit = Some(DictEdit::Add);
                }
                if self.nested && ui.small_button("{ } JSON").clicked() {
                    self.open_raw();
                }
            });

            change = match edit {
                Some(DictEdit::Key(index, key)) => self.set_key(index, key),
                Some(DictEdit::Value(index, value)) => self.set_value(index, value),
                Some(DictEdit::Remove(index)) => self.remove(index),
                Some(DictEdit::Add) => self.add(),
                None => None,
            };
        });

        if let Some(error) = &self.error {
            show_error(ui, error);
        }
        change
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.entries = entries_from(empty);
        self.raw = None;
        self.error = None;
    }

    fn value(&self) -> FieldValue {
        self.build_value()
    }

    fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dict(value: FieldValue) -> DictWidget {
        DictWidget::new(&FieldDescriptor::new("headers", TypeTag::Dict), &value)
    }

    #[test]
    fn test_edit_rows_into_map() {
        let mut w = dict(FieldValue::Null);
        assert_eq!(w.entries().len(), 1);

        w.set_key(0, "Authorization");
        let payload = w.set_value(0, "Bearer x").unwrap();
        assert_eq!(payload.value, FieldValue::from(json!({"Authorization": "Bearer x"})));
    }

    #[test]
    fn test_duplicate_keys_block_emission() {
        let mut w = dict(FieldValue::from(json!({"a": "1"})));
        w.add();
        assert!(w.set_key(1, "a").is_none());
        assert_eq!(w.error(), Some(&FieldError::DuplicateKey { key: "a".into() }));

        let payload = w.set_key(1, "b").unwrap();
        assert_eq!(payload.value, FieldValue::from(json!({"a": "1", "b": ""})));
        assert!(w.error().is_none());
    }

    #[test]
    fn test_list_variant_emits_pairs() {
        let descriptor = FieldDescriptor::new("pairs", TypeTag::Dict).with_list(true);
        let mut w = DictWidget::new(&descriptor, &FieldValue::from(json!([{"x": "1"}])));
        assert_eq!(w.kind(), WidgetKind::KeyValueList);

        let payload = w.add().unwrap();
        assert_eq!(payload.value, FieldValue::from(json!([{"x": "1"}, {}])));
    }

    #[test]
    fn test_nested_values_parse_as_json() {
        let descriptor = FieldDescriptor::new("body", TypeTag::NestedDict);
        let mut w = DictWidget::new(&descriptor, &FieldValue::Null);
        w.set_key(0, "limits");
        let payload = w.set_value(0, r#"{"max": 3}"#).unwrap();
        assert_eq!(payload.value, FieldValue::from(json!({"limits": {"max": 3}})));
    }

    #[test]
    fn test_raw_mode_round_trip() {
        let descriptor = FieldDescriptor::new("body", TypeTag::NestedDict);
        let mut w = DictWidget::new(&descriptor, &FieldValue::from(json!({"a": 1})));
        w.open_raw();
        assert!(w.is_raw_mode());

        w.set_raw("{not json");
        assert!(matches!(w.commit_raw(), Err(FieldError::InvalidJson(_))));
        assert!(w.is_raw_mode());

        w.set_raw(r#"{"a": 2, "b": [1, 2]}"#);
        let payload = w.commit_raw().unwrap().unwrap();
        assert_eq!(payload.value, FieldValue::from(json!({"a": 2, "b": [1, 2]})));
        assert!(!w.is_raw_mode());
    }

    #[test]
    fn test_untouched_values_keep_their_type() {
        let mut w = dict(FieldValue::from(json!({"n": 3, "flag": true, "name": "x"})));
        let payload = w.add().unwrap();
        assert_eq!(payload.value, FieldValue::from(json!({"n": 3, "flag": true, "name": "x"})));

        let payload = w.set_value(0, "4").unwrap();
        assert_eq!(payload.value, FieldValue::from(json!({"n": "4", "flag": true, "name": "x"})));

        let payload = w.set_key(1, "enabled").unwrap();
        assert_eq!(payload.value, FieldValue::from(json!({"n": "4", "enabled": true, "name": "x"})));
    }

    #[test]
    fn test_list_variant_keeps_multi_key_records() {
        let descriptor = FieldDescriptor::new("pairs", TypeTag::Dict).with_list(true);
        let mut w = DictWidget::new(&descriptor, &FieldValue::from(json!([{"a": "1", "b": 2}, {"a": "3"}])));
        assert_eq!(w.entries().len(), 3);

        let payload = w.add().unwrap();
        assert_eq!(
            payload.value,
            FieldValue::from(json!([{"a": "1", "b": 2}, {"a": "3"}, {}]))
        );

        let payload = w.remove(1).unwrap();
        assert_eq!(payload.value, FieldValue::from(json!([{"a": "1"}, {"a": "3"}, {}])));
    }

    #[test]
    fn test_same_key_in_different_records_is_allowed() {
        let descriptor = FieldDescriptor::new("pairs", TypeTag::Dict).with_list(true);
        let mut w = DictWidget::new(&descriptor, &FieldValue::from(json!([{"a": "1"}])));
        w.add();
        let payload = w.set_key(1, "a").unwrap();
        assert_eq!(payload.value, FieldValue::from(json!([{"a": "1"}, {"a": ""}])));
        assert!(w.error().is_none());
    }

    #[test]
    fn test_remove_keeps_one_row() {
        let mut w = dict(FieldValue::from(json!({"a": "1"})));
        let payload = w.remove(0).unwrap();
        assert_eq!(payload.value, FieldValue::Map(Map::new()));
        assert_eq!(w.entries().len(), 1);
    }
}
