//! Ordered list of strings
//!
//! Always holds at least one entry so the add button stays reachable.
//! Every edit builds a new vector and swaps it in; the previous vector may
//! still be referenced by an undo snapshot.

use super::{FieldWidget, WidgetEnv, WidgetKind};
use crate::fields::{FieldDescriptor, FieldValue, UpdatePayload};

#[derive(Debug, Clone)]
pub struct StrListWidget {
    placeholder: String,
    entries: Vec<String>,
}

impl StrListWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        Self {
            placeholder: descriptor.placeholder.clone(),
            entries: non_empty(value.to_string_list()),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn add(&mut self) -> UpdatePayload {
        let mut next = self.entries.clone();
        next.push(String::new());
        self.replace(next)
    }

    /// Remove the entry at `index`; out-of-range indices are ignored
    pub fn remove(&mut self, index: usize) -> Option<UpdatePayload> {
        if index >= self.entries.len() {
            return None;
        }
        let mut next = self.entries.clone();
        next.remove(index);
        Some(self.replace(non_empty(next)))
    }

    pub fn set(&mut self, index: usize, text: impl Into<String>) -> Option<UpdatePayload> {
        if index >= self.entries.len() {
            return None;
        }
        let mut next = self.entries.clone();
        next[index] = text.into();
        Some(self.replace(next))
    }

    fn replace(&mut self, next: Vec<String>) -> UpdatePayload {
        self.entries = next;
        UpdatePayload::new(FieldValue::List(self.entries.clone()))
    }
}

fn non_empty(mut entries: Vec<String>) -> Vec<String> {
    if entries.is_empty() {
        entries.push(String::new());
    }
    entries
}

enum ListEdit {
    Set(usize, String),
    Remove(usize),
    Add,
}

impl FieldWidget for StrListWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::StrList
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let mut edit = None;
        let single = self.entries.len() == 1;

        ui.add_enabled_ui(!env.disabled, |ui| {
            for (index, entry) in self.entries.iter().enumerate() {
                ui.push_id(index, |ui| {
                    ui.horizontal(|ui| {
                        let mut buffer = entry.clone();
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut buffer).hint_text(self.placeholder.as_str()),
                        );
                        if response.changed() {
                            edit = Some(ListEdit::Set(index, buffer));
                        }
                        if !single && ui.small_button("➖").on_hover_text("Remove").clicked() {
                            edit = Some(ListEdit::Remove(index));
                        }
                    });
                });
            }
            if ui.small_button("➕ Add").clicked() {
                edit = Some(ListEdit::Add);
            }
        });

        match edit? {
            ListEdit::Set(index, text) => self.set(index, text),
            ListEdit::Remove(index) => self.remove(index),
            ListEdit::Add => Some(self.add()),
        }
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.entries = non_empty(empty.to_string_list());
    }

    fn value(&self) -> FieldValue {
        FieldValue::List(self.entries.clone())
    }
}
