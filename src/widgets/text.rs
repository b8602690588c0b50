//! Single-line text input with password masking and global variable binding

use log::{debug, warn};

use super::{FieldWidget, WidgetEnv, WidgetKind};
use crate::error::GlobalVariableError;
use crate::fields::{FieldDescriptor, FieldValue, UpdatePayload};
use crate::globals::GlobalVariables;

#[derive(Debug, Clone)]
pub struct SingleLineWidget {
    name: String,
    placeholder: String,
    password: bool,
    text: String,
    /// `text` holds a global variable name rather than a literal
    bound_to_global: bool,
    reveal: bool,
}

impl SingleLineWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        let text = value.text_or_empty();
        Self {
            name: descriptor.name.clone(),
            placeholder: descriptor.placeholder.clone(),
            password: descriptor.password,
            bound_to_global: descriptor.load_from_db && !text.is_empty(),
            text,
            reveal: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bound_to_global(&self) -> bool {
        self.bound_to_global
    }

    pub fn is_masked(&self) -> bool {
        self.password && !self.reveal
    }

    /// Typing always produces a literal value
    pub fn edit(&mut self, text: impl Into<String>) -> UpdatePayload {
        self.text = text.into();
        self.bound_to_global = false;
        UpdatePayload::new(self.text.clone()).with_load_from_db(false)
    }

    pub fn select_global(&mut self, name: &str) -> UpdatePayload {
        debug!("Field '{}' bound to global variable '{}'", self.name, name);
        self.text = name.to_string();
        self.bound_to_global = true;
        UpdatePayload::new(self.text.clone()).with_load_from_db(true)
    }

    pub fn unbind_global(&mut self) -> UpdatePayload {
        self.edit(String::new())
    }

    /// Delete a variable from the store. Clears the field when it was bound
    /// to the deleted variable.
    pub fn delete_global(
        &mut self,
        globals: &mut dyn GlobalVariables,
        name: &str,
    ) -> Result<Option<UpdatePayload>, GlobalVariableError> {
        globals.delete(name)?;
        if self.bound_to_global && self.text == name {
            Ok(Some(self.unbind_global()))
        } else {
            Ok(None)
        }
    }

    /// Local only; the value does not change
    pub fn toggle_reveal(&mut self) {
        self.reveal = !self.reveal;
    }

    fn show_globals_menu(
        &mut self,
        ui: &mut egui::Ui,
        globals: &mut dyn GlobalVariables,
    ) -> Option<UpdatePayload> {
        let mut change = None;
        let mut delete_request = None;

        ui.menu_button("🌐", |ui| {
            let names = globals.names();
            if names.is_empty() {
                ui.label("No global variables");
            }
            for name in names {
                ui.horizontal(|ui| {
                    if ui.selectable_label(self.bound_to_global && self.text == name, name.as_str()).clicked() {
                        change = Some(self.select_global(&name));
                        ui.close_menu();
                    }
                    if ui.small_button("🗑").on_hover_text("Delete variable").clicked() {
                        delete_request = Some(name.clone());
                    }
                });
            }
        });

        if let Some(name) = delete_request {
            match self.delete_global(globals, &name) {
                Ok(cleared) => change = cleared.or(change),
                Err(e) => warn!("Failed to delete global variable '{}': {}", name, e),
            }
        }
        change
    }
}

impl FieldWidget for SingleLineWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::SingleLine
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let mut change = None;
        let enabled = !env.disabled;

        ui.horizontal(|ui| {
            ui.add_enabled_ui(enabled, |ui| {
                if self.bound_to_global {
                    ui.label(egui::RichText::new(format!("🌐 {}", self.text)).strong());
                    if ui.small_button("✖").on_hover_text("Unbind variable").clicked() {
                        change = Some(self.unbind_global());
                    }
                } else {
                    let mut buffer = self.text.clone();
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut buffer)
                            .password(self.is_masked())
                            .hint_text(self.placeholder.as_str()),
                    );
                    if response.changed() {
                        change = Some(self.edit(buffer));
                    }
                    if self.password {
                        let icon = if self.reveal { "🙈" } else { "👁" };
                        if ui.small_button(icon).clicked() {
                            self.toggle_reveal();
                        }
                    }
                }

                if let Some(globals) = env.globals.as_deref_mut() {
                    if let Some(global_change) = self.show_globals_menu(ui, globals) {
                        change = Some(global_change);
                    }
                }
            });
        });
        change
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.text = empty.text_or_empty();
        self.bound_to_global = false;
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(self.text.clone())
    }
}
