//! Single choice dropdown and multi choice select
//!
//! With `combobox` set the options are suggestions and a free-text entry
//! accepts values outside them.

use super::{FieldWidget, WidgetEnv, WidgetKind};
use crate::fields::{FieldDescriptor, FieldValue, UpdatePayload};

#[derive(Debug, Clone)]
pub struct DropdownWidget {
    name: String,
    options: Vec<String>,
    combobox: bool,
    selected: String,
    custom: String,
}

impl DropdownWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        Self {
            name: descriptor.name.clone(),
            options: descriptor.options.clone().unwrap_or_default(),
            combobox: descriptor.combobox,
            selected: value.text_or_empty(),
            custom: String::new(),
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Pick one of the declared options, or any non-empty value in combobox
    /// mode. Anything else is ignored.
    pub fn select(&mut self, option: &str) -> Option<UpdatePayload> {
        let option = option.trim();
        let known = self.options.iter().any(|candidate| candidate == option);
        if !known && !(self.combobox && !option.is_empty()) {
            return None;
        }
        self.selected = option.to_string();
        Some(UpdatePayload::new(self.selected.clone()))
    }
}

impl FieldWidget for DropdownWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Dropdown
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let mut picked = None;
        let selected_text = if self.selected.is_empty() {
            "Choose an option...".to_string()
        } else {
            self.selected.clone()
        };
        let custom_selected =
            !self.selected.is_empty() && !self.options.iter().any(|option| *option == self.selected);

        ui.add_enabled_ui(!env.disabled, |ui| {
            egui::ComboBox::from_id_salt(("dropdown", self.name.as_str()))
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for option in &self.options {
                        if ui.selectable_label(*option == self.selected, option.as_str()).clicked() {
                            picked = Some(option.clone());
                        }
                    }
                    if custom_selected {
                        ui.separator();
                        let _ = ui.selectable_label(true, self.selected.as_str());
                    }
                });

            if self.combobox {
                if let Some(custom) = custom_entry(ui, &mut self.custom, "Use") {
                    picked = Some(custom);
                }
            }
        });

        picked.and_then(|option| self.select(&option))
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.selected = empty.text_or_empty();
        self.custom.clear();
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(self.selected.clone())
    }
}

/// Selections are kept in option order regardless of click order. Custom
/// values (combobox mode) follow the options in the order they were added.
#[derive(Debug, Clone)]
pub struct MultiselectWidget {
    name: String,
    options: Vec<String>,
    combobox: bool,
    selected: Vec<String>,
    custom: String,
}

impl MultiselectWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        let options = descriptor.options.clone().unwrap_or_default();
        let mut widget = Self {
            name: descriptor.name.clone(),
            options,
            combobox: descriptor.combobox,
            selected: Vec::new(),
            custom: String::new(),
        };
        widget.selected = widget.ordered(value.to_string_list());
        widget
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn toggle(&mut self, option: &str) -> Option<UpdatePayload> {
        let option = option.trim();
        let known = self.options.iter().any(|candidate| candidate == option);
        if !known && !(self.combobox && !option.is_empty()) {
            return None;
        }
        let mut next: Vec<String> = self.selected.clone();
        if let Some(position) = next.iter().position(|s| s == option) {
            next.remove(position);
        } else {
            next.push(option.to_string());
        }
        self.selected = self.ordered(next);
        Some(UpdatePayload::new(FieldValue::List(self.selected.clone())))
    }

    /// Sort by declaration order; unknown entries are dropped unless custom
    /// values are allowed
    fn ordered(&self, chosen: Vec<String>) -> Vec<String> {
        let mut ordered: Vec<String> = self
            .options
            .iter()
            .filter(|option| chosen.contains(option))
            .cloned()
            .collect();
        if self.combobox {
            for value in chosen {
                if !value.is_empty() && !ordered.contains(&value) {
                    ordered.push(value);
                }
            }
        }
        ordered
    }

    fn summary(&self) -> String {
        match self.selected.len() {
            0 => "None selected".to_string(),
            1..=2 => self.selected.join(", "),
            n => format!("{} selected", n),
        }
    }
}

impl FieldWidget for MultiselectWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Multiselect
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let mut toggled = None;
        let summary = self.summary();
        let custom_values: Vec<String> = self
            .selected
            .iter()
            .filter(|value| !self.options.contains(value))
            .cloned()
            .collect();

        ui.add_enabled_ui(!env.disabled, |ui| {
            egui::ComboBox::from_id_salt(("multiselect", self.name.as_str()))
                .selected_text(summary)
                .show_ui(ui, |ui| {
                    for option in self.options.iter().chain(custom_values.iter()) {
                        let mut checked = self.selected.contains(option);
                        if ui.checkbox(&mut checked, option.as_str()).changed() {
                            toggled = Some(option.clone());
                        }
                    }
                });

            if self.combobox {
                if let Some(custom) = custom_entry(ui, &mut self.custom, "Add") {
                    if !self.selected.contains(&custom) {
                        toggled = Some(custom);
                    }
                }
            }
        });

        toggled.and_then(|option| self.toggle(&option))
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.selected = self.ordered(empty.to_string_list());
        self.custom.clear();
    }

    fn value(&self) -> FieldValue {
        FieldValue::List(self.selected.clone())
    }
}

/// Free-text row under a combobox; yields the trimmed text on Enter or click
fn custom_entry(ui: &mut egui::Ui, buffer: &mut String, action: &str) -> Option<String> {
    let mut submitted = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(buffer)
                .hint_text("Custom value")
                .desired_width(140.0),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui
            .add_enabled(!buffer.trim().is_empty(), egui::Button::new(action).small())
            .clicked();
        submitted = entered || clicked;
    });
    if !submitted {
        return None;
    }
    let value = buffer.trim().to_string();
    buffer.clear();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::TypeTag;

    fn descriptor() -> FieldDescriptor {
        FieldDescriptor::new("model", TypeTag::Str).with_options(["a", "b", "c"])
    }

    #[test]
    fn test_dropdown_rejects_unknown_option() {
        let mut w = DropdownWidget::new(&descriptor(), &FieldValue::text("a"));
        assert!(w.select("z").is_none());
        assert_eq!(w.select("b").unwrap().value, FieldValue::text("b"));
        assert_eq!(w.selected(), "b");
    }

    #[test]
    fn test_multiselect_keeps_option_order() {
        let mut w = MultiselectWidget::new(&descriptor().with_list(true), &FieldValue::Null);
        w.toggle("c");
        let payload = w.toggle("a").unwrap();
        assert_eq!(payload.value, FieldValue::List(vec!["a".into(), "c".into()]));

        let payload = w.toggle("c").unwrap();
        assert_eq!(payload.value, FieldValue::List(vec!["a".into()]));
    }

    #[test]
    fn test_multiselect_ignores_stale_values() {
        let w = MultiselectWidget::new(
            &descriptor().with_list(true),
            &FieldValue::List(vec!["gone".into(), "b".into()]),
        );
        assert_eq!(w.selected(), &["b".to_string()]);
    }

    #[test]
    fn test_combobox_dropdown_accepts_free_text() {
        let mut w = DropdownWidget::new(&descriptor().with_combobox(true), &FieldValue::text("a"));
        assert_eq!(w.select(" gpt-x ").unwrap().value, FieldValue::text("gpt-x"));
        assert_eq!(w.value(), FieldValue::text("gpt-x"));
        assert!(w.select("  ").is_none());
        assert_eq!(w.select("b").unwrap().value, FieldValue::text("b"));

        // A saved custom value survives reloading
        let w = DropdownWidget::new(&descriptor().with_combobox(true), &FieldValue::text("mine"));
        assert_eq!(w.selected(), "mine");
    }

    #[test]
    fn test_combobox_multiselect_keeps_custom_values() {
        let descriptor = descriptor().with_list(true).with_combobox(true);
        let mut w = MultiselectWidget::new(&descriptor, &FieldValue::List(vec!["x".into(), "b".into()]));
        assert_eq!(w.selected(), &["b".to_string(), "x".to_string()]);

        w.toggle("y");
        let payload = w.toggle("a").unwrap();
        assert_eq!(
            payload.value,
            FieldValue::List(vec!["a".into(), "b".into(), "x".into(), "y".into()])
        );

        let payload = w.toggle("x").unwrap();
        assert_eq!(payload.value, FieldValue::List(vec!["a".into(), "b".into(), "y".into()]));
        assert!(w.toggle("").is_none());
    }
}
