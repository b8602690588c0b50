//! Boolean toggle

use super::{FieldWidget, WidgetEnv, WidgetKind};
use crate::fields::{FieldValue, UpdatePayload};

#[derive(Debug, Clone)]
pub struct ToggleWidget {
    on: bool,
}

impl ToggleWidget {
    pub fn new(value: &FieldValue) -> Self {
        Self {
            on: value.as_bool().unwrap_or(false),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn toggle(&mut self) -> UpdatePayload {
        self.on = !self.on;
        UpdatePayload::new(self.on)
    }
}

impl FieldWidget for ToggleWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Toggle
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let mut on = self.on;
        let response = ui.add_enabled(!env.disabled, egui::Checkbox::without_text(&mut on));
        if response.changed() && on != self.on {
            Some(self.toggle())
        } else {
            None
        }
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.on = empty.as_bool().unwrap_or(false);
    }

    fn value(&self) -> FieldValue {
        FieldValue::Bool(self.on)
    }
}
