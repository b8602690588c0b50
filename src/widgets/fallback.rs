//! Read-only rendering for `Any` and unrecognized types

use super::{FieldWidget, WidgetEnv, WidgetKind};
use crate::fields::{FieldValue, UpdatePayload};

#[derive(Debug, Clone)]
pub struct FallbackWidget {
    type_name: String,
    value: FieldValue,
}

impl FallbackWidget {
    pub fn new(type_name: impl Into<String>, value: &FieldValue) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.clone(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl FieldWidget for FallbackWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Fallback
    }

    fn show(&mut self, ui: &mut egui::Ui, _env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let text = self.value.display_string();
        if text.is_empty() {
            ui.weak(format!("<{}>", self.type_name));
        } else {
            ui.label(text).on_hover_text(format!("Type: {}", self.type_name));
        }
        None
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.value = empty.clone();
    }

    fn value(&self) -> FieldValue {
        self.value.clone()
    }
}
