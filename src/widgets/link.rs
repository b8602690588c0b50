//! Read-only hyperlink

use super::{FieldWidget, WidgetEnv, WidgetKind};
use crate::fields::{FieldDescriptor, FieldValue, UpdatePayload};

#[derive(Debug, Clone)]
pub struct LinkWidget {
    label: Option<String>,
    url: String,
}

impl LinkWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        Self {
            label: descriptor.text.clone(),
            url: value.text_or_empty(),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.url)
    }
}

impl FieldWidget for LinkWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Link
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        if self.url.is_empty() || env.disabled {
            ui.weak(self.label());
        } else {
            ui.hyperlink_to(self.label(), &self.url);
        }
        None
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.url = empty.text_or_empty();
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(self.url.clone())
    }
}
