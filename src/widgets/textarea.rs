//! Multi-line text input

use super::{FieldWidget, WidgetEnv, WidgetKind};
use crate::constants::widget::TEXT_AREA_ROWS;
use crate::fields::{FieldDescriptor, FieldValue, UpdatePayload};

#[derive(Debug, Clone)]
pub struct TextAreaWidget {
    placeholder: String,
    text: String,
}

impl TextAreaWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        Self {
            placeholder: descriptor.placeholder.clone(),
            text: value.text_or_empty(),
        }
    }

    pub fn edit(&mut self, text: impl Into<String>) -> UpdatePayload {
        self.text = text.into();
        UpdatePayload::new(self.text.clone())
    }
}

impl FieldWidget for TextAreaWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TextArea
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        let mut buffer = self.text.clone();
        let response = ui.add_enabled(
            !env.disabled,
            egui::TextEdit::multiline(&mut buffer)
                .desired_rows(TEXT_AREA_ROWS)
                .desired_width(f32::INFINITY)
                .hint_text(self.placeholder.as_str()),
        );
        if response.changed() {
            Some(self.edit(buffer))
        } else {
            None
        }
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.text = empty.text_or_empty();
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(self.text.clone())
    }
}
