//! Change adapter
//!
//! Funnels every widget edit into one `FieldChange` handed to the owning
//! form, and owns the rule that disabling a field clears it: on each
//! enabled -> disabled transition the widget is reset to the field's empty
//! form and exactly one change, carrying what the widget then holds, is sent
//! with `skip_history_snapshot` set.

use log::{debug, warn};

use crate::fields::{FieldChange, FieldDescriptor, FieldValue, UpdatePayload};
use crate::widgets::FieldWidget;

/// Receiver of field changes (the owning form)
pub trait FormSink {
    fn apply_change(&mut self, change: FieldChange);
}

impl FormSink for Vec<FieldChange> {
    fn apply_change(&mut self, change: FieldChange) {
        self.push(change);
    }
}

#[derive(Debug, Clone)]
pub struct ChangeAdapter {
    field: String,
    empty: FieldValue,
    was_disabled: bool,
}

impl ChangeAdapter {
    pub fn new(descriptor: &FieldDescriptor) -> Self {
        Self {
            field: descriptor.name.clone(),
            empty: descriptor.empty_value(),
            was_disabled: false,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn forward(&self, payload: UpdatePayload, sink: &mut dyn FormSink) {
        sink.apply_change(FieldChange::new(self.field.clone(), payload));
    }

    /// Feed the current disabled state. Returns true when this call reset
    /// the widget and emitted the clearing change.
    ///
    /// A field that is disabled the first time it is observed counts as a
    /// transition.
    pub fn observe(&mut self, disabled: bool, widget: &mut dyn FieldWidget, sink: &mut dyn FormSink) -> bool {
        let transition = disabled && !self.was_disabled;
        self.was_disabled = disabled;
        if !transition {
            return false;
        }

        debug!("Field '{}' disabled, clearing value", self.field);
        widget.reset(&self.empty);
        let value = widget.value();
        if value != self.empty {
            warn!("Field '{}' reset to {:?} instead of {:?}", self.field, value, self.empty);
        }
        let mut payload = UpdatePayload::new(value).without_snapshot();
        if let Some(file_path) = widget.file_path() {
            payload = payload.with_file_path(file_path);
        }
        self.forward(payload, sink);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::TypeTag;
    use crate::widgets::{StrListWidget, ToggleWidget};

    #[test]
    fn test_disable_emits_once() {
        let descriptor = FieldDescriptor::new("flag", TypeTag::Bool);
        let mut widget = ToggleWidget::new(&FieldValue::Bool(true));
        let mut adapter = ChangeAdapter::new(&descriptor);
        let mut changes: Vec<FieldChange> = Vec::new();

        assert!(!adapter.observe(false, &mut widget, &mut changes));
        assert!(adapter.observe(true, &mut widget, &mut changes));
        assert!(!adapter.observe(true, &mut widget, &mut changes));
        assert!(!adapter.observe(true, &mut widget, &mut changes));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "flag");
        assert_eq!(changes[0].payload.value, FieldValue::Bool(false));
        assert!(changes[0].payload.skip_history_snapshot);
        assert_eq!(widget.value(), FieldValue::Bool(false));
    }

    #[test]
    fn test_each_new_transition_emits_again() {
        let descriptor = FieldDescriptor::new("urls", TypeTag::Str).with_list(true);
        let mut widget = StrListWidget::new(&descriptor, &FieldValue::List(vec!["a".into(), "b".into()]));
        let mut adapter = ChangeAdapter::new(&descriptor);
        let mut changes: Vec<FieldChange> = Vec::new();

        adapter.observe(true, &mut widget, &mut changes);
        adapter.observe(false, &mut widget, &mut changes);
        adapter.observe(true, &mut widget, &mut changes);

        assert_eq!(changes.len(), 2);
        assert!(changes
            .iter()
            .all(|c| c.payload.value == FieldValue::List(vec![String::new()])));
    }
}
