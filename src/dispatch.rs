//! Parameter render dispatcher
//!
//! Maps a field descriptor to exactly one widget from the catalog. The
//! selection itself is a pure function of the descriptor; `render` wires the
//! chosen widget to a change adapter.

use log::debug;

use crate::adapter::{ChangeAdapter, FormSink};
use crate::fields::{FieldDescriptor, FieldValue, TypeTag};
use crate::widgets::{
    DictWidget, DropdownWidget, EditorMode, FallbackWidget, FieldWidget, FilePickerWidget, LinkWidget,
    MultiselectWidget, NumericWidget, SingleLineWidget, StrListWidget, TableWidget, TextAreaWidget,
    TextEditorWidget, ToggleWidget, WidgetEnv, WidgetKind,
};

/// Pick the widget for a descriptor. First matching rule wins.
pub fn select_widget(descriptor: &FieldDescriptor) -> WidgetKind {
    let has_options = descriptor.present_options().is_some();
    match &descriptor.type_tag {
        TypeTag::Str => {
            if has_options && descriptor.list {
                WidgetKind::Multiselect
            } else if descriptor.list {
                WidgetKind::StrList
            } else if has_options {
                WidgetKind::Dropdown
            } else if descriptor.multiline {
                WidgetKind::TextArea
            } else {
                WidgetKind::SingleLine
            }
        }
        TypeTag::Dict | TypeTag::NestedDict => {
            if descriptor.list {
                WidgetKind::KeyValueList
            } else {
                WidgetKind::Dict
            }
        }
        TypeTag::Bool => WidgetKind::Toggle,
        TypeTag::Int => WidgetKind::Integer,
        TypeTag::Float => WidgetKind::Float,
        TypeTag::File => WidgetKind::FilePicker,
        TypeTag::Prompt => WidgetKind::PromptEditor,
        TypeTag::Code => WidgetKind::CodeEditor,
        TypeTag::Table => WidgetKind::Table,
        TypeTag::Link => WidgetKind::Link,
        TypeTag::Any | TypeTag::Other(_) => WidgetKind::Fallback,
    }
}

/// Construct the selected widget seeded with `value`
pub fn build_widget(
    descriptor: &FieldDescriptor,
    value: &FieldValue,
    file_path: Option<&FieldValue>,
) -> Box<dyn FieldWidget> {
    match select_widget(descriptor) {
        WidgetKind::SingleLine => Box::new(SingleLineWidget::new(descriptor, value)),
        WidgetKind::TextArea => Box::new(TextAreaWidget::new(descriptor, value)),
        WidgetKind::StrList => Box::new(StrListWidget::new(descriptor, value)),
        WidgetKind::Dropdown => Box::new(DropdownWidget::new(descriptor, value)),
        WidgetKind::Multiselect => Box::new(MultiselectWidget::new(descriptor, value)),
        WidgetKind::Dict | WidgetKind::KeyValueList => Box::new(DictWidget::new(descriptor, value)),
        WidgetKind::Toggle => Box::new(ToggleWidget::new(value)),
        WidgetKind::Integer | WidgetKind::Float => Box::new(NumericWidget::new(descriptor, value)),
        WidgetKind::FilePicker => Box::new(FilePickerWidget::new(descriptor, value, file_path)),
        WidgetKind::PromptEditor => Box::new(TextEditorWidget::new(descriptor, value, EditorMode::Prompt)),
        WidgetKind::CodeEditor => Box::new(TextEditorWidget::new(descriptor, value, EditorMode::Code)),
        WidgetKind::Table => Box::new(TableWidget::new(descriptor, value)),
        WidgetKind::Link => Box::new(LinkWidget::new(descriptor, value)),
        WidgetKind::Fallback => Box::new(FallbackWidget::new(descriptor.type_tag.as_str(), value)),
    }
}

/// Build the editor for one field
pub fn render(descriptor: &FieldDescriptor, value: &FieldValue, disabled: bool) -> FieldEditor {
    FieldEditor::new(descriptor.clone(), value, None, disabled)
}

/// A widget bound to its field and change adapter
pub struct FieldEditor {
    descriptor: FieldDescriptor,
    widget: Box<dyn FieldWidget>,
    adapter: ChangeAdapter,
    disabled: bool,
}

impl FieldEditor {
    pub fn new(
        descriptor: FieldDescriptor,
        value: &FieldValue,
        file_path: Option<&FieldValue>,
        disabled: bool,
    ) -> Self {
        let widget = build_widget(&descriptor, value, file_path);
        debug!("Field '{}' ({}) -> {:?}", descriptor.name, descriptor.type_tag.as_str(), widget.kind());
        Self::with_widget(descriptor, widget, disabled)
    }

    /// Bind an already built widget to `descriptor`
    pub fn with_widget(descriptor: FieldDescriptor, widget: Box<dyn FieldWidget>, disabled: bool) -> Self {
        Self {
            adapter: ChangeAdapter::new(&descriptor),
            descriptor,
            widget,
            disabled,
        }
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn kind(&self) -> WidgetKind {
        self.widget.kind()
    }

    pub fn widget(&self) -> &dyn FieldWidget {
        self.widget.as_ref()
    }

    /// Widget still has background work in flight
    pub fn is_busy(&self) -> bool {
        self.widget.is_busy()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Apply the disabled rule without drawing
    pub fn sync(&mut self, sink: &mut dyn FormSink) -> bool {
        self.adapter.observe(self.disabled, self.widget.as_mut(), sink)
    }

    pub fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>, sink: &mut dyn FormSink) {
        self.sync(sink);
        env.disabled = self.disabled;
        if let Some(payload) = self.widget.show(ui, env) {
            self.adapter.forward(payload, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::RangeSpec;

    fn str_field() -> FieldDescriptor {
        FieldDescriptor::new("f", TypeTag::Str)
    }

    #[test]
    fn test_plain_str_is_single_line() {
        assert_eq!(select_widget(&str_field()), WidgetKind::SingleLine);
        assert_eq!(select_widget(&str_field().with_password(true)), WidgetKind::SingleLine);
    }

    #[test]
    fn test_str_precedence() {
        assert_eq!(select_widget(&str_field().with_options(["a", "b"]).with_list(true)), WidgetKind::Multiselect);
        assert_eq!(select_widget(&str_field().with_list(true)), WidgetKind::StrList);
        assert_eq!(select_widget(&str_field().with_list(true).with_multiline(true)), WidgetKind::StrList);
        assert_eq!(select_widget(&str_field().with_options(["a"])), WidgetKind::Dropdown);
        assert_eq!(select_widget(&str_field().with_options(["a"]).with_multiline(true)), WidgetKind::Dropdown);
        assert_eq!(select_widget(&str_field().with_multiline(true)), WidgetKind::TextArea);
    }

    #[test]
    fn test_empty_options_are_ignored() {
        let descriptor = str_field().with_options(Vec::<String>::new());
        assert_eq!(select_widget(&descriptor), WidgetKind::SingleLine);
    }

    #[test]
    fn test_other_types() {
        let kind = |tag: TypeTag| select_widget(&FieldDescriptor::new("f", tag));
        assert_eq!(kind(TypeTag::Dict), WidgetKind::Dict);
        assert_eq!(kind(TypeTag::NestedDict), WidgetKind::Dict);
        assert_eq!(
            select_widget(&FieldDescriptor::new("f", TypeTag::Dict).with_list(true)),
            WidgetKind::KeyValueList
        );
        assert_eq!(kind(TypeTag::Bool), WidgetKind::Toggle);
        assert_eq!(kind(TypeTag::Int), WidgetKind::Integer);
        assert_eq!(kind(TypeTag::Float), WidgetKind::Float);
        assert_eq!(kind(TypeTag::File), WidgetKind::FilePicker);
        assert_eq!(kind(TypeTag::Prompt), WidgetKind::PromptEditor);
        assert_eq!(kind(TypeTag::Code), WidgetKind::CodeEditor);
        assert_eq!(kind(TypeTag::Table), WidgetKind::Table);
        assert_eq!(kind(TypeTag::Link), WidgetKind::Link);
        assert_eq!(kind(TypeTag::Any), WidgetKind::Fallback);
        assert_eq!(kind(TypeTag::parse("Embeddings")), WidgetKind::Fallback);
    }

    #[test]
    fn test_built_widget_matches_selection() {
        let descriptors = [
            str_field(),
            str_field().with_list(true),
            FieldDescriptor::new("n", TypeTag::Float).with_range(RangeSpec::new(0.0, 1.0)),
            FieldDescriptor::new("t", TypeTag::Table),
            FieldDescriptor::new("x", TypeTag::parse("Tool")),
        ];
        for descriptor in descriptors {
            let editor = render(&descriptor, &FieldValue::Null, false);
            assert_eq!(editor.kind(), select_widget(&descriptor));
        }
    }

    #[test]
    fn test_rendered_disabled_field_clears_on_first_sync() {
        let descriptor = FieldDescriptor::new("n", TypeTag::Int);
        let mut editor = render(&descriptor, &FieldValue::Int(9), true);
        let mut changes = Vec::new();
        assert!(editor.sync(&mut changes));
        assert!(!editor.sync(&mut changes));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].payload.value, FieldValue::Int(0));
        assert_eq!(editor.widget().value(), FieldValue::Int(0));
    }
}
