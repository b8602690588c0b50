//! Widget catalog
//!
//! One editor per field shape. Every widget keeps its own local editing
//! state, draws itself into an `egui::Ui`, and reports edits as a single
//! `UpdatePayload`. Disabled handling lives in the change adapter, not here.

pub mod dict;
pub mod dropdown;
pub mod editor;
pub mod fallback;
pub mod file;
pub mod link;
pub mod numeric;
pub mod str_list;
pub mod table;
pub mod text;
pub mod textarea;
pub mod toggle;

use std::sync::Arc;

use egui::Color32;

use crate::error::FieldError;
use crate::fields::{FieldValue, UpdatePayload};
use crate::globals::GlobalVariables;
use crate::upload::FileUploader;

pub use dict::DictWidget;
pub use dropdown::{DropdownWidget, MultiselectWidget};
pub use editor::{EditorMode, TextEditorWidget};
pub use fallback::FallbackWidget;
pub use file::FilePickerWidget;
pub use link::LinkWidget;
pub use numeric::NumericWidget;
pub use str_list::StrListWidget;
pub use table::TableWidget;
pub use text::SingleLineWidget;
pub use textarea::TextAreaWidget;
pub use toggle::ToggleWidget;

/// Which catalog entry a field is edited with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    SingleLine,
    TextArea,
    StrList,
    Dropdown,
    Multiselect,
    Dict,
    KeyValueList,
    Toggle,
    Integer,
    Float,
    FilePicker,
    PromptEditor,
    CodeEditor,
    Table,
    Link,
    Fallback,
}

/// Collaborators and per-frame state handed to a widget while it draws
pub struct WidgetEnv<'a> {
    pub disabled: bool,
    pub globals: Option<&'a mut dyn GlobalVariables>,
    pub uploader: Option<Arc<dyn FileUploader>>,
    /// Characters shown in collapsed previews (prompt/code)
    pub preview_chars: usize,
}

impl<'a> WidgetEnv<'a> {
    pub fn new(disabled: bool) -> Self {
        Self {
            disabled,
            globals: None,
            uploader: None,
            preview_chars: crate::constants::widget::PREVIEW_CHARS,
        }
    }

    pub fn with_globals(mut self, globals: &'a mut dyn GlobalVariables) -> Self {
        self.globals = Some(globals);
        self
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn FileUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }
}

/// Common contract of every editor in the catalog
pub trait FieldWidget {
    fn kind(&self) -> WidgetKind;

    /// Draw the widget and return the edit made this frame, if any
    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload>;

    /// Replace local state with `empty`, dropping any in-flight work
    fn reset(&mut self, empty: &FieldValue);

    /// Value as the widget currently holds it
    fn value(&self) -> FieldValue;

    /// Storage path(s) held next to the value (file fields only)
    fn file_path(&self) -> Option<FieldValue> {
        None
    }

    /// Work still running in the background, such as an upload
    fn is_busy(&self) -> bool {
        false
    }

    /// Inline error currently displayed, if any
    fn error(&self) -> Option<&FieldError> {
        None
    }
}

/// Inline error banner shared by all widgets
pub(crate) fn show_error(ui: &mut egui::Ui, error: &FieldError) {
    ui.colored_label(Color32::from_rgb(230, 90, 90), format!("⚠ {}", error));
}

/// Non-error notice (clamped input and the like)
pub(crate) fn show_notice(ui: &mut egui::Ui, notice: &str) {
    ui.colored_label(Color32::from_rgb(220, 180, 90), notice);
}
