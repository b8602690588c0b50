//! Flowparams library
//!
//! Typed parameter editing for flow nodes: a dispatcher that picks one
//! widget per field descriptor, a change adapter that funnels every edit to
//! the owning form, and the widget catalog itself.

pub mod adapter;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod editor;
pub mod error;
pub mod fields;
pub mod form;
pub mod globals;
pub mod upload;
pub mod widgets;

// Re-export commonly used types
pub use adapter::{ChangeAdapter, FormSink};
pub use config::Settings;
pub use dispatch::{build_widget, render, select_widget, FieldEditor};
pub use editor::{PanelAction, ParameterPanel};
pub use error::{ConfigError, FieldError, TemplateError, UploadError};
pub use fields::{FieldChange, FieldDescriptor, FieldValue, RangeSpec, TypeTag, UpdatePayload};
pub use form::{FormField, NodeForm};
pub use globals::{GlobalVariables, InMemoryGlobals};
pub use upload::{FileUploader, LocalUploader, UploadTask, UploadedFile};
pub use widgets::{FieldWidget, WidgetEnv, WidgetKind};
