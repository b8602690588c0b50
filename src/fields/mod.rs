//! Field model shared by the dispatcher, the widgets and the owning form

pub mod descriptor;
pub mod payload;
pub mod value;

pub use descriptor::{ColumnKind, ColumnSpec, FieldDescriptor, RangeSpec, TypeTag};
pub use payload::{FieldChange, UpdatePayload};
pub use value::FieldValue;
