//! Editor surfaces built on top of the field dispatcher

pub mod panels;

pub use panels::{PanelAction, ParameterPanel};
