//! Interface panels hosting the field editors

mod parameter;

pub use parameter::ParameterPanel;

/// Actions requested from a panel this frame
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    None,
    Close,
    /// Refresh button pressed for the named field
    Refresh(String),
    Undo,
}
