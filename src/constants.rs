//! Application-wide constants and default values
//!
//! Centralized location for all hard-coded values to improve maintainability

/// Parameter panel sizing constants
pub mod panel {
    /// Default parameter panel size
    pub const DEFAULT_PARAMETER_SIZE: [f32; 2] = [380.0, 500.0];

    /// Minimum parameter panel size
    pub const MIN_PARAMETER_SIZE: [f32; 2] = [300.0, 200.0];

    /// Maximum parameter panel size
    pub const MAX_PARAMETER_SIZE: [f32; 2] = [640.0, 900.0];

    /// Gap between the panel and the screen edge
    pub const EDGE_MARGIN: f32 = 10.0;
}

/// Widget constants
pub mod widget {
    /// Characters of a prompt/code value shown before the editor is opened
    pub const PREVIEW_CHARS: usize = 60;

    /// Width of numeric input boxes
    pub const NUMERIC_WIDTH: f32 = 90.0;

    /// Rows shown by multi-line text areas
    pub const TEXT_AREA_ROWS: usize = 4;

    /// Rows shown by the prompt/code modal editor
    pub const EDITOR_ROWS: usize = 18;

    /// Default modal editor size
    pub const EDITOR_SIZE: [f32; 2] = [560.0, 420.0];

    /// Table row height
    pub const TABLE_ROW_HEIGHT: f32 = 22.0;

    /// Step used by float fields without an explicit range step
    pub const DEFAULT_FLOAT_STEP: f64 = 0.1;

    /// Step used by int fields without an explicit range step
    pub const DEFAULT_INT_STEP: f64 = 1.0;
}

/// Owning form constants
pub mod form {
    /// Undo checkpoints kept per form
    pub const DEFAULT_HISTORY_DEPTH: usize = 50;
}
