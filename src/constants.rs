//! Tuning constants for the viewer and annotation model.
//!
//! This module centralizes all hardcoded values for zoom limits, box
//! geometry, detection parsing, and history depth.

/// Zoom constants.
pub mod zoom {
    /// Additive zoom step per zoom-in/zoom-out action
    pub const STEP: f32 = 0.1;
    /// Maximum zoom level
    pub const MAX: f32 = 2.0;
    /// Minimum zoom level
    pub const MIN: f32 = 0.5;
}

/// Bounding box geometry constants (normalized coordinates).
pub mod bbox {
    /// Default box origin when added without a position
    pub const DEFAULT_X: f32 = 0.4;
    /// Default box origin when added without a position
    pub const DEFAULT_Y: f32 = 0.4;
    /// Default box extent when added without a position
    pub const DEFAULT_WIDTH: f32 = 0.2;
    /// Default box extent when added without a position
    pub const DEFAULT_HEIGHT: f32 = 0.2;
    /// Side length of a box created by dropping a label on the canvas
    pub const DROP_SIZE: f32 = 0.1;
    /// Minimum width/height a box may shrink to
    pub const MIN_SIZE: f32 = 0.01;
    /// Confidence assigned to hand-created boxes
    pub const FULL_CONFIDENCE: f32 = 1.0;
}

/// Detection payload framing.
pub mod detect {
    /// Marker preceding the JSON payload in the analysis response
    pub const BEGIN_MARKER: &str = "<|begin_of_box|>";
    /// Marker following the JSON payload in the analysis response
    pub const END_MARKER: &str = "<|end_of_box|>";
}

/// Annotation presentation constants.
pub mod label {
    /// Golden angle for preset color generation (degrees)
    pub const GOLDEN_ANGLE: f32 = 137.5;
    /// Saturation for generated preset colors
    pub const COLOR_SATURATION: f32 = 0.8;
    /// Value/brightness for generated preset colors
    pub const COLOR_VALUE: f32 = 0.9;
}

/// Edit history constants.
pub mod history {
    /// Default maximum number of undoable steps per canvas
    pub const MAX_STEPS: usize = 100;
}
