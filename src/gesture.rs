//! Typed gesture payloads and in-flight gesture state.
//!
//! Drag-and-drop identity travels as a typed value instead of an ad hoc
//! string: the host hands the payload back on drop and the canvas
//! dispatches on it directly. Gesture enums carry their start snapshot in
//! the active variant and collapse back to `Idle` when the gesture ends.

use serde::{Deserialize, Serialize};

/// Drag-and-drop payload carried through the host's DnD plumbing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragPayload {
    /// A palette label dragged onto the canvas; drop creates a new box
    NewLabel { label: String },
    /// An existing box being repositioned; drop moves it
    ExistingBox { index: usize },
}

/// In-flight corner-handle resize over one box.
///
/// The start dimensions are snapshotted when the handle is grabbed so the
/// cumulative screen delta always applies from a fixed base.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Active {
        index: usize,
        start_width: f32,
        start_height: f32,
    },
}

impl ResizeState {
    pub fn is_active(&self) -> bool {
        matches!(self, ResizeState::Active { .. })
    }
}

/// In-flight rubber-band rectangle draw, in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing {
        start: (f32, f32),
        current: (f32, f32),
    },
}

impl DrawState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, DrawState::Drawing { .. })
    }
}
