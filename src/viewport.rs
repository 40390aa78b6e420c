//! Viewport transform state for a single image view.
//!
//! Holds the zoom/rotation/pan applied to displayed image content and the
//! pan-drag state machine, plus the inverse mapping from screen-space deltas
//! into the image-local frame that both panning and resizing rely on.

use crate::constants::zoom;

/// Quarter-turn rotation applied to displayed image content.
///
/// Content rotates clockwise, matching a CSS `rotate()` with positive
/// degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Advance clockwise by a quarter turn, wrapping after a full turn.
    pub fn advanced(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Rotation angle in degrees, for composing the display transform.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Map a screen-space delta into the un-rotated content frame.
    ///
    /// This is `R(-angle)` applied to the delta. The angles are exact
    /// quarter turns, so the arms are written out instead of going through
    /// trigonometry; tests can then assert exact equality.
    pub fn inverse_delta(self, dx: f32, dy: f32) -> (f32, f32) {
        match self {
            Rotation::Deg0 => (dx, dy),
            Rotation::Deg90 => (dy, -dx),
            Rotation::Deg180 => (-dx, -dy),
            Rotation::Deg270 => (-dy, dx),
        }
    }
}

/// Viewport transform for one displayed image.
///
/// The display transform composes as `scale -> rotate -> translate`, so pan
/// is stored in the rotated, unscaled frame of the image content. Screen
/// deltas are inverse-rotated and then divided by zoom before they touch
/// pan; [`Viewport::screen_delta_to_local`] is that shared conversion.
///
/// Pan dragging follows a two-state machine (idle/panning): pointer-down
/// arms the drag only while pan mode is on, and pointer-up or pointer-leave
/// always disarms it.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f32,
    rotation: Rotation,
    pan_x: f32,
    pan_y: f32,
    pan_mode: bool,
    drag_anchor: Option<(f32, f32)>,
}

impl Viewport {
    /// Create a viewport at zoom 1.0 with no rotation or pan.
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            rotation: Rotation::Deg0,
            pan_x: 0.0,
            pan_y: 0.0,
            pan_mode: false,
            drag_anchor: None,
        }
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current rotation.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Current pan offset in image-local units.
    pub fn pan(&self) -> (f32, f32) {
        (self.pan_x, self.pan_y)
    }

    /// Whether pointer drags are currently interpreted as view panning.
    pub fn is_pan_mode(&self) -> bool {
        self.pan_mode
    }

    /// Whether a pan drag is in progress.
    pub fn is_panning(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Step zoom up, saturating at the maximum.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + zoom::STEP).min(zoom::MAX);
        log::debug!("🔍 Zoom in -> {:.1}", self.zoom);
    }

    /// Step zoom down, saturating at the minimum.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - zoom::STEP).max(zoom::MIN);
        log::debug!("🔍 Zoom out -> {:.1}", self.zoom);
    }

    /// Advance rotation by a quarter turn. Pan and zoom are kept: rotation
    /// composes with the existing offset.
    pub fn rotate(&mut self) {
        self.rotation = self.rotation.advanced();
        log::debug!("🔄 Rotated to {}°", self.rotation.degrees());
    }

    /// Toggle pan-interaction mode. Leaving pan mode cancels any drag in
    /// progress.
    pub fn toggle_pan_mode(&mut self) {
        self.pan_mode = !self.pan_mode;
        if !self.pan_mode {
            self.drag_anchor = None;
        }
        log::debug!("Pan mode: {}", self.pan_mode);
    }

    /// Record the drag anchor for a pan gesture. Has no effect outside pan
    /// mode.
    pub fn begin_pan(&mut self, x: f32, y: f32) {
        if self.pan_mode {
            self.drag_anchor = Some((x, y));
        }
    }

    /// Apply the pointer movement since the last anchor to pan, then
    /// re-anchor at the new position.
    ///
    /// Returns the image-local delta that was added to pan, or `None` when
    /// no drag is armed.
    pub fn drag_pan(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (anchor_x, anchor_y) = self.drag_anchor?;
        let (local_dx, local_dy) = self.screen_delta_to_local(x - anchor_x, y - anchor_y);
        self.pan_x += local_dx;
        self.pan_y += local_dy;
        self.drag_anchor = Some((x, y));
        Some((local_dx, local_dy))
    }

    /// End the pan gesture. Safe to call repeatedly.
    pub fn end_pan(&mut self) {
        self.drag_anchor = None;
    }

    /// Convert a screen-space delta into the image-local frame: undo the
    /// rotation first, then the scale. Both panning and box resizing route
    /// their deltas through here so drag direction stays consistent at any
    /// rotation/zoom combination.
    pub fn screen_delta_to_local(&self, dx: f32, dy: f32) -> (f32, f32) {
        let (rx, ry) = self.rotation.inverse_delta(dx, dy);
        (rx / self.zoom, ry / self.zoom)
    }

    /// Return to the identity view: zoom 1.0, no rotation, no pan, pan mode
    /// off. Used when the displayed image changes.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}
