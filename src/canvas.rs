//! Screen-facing canvas for one displayed image.
//!
//! The canvas ties a displayed image to its viewport and box editor and is
//! the only layer that sees screen coordinates. Positions (drops, erases,
//! draw corners) are mapped through the image element's layout rectangle,
//! which the viewport transform never moves. Resize deltas instead go
//! through the viewport's inverse mapping so handle drags track the pointer
//! at any zoom and rotation, the same path panning uses.

use crate::constants::bbox;
use crate::editor::BoxEditor;
use crate::gesture::{DragPayload, DrawState};
use crate::model::{BoundingBox, ImageRef};
use crate::viewport::Viewport;

/// Layout rectangle of the image element in screen coordinates, before the
/// viewport transform is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Map a screen point into normalized image coordinates, clamped to the
    /// unit square. `None` while the rectangle has no area (layout not done
    /// yet).
    pub fn to_normalized(&self, sx: f32, sy: f32) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let nx = ((sx - self.x) / self.width).clamp(0.0, 1.0);
        let ny = ((sy - self.y) / self.height).clamp(0.0, 1.0);
        Some((nx, ny))
    }
}

/// Active annotation tool for a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkTool {
    /// Pick boxes without mutating them; selection itself is host state
    Select,
    /// Rubber-band a new box
    #[default]
    Rectangle,
    /// Delete the top-most box under the pointer
    Eraser,
}

/// One quadrant's image, viewport, and annotations.
#[derive(Debug, Clone)]
pub struct ImageCanvas {
    image: Option<ImageRef>,
    container: Rect,
    viewport: Viewport,
    editor: BoxEditor,
    tool: MarkTool,
    draw: DrawState,
    draw_label: String,
    show_crosshair: bool,
}

impl Default for ImageCanvas {
    fn default() -> Self {
        Self {
            image: None,
            container: Rect::default(),
            viewport: Viewport::new(),
            editor: BoxEditor::new(),
            tool: MarkTool::default(),
            draw: DrawState::Idle,
            draw_label: String::new(),
            show_crosshair: true,
        }
    }
}

impl ImageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    /// Change the displayed image. Re-selecting the image already shown
    /// only refreshes its metadata; switching to a different image (or to
    /// none) resets the viewport, the boxes, and any in-flight gesture.
    pub fn set_image(&mut self, image: Option<ImageRef>) {
        let same = match (&self.image, &image) {
            (Some(current), Some(next)) => current.id == next.id,
            (None, None) => true,
            _ => false,
        };
        if same {
            self.image = image;
            return;
        }
        if let Some(img) = &image {
            log::info!("🖼️ Displaying image '{}'", img.id);
        }
        self.image = image;
        self.viewport.reset();
        self.editor.reset();
        self.draw = DrawState::Idle;
    }

    pub fn container(&self) -> Rect {
        self.container
    }

    /// Record the image element's current layout rectangle. While it has no
    /// area, every position-based operation is inert.
    pub fn set_container(&mut self, container: Rect) {
        self.container = container;
    }

    pub fn tool(&self) -> MarkTool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: MarkTool) {
        if self.tool != tool {
            log::debug!("🛠️ Tool changed to {tool:?}");
            self.tool = tool;
        }
    }

    /// Label applied to boxes created by the rectangle tool. While empty,
    /// finished draws are discarded.
    pub fn draw_label(&self) -> &str {
        &self.draw_label
    }

    pub fn set_draw_label(&mut self, label: impl Into<String>) {
        self.draw_label = label.into();
    }

    pub fn show_crosshair(&self) -> bool {
        self.show_crosshair
    }

    pub fn set_show_crosshair(&mut self, show: bool) {
        self.show_crosshair = show;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn editor(&self) -> &BoxEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut BoxEditor {
        &mut self.editor
    }

    /// Dispatch a drag-and-drop release at a screen point.
    pub fn drop_payload(&mut self, sx: f32, sy: f32, payload: DragPayload) {
        match payload {
            DragPayload::NewLabel { label } => {
                self.add_box_at_drop(sx, sy, &label);
            }
            DragPayload::ExistingBox { index } => self.move_box(index, sx, sy),
        }
    }

    /// Create a box centered on the drop point. Returns its index.
    pub fn add_box_at_drop(&mut self, sx: f32, sy: f32, label: &str) -> Option<usize> {
        if self.image.is_none() || label.is_empty() {
            return None;
        }
        let (cx, cy) = self.container.to_normalized(sx, sy)?;
        Some(self.editor.append(BoundingBox::centered_at(cx, cy, label)))
    }

    /// Move a box's top-left corner to a screen point.
    pub fn move_box(&mut self, index: usize, sx: f32, sy: f32) {
        if let Some((nx, ny)) = self.container.to_normalized(sx, sy) {
            self.editor.move_box(index, nx, ny);
        }
    }

    pub fn begin_resize(&mut self, index: usize) {
        self.editor.begin_resize(index);
    }

    /// Apply the cumulative screen delta of a handle drag. The delta is
    /// mapped into the image's local frame first so the box edge follows
    /// the pointer under rotation and zoom.
    pub fn update_resize(&mut self, dx: f32, dy: f32) {
        if self.container.is_empty() {
            return;
        }
        let (lx, ly) = self.viewport.screen_delta_to_local(dx, dy);
        self.editor
            .update_resize(lx / self.container.width, ly / self.container.height);
    }

    pub fn end_resize(&mut self) {
        self.editor.end_resize();
    }

    /// Remove the top-most box under a screen point. Returns whether one
    /// was hit.
    pub fn erase_at(&mut self, sx: f32, sy: f32) -> bool {
        let Some((nx, ny)) = self.container.to_normalized(sx, sy) else {
            return false;
        };
        match self.editor.topmost_at(nx, ny) {
            Some(index) => {
                self.editor.remove_box(index);
                true
            }
            None => false,
        }
    }

    /// The in-progress rubber band as a normalized rectangle, for overlay
    /// rendering.
    pub fn draw_rect(&self) -> Option<(f32, f32, f32, f32)> {
        let DrawState::Drawing { start, current } = self.draw else {
            return None;
        };
        Some((
            start.0.min(current.0),
            start.1.min(current.1),
            (current.0 - start.0).abs(),
            (current.1 - start.1).abs(),
        ))
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.is_drawing()
    }

    /// Abandon the rubber band without creating a box.
    pub fn cancel_draw(&mut self) {
        self.draw = DrawState::Idle;
    }

    /// Start a rubber band at a screen point. Inert while the container has
    /// no area.
    pub fn begin_draw(&mut self, sx: f32, sy: f32) {
        if let Some(point) = self.container.to_normalized(sx, sy) {
            self.draw = DrawState::Drawing {
                start: point,
                current: point,
            };
        }
    }

    /// Track the rubber band's moving corner.
    pub fn update_draw(&mut self, sx: f32, sy: f32) {
        let DrawState::Drawing { start, .. } = self.draw else {
            return;
        };
        if let Some(point) = self.container.to_normalized(sx, sy) {
            self.draw = DrawState::Drawing {
                start,
                current: point,
            };
        }
    }

    /// Complete the rubber band with an explicit label, appending the box.
    /// Drags below the minimum size on either axis and empty labels are
    /// discarded. Returns the created box's index.
    pub fn finish_draw(&mut self, label: &str) -> Option<usize> {
        let DrawState::Drawing { start, current } = std::mem::take(&mut self.draw) else {
            return None;
        };
        let width = (current.0 - start.0).abs();
        let height = (current.1 - start.1).abs();
        if width < bbox::MIN_SIZE || height < bbox::MIN_SIZE {
            log::debug!("Draw discarded: below minimum size");
            return None;
        }
        if label.is_empty() {
            log::debug!("Draw discarded: no label selected");
            return None;
        }
        let x = start.0.min(current.0);
        let y = start.1.min(current.1);
        Some(self.editor.append(BoundingBox::new(
            x,
            y,
            width,
            height,
            label,
            bbox::FULL_CONFIDENCE,
        )))
    }

    /// Route a pointer press. Pan mode wins over every tool; otherwise the
    /// rectangle tool starts a rubber band and the eraser deletes on
    /// contact.
    pub fn pointer_down(&mut self, sx: f32, sy: f32) {
        if self.image.is_none() {
            return;
        }
        if self.viewport.is_pan_mode() {
            self.viewport.begin_pan(sx, sy);
            return;
        }
        match self.tool {
            MarkTool::Rectangle => self.begin_draw(sx, sy),
            MarkTool::Eraser => {
                self.erase_at(sx, sy);
            }
            MarkTool::Select => {}
        }
    }

    /// Route a pointer move to whichever gesture is in flight.
    pub fn pointer_move(&mut self, sx: f32, sy: f32) {
        if self.viewport.is_panning() {
            self.viewport.drag_pan(sx, sy);
            return;
        }
        if self.draw.is_drawing() {
            self.update_draw(sx, sy);
        }
    }

    /// Route a pointer release: panning ends, an active rubber band turns
    /// into a box labeled with the palette selection. Returns the created
    /// box's index, if any.
    pub fn pointer_up(&mut self) -> Option<usize> {
        self.viewport.end_pan();
        if self.draw.is_drawing() {
            let label = self.draw_label.clone();
            self.finish_draw(&label)
        } else {
            None
        }
    }

    /// The pointer leaving the canvas counts as a release.
    pub fn pointer_leave(&mut self) -> Option<usize> {
        self.pointer_up()
    }
}
