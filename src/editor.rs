//! Bounding box editing for the active image.
//!
//! Owns the box list and every mutation on it. All geometry here is
//! normalized [0, 1]; the canvas converts screen coordinates before calling
//! in. Mutations clamp rather than fail, empty labels abort silently, and
//! each completed edit lands in the undo history as one command. Resize is
//! gesture-shaped: preview updates apply continuously but only the finished
//! gesture is recorded.

use crate::gesture::ResizeState;
use crate::model::BoundingBox;
use crate::undo::{Command, UndoStack, apply_redo, apply_undo};

/// The annotation list for one displayed image.
#[derive(Debug, Clone, Default)]
pub struct BoxEditor {
    boxes: Vec<BoundingBox>,
    history: UndoStack,
    resize: ResizeState,
}

impl BoxEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor whose undo history keeps at most `limit` steps.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            boxes: Vec::new(),
            history: UndoStack::with_limit(limit),
            resize: ResizeState::Idle,
        }
    }

    /// All boxes, in insertion order (later entries render on top).
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn get(&self, index: usize) -> Option<&BoundingBox> {
        self.boxes.get(index)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Append a box at the default rectangle. Empty labels mean the user
    /// cancelled entry; nothing happens. Returns the new box's index.
    pub fn add_box(&mut self, label: &str) -> Option<usize> {
        if label.is_empty() {
            log::debug!("Add box skipped: empty label");
            return None;
        }
        Some(self.append(BoundingBox::default_rect(label)))
    }

    /// Append an already-built box (drop and draw creation paths), clamping
    /// it into bounds. Returns its index.
    pub fn append(&mut self, mut bbox: BoundingBox) -> usize {
        bbox.clamp_to_bounds();
        let index = self.boxes.len();
        log::info!("Added box '{}' at {index}", bbox.label);
        self.boxes.push(bbox.clone());
        self.history.push(Command::Add { index, bbox });
        index
    }

    /// Reposition a box's top-left corner, clamped so the box stays inside
    /// the image. Unknown indices and no-op moves are ignored.
    pub fn move_box(&mut self, index: usize, x: f32, y: f32) {
        let Some(bbox) = self.boxes.get_mut(index) else {
            return;
        };
        let from = (bbox.x, bbox.y);
        bbox.move_to(x, y);
        let to = (bbox.x, bbox.y);
        if from != to {
            log::debug!("Moved box {index} to ({:.3}, {:.3})", to.0, to.1);
            self.history.push(Command::Move { index, from, to });
        }
    }

    /// Grab a resize handle: snapshot the starting dimensions so cumulative
    /// deltas apply from a fixed base. A gesture already in flight is
    /// dropped without recording.
    pub fn begin_resize(&mut self, index: usize) {
        let Some(bbox) = self.boxes.get(index) else {
            return;
        };
        self.resize = ResizeState::Active {
            index,
            start_width: bbox.width,
            start_height: bbox.height,
        };
    }

    /// Preview step of a resize gesture: apply the cumulative normalized
    /// delta to the snapshotted start dimensions. Not recorded; the gesture
    /// records once on [`BoxEditor::end_resize`].
    pub fn update_resize(&mut self, delta_width: f32, delta_height: f32) {
        let ResizeState::Active {
            index,
            start_width,
            start_height,
        } = self.resize
        else {
            return;
        };
        if let Some(bbox) = self.boxes.get_mut(index) {
            bbox.resize_to(start_width + delta_width, start_height + delta_height);
        }
    }

    /// Finish the resize gesture, recording one command covering the whole
    /// drag. Safe to call when no gesture is active.
    pub fn end_resize(&mut self) {
        let ResizeState::Active {
            index,
            start_width,
            start_height,
        } = self.resize
        else {
            return;
        };
        self.resize = ResizeState::Idle;
        if let Some(bbox) = self.boxes.get(index) {
            let from = (start_width, start_height);
            let to = (bbox.width, bbox.height);
            if from != to {
                log::debug!("Resized box {index} to {:.3}x{:.3}", to.0, to.1);
                self.history.push(Command::Resize { index, from, to });
            }
        }
    }

    /// Whether a resize gesture is in flight.
    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    /// Throw away an in-flight resize preview, restoring the snapshotted
    /// dimensions. Nothing was recorded for the preview, so the box list
    /// must match history before a command is applied.
    fn discard_resize(&mut self) {
        let ResizeState::Active {
            index,
            start_width,
            start_height,
        } = self.resize
        else {
            return;
        };
        self.resize = ResizeState::Idle;
        if let Some(bbox) = self.boxes.get_mut(index) {
            bbox.resize_to(start_width, start_height);
        }
    }

    /// Replace a box's label. Empty input means the edit was cancelled and
    /// leaves the box unchanged.
    pub fn relabel_box(&mut self, index: usize, new_label: &str) {
        if new_label.is_empty() {
            log::debug!("Relabel skipped: empty label");
            return;
        }
        let Some(bbox) = self.boxes.get_mut(index) else {
            return;
        };
        if bbox.label == new_label {
            return;
        }
        let from = std::mem::replace(&mut bbox.label, new_label.to_string());
        log::info!("Relabeled box {index}: '{from}' -> '{new_label}'");
        self.history.push(Command::Relabel {
            index,
            from,
            to: new_label.to_string(),
        });
    }

    /// Remove a box by index. Unknown indices are ignored.
    pub fn remove_box(&mut self, index: usize) {
        if index >= self.boxes.len() {
            return;
        }
        let bbox = self.boxes.remove(index);
        log::info!("Removed box '{}' at {index}", bbox.label);
        self.history.push(Command::Remove { index, bbox });
    }

    /// Swap in a whole new list (detection import), clamping every incoming
    /// box. The previous list is recoverable through undo.
    pub fn replace_all(&mut self, boxes: Vec<BoundingBox>) {
        let mut after = boxes;
        for bbox in &mut after {
            bbox.clamp_to_bounds();
        }
        if after == self.boxes {
            return;
        }
        log::info!("📥 Replaced box list: {} -> {}", self.boxes.len(), after.len());
        let before = std::mem::replace(&mut self.boxes, after.clone());
        self.history.push(Command::Replace { before, after });
    }

    /// Index of the top-most box containing a normalized point. Later
    /// entries render on top, so the scan runs back to front.
    pub fn topmost_at(&self, px: f32, py: f32) -> Option<usize> {
        self.boxes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, bbox)| bbox.contains(px, py))
            .map(|(index, _)| index)
    }

    /// Undo the most recent edit, discarding any unfinished resize preview
    /// first. Returns whether anything happened.
    pub fn undo(&mut self) -> bool {
        self.discard_resize();
        let Some(cmd) = self.history.pop_undo() else {
            return false;
        };
        apply_undo(&cmd, &mut self.boxes);
        true
    }

    /// Reapply the most recently undone edit, discarding any unfinished
    /// resize preview first. Returns whether anything happened.
    pub fn redo(&mut self) -> bool {
        self.discard_resize();
        let Some(cmd) = self.history.pop_redo() else {
            return false;
        };
        apply_redo(&cmd, &mut self.boxes);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Description of the next undoable edit, for host menus.
    pub fn undo_description(&self) -> Option<String> {
        self.history.undo_description()
    }

    /// Description of the next redoable edit, for host menus.
    pub fn redo_description(&self) -> Option<String> {
        self.history.redo_description()
    }

    /// Cap the number of retained undo steps.
    pub fn set_history_limit(&mut self, limit: usize) {
        self.history.set_limit(limit);
    }

    /// Drop all boxes, history, and gesture state. Used when the displayed
    /// image changes; not undoable.
    pub fn reset(&mut self) {
        self.boxes.clear();
        self.history.clear();
        self.resize = ResizeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn bounds_hold(editor: &BoxEditor) -> bool {
        editor.boxes().iter().all(|b| {
            b.x >= 0.0
                && b.y >= 0.0
                && b.x + b.width <= 1.0 + EPSILON
                && b.y + b.height <= 1.0 + EPSILON
                && b.width >= 0.01 - EPSILON
                && b.height >= 0.01 - EPSILON
        })
    }

    #[test]
    fn test_add_box_yields_exact_default() {
        let mut editor = BoxEditor::new();
        let index = editor.add_box("Lesion A");
        assert_eq!(index, Some(0));
        assert_eq!(editor.len(), 1);

        let b = &editor.boxes()[0];
        assert_eq!(b.x, 0.4);
        assert_eq!(b.y, 0.4);
        assert_eq!(b.width, 0.2);
        assert_eq!(b.height, 0.2);
        assert_eq!(b.label, "Lesion A");
        assert_eq!(b.confidence, 1.0);
    }

    #[test]
    fn test_add_box_rejects_empty_label() {
        let mut editor = BoxEditor::new();
        assert_eq!(editor.add_box(""), None);
        assert!(editor.is_empty());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_move_box_clamps_and_records() {
        let mut editor = BoxEditor::new();
        editor.add_box("m");
        editor.move_box(0, 0.95, 0.5);

        let b = &editor.boxes()[0];
        assert!(approx_eq(b.x, 0.8));
        assert!(approx_eq(b.y, 0.5));
        assert!(bounds_hold(&editor));

        editor.undo();
        assert!(approx_eq(editor.boxes()[0].x, 0.4));
    }

    #[test]
    fn test_move_box_unknown_index_is_ignored() {
        let mut editor = BoxEditor::new();
        editor.move_box(3, 0.5, 0.5);
        assert!(editor.is_empty());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_noop_move_records_nothing() {
        let mut editor = BoxEditor::new();
        editor.add_box("m");
        let steps = editor.can_undo() as usize;
        editor.move_box(0, 0.4, 0.4);
        assert_eq!(editor.can_undo() as usize, steps);
        assert!(editor.undo_description().unwrap().starts_with("Add box"));
    }

    #[test]
    fn test_resize_gesture_applies_cumulative_deltas() {
        let mut editor = BoxEditor::new();
        editor.add_box("r");
        editor.begin_resize(0);

        editor.update_resize(0.1, 0.05);
        assert!(approx_eq(editor.boxes()[0].width, 0.3));
        assert!(approx_eq(editor.boxes()[0].height, 0.25));

        // The same cumulative delta again must not compound.
        editor.update_resize(0.1, 0.05);
        assert!(approx_eq(editor.boxes()[0].width, 0.3));

        editor.end_resize();
        assert!(!editor.is_resizing());
    }

    #[test]
    fn test_resize_clamps_against_far_edge() {
        let mut editor = BoxEditor::new();
        editor.append(BoundingBox::new(0.8, 0.1, 0.1, 0.1, "edge", 1.0));
        editor.begin_resize(0);
        editor.update_resize(100.0, 100.0);
        editor.end_resize();

        let b = &editor.boxes()[0];
        assert!(b.width <= 0.2 + EPSILON);
        assert!(bounds_hold(&editor));
    }

    #[test]
    fn test_resize_gesture_records_one_step() {
        let mut editor = BoxEditor::new();
        editor.add_box("r");
        editor.begin_resize(0);
        editor.update_resize(0.05, 0.05);
        editor.update_resize(0.1, 0.1);
        editor.end_resize();
        // A second end is a no-op; still exactly one resize step on top.
        editor.end_resize();

        assert!(editor.undo_description().unwrap().starts_with("Resize"));
        editor.undo();
        assert!(approx_eq(editor.boxes()[0].width, 0.2));
        assert!(approx_eq(editor.boxes()[0].height, 0.2));
    }

    #[test]
    fn test_resize_without_motion_records_nothing() {
        let mut editor = BoxEditor::new();
        editor.add_box("r");
        editor.begin_resize(0);
        editor.end_resize();
        assert!(editor.undo_description().unwrap().starts_with("Add box"));
    }

    #[test]
    fn test_relabel_box() {
        let mut editor = BoxEditor::new();
        editor.add_box("old");
        editor.relabel_box(0, "new");
        assert_eq!(editor.boxes()[0].label, "new");

        editor.relabel_box(0, "");
        assert_eq!(editor.boxes()[0].label, "new");

        editor.undo();
        assert_eq!(editor.boxes()[0].label, "old");
    }

    #[test]
    fn test_remove_box_defensive() {
        let mut editor = BoxEditor::new();
        editor.add_box("a");
        editor.remove_box(5);
        assert_eq!(editor.len(), 1);
        editor.remove_box(0);
        assert!(editor.is_empty());
    }

    #[test]
    fn test_replace_then_remove_yields_empty() {
        let mut editor = BoxEditor::new();
        editor.replace_all(vec![BoundingBox::new(0.1, 0.1, 0.2, 0.2, "A", 0.9)]);
        assert_eq!(editor.len(), 1);
        editor.remove_box(0);
        assert!(editor.is_empty());
    }

    #[test]
    fn test_replace_all_clamps_incoming() {
        let mut editor = BoxEditor::new();
        editor.add_box("stale");
        editor.replace_all(vec![
            BoundingBox {
                x: 0.9,
                y: 0.9,
                width: 0.5,
                height: 0.5,
                label: "overflow".to_string(),
                confidence: 2.0,
            },
            BoundingBox::new(0.2, 0.2, 0.1, 0.1, "fine", 0.7),
        ]);

        assert_eq!(editor.len(), 2);
        assert!(bounds_hold(&editor));
        assert!(editor.boxes()[0].confidence <= 1.0);
        assert!(editor.boxes().iter().all(|b| b.label != "stale"));
    }

    #[test]
    fn test_replace_all_is_undoable() {
        let mut editor = BoxEditor::new();
        editor.add_box("before");
        editor.replace_all(vec![BoundingBox::new(0.1, 0.1, 0.2, 0.2, "after", 0.9)]);

        editor.undo();
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.boxes()[0].label, "before");

        editor.redo();
        assert_eq!(editor.boxes()[0].label, "after");
    }

    #[test]
    fn test_topmost_at_prefers_later_boxes() {
        let mut editor = BoxEditor::new();
        editor.append(BoundingBox::new(0.1, 0.1, 0.5, 0.5, "under", 1.0));
        editor.append(BoundingBox::new(0.3, 0.3, 0.5, 0.5, "over", 1.0));

        assert_eq!(editor.topmost_at(0.4, 0.4), Some(1));
        assert_eq!(editor.topmost_at(0.15, 0.15), Some(0));
        assert_eq!(editor.topmost_at(0.95, 0.05), None);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut editor = BoxEditor::new();
        editor.add_box("a");
        editor.undo();
        assert!(editor.can_redo());

        editor.add_box("b");
        assert!(!editor.can_redo());
        assert_eq!(editor.boxes()[0].label, "b");
    }

    #[test]
    fn test_undo_chain_restores_each_step() {
        let mut editor = BoxEditor::new();
        editor.add_box("a");
        editor.move_box(0, 0.1, 0.1);
        editor.relabel_box(0, "b");
        editor.remove_box(0);

        assert!(editor.undo()); // un-remove
        assert_eq!(editor.boxes()[0].label, "b");
        assert!(editor.undo()); // un-relabel
        assert_eq!(editor.boxes()[0].label, "a");
        assert!(editor.undo()); // un-move
        assert!(approx_eq(editor.boxes()[0].x, 0.4));
        assert!(editor.undo()); // un-add
        assert!(editor.is_empty());
        assert!(!editor.undo());
    }

    #[test]
    fn test_undo_cancels_active_resize() {
        let mut editor = BoxEditor::new();
        editor.add_box("r");
        editor.begin_resize(0);
        editor.update_resize(0.1, 0.1);

        editor.undo();
        assert!(!editor.is_resizing());
        assert!(editor.is_empty());
    }

    #[test]
    fn test_undo_reverts_unrecorded_resize_preview() {
        let mut editor = BoxEditor::new();
        editor.add_box("a");
        editor.add_box("b");
        editor.begin_resize(0);
        editor.update_resize(0.1, 0.0);
        assert!(approx_eq(editor.boxes()[0].width, 0.3));

        // Undoing removes "b"; the unrecorded preview on "a" must not
        // survive, or history could never reproduce the list.
        editor.undo();
        assert!(!editor.is_resizing());
        assert_eq!(editor.len(), 1);
        assert!(approx_eq(editor.boxes()[0].width, 0.2));
        assert!(approx_eq(editor.boxes()[0].height, 0.2));

        editor.redo();
        assert_eq!(editor.len(), 2);
        assert!(approx_eq(editor.boxes()[0].width, 0.2));
    }

    #[test]
    fn test_redo_reverts_unrecorded_resize_preview() {
        let mut editor = BoxEditor::new();
        editor.add_box("a");
        editor.add_box("b");
        editor.undo();
        editor.begin_resize(0);
        editor.update_resize(0.1, 0.1);

        editor.redo();
        assert!(!editor.is_resizing());
        assert_eq!(editor.len(), 2);
        assert!(approx_eq(editor.boxes()[0].width, 0.2));
        assert!(approx_eq(editor.boxes()[0].height, 0.2));
        assert_eq!(editor.boxes()[1].label, "b");
    }

    #[test]
    fn test_history_limit_applies() {
        let mut editor = BoxEditor::with_history_limit(2);
        editor.add_box("a");
        editor.relabel_box(0, "b");
        editor.relabel_box(0, "c");
        editor.relabel_box(0, "d");

        assert!(editor.undo());
        assert!(editor.undo());
        assert!(!editor.undo());
        assert_eq!(editor.boxes()[0].label, "b");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut editor = BoxEditor::new();
        editor.add_box("a");
        editor.begin_resize(0);
        editor.reset();

        assert!(editor.is_empty());
        assert!(!editor.can_undo());
        assert!(!editor.is_resizing());
    }
}
