//! Undo/redo for annotation edits.
//!
//! Command pattern: every completed edit records a [`Command`] carrying
//! enough state to reverse itself. The stack never mutates boxes on its own;
//! [`apply_undo`] and [`apply_redo`] replay a command against the box list
//! the editor owns.

use crate::constants::history;
use crate::model::BoundingBox;

/// A reversible annotation edit.
///
/// Boxes are addressed by index; add/remove restore with `Vec::insert` so
/// undo brings back the original ordering, not just the original contents.
#[derive(Debug, Clone)]
pub enum Command {
    /// A box was appended or inserted at `index`
    Add { index: usize, bbox: BoundingBox },
    /// The box at `index` was removed
    Remove { index: usize, bbox: BoundingBox },
    /// The box at `index` changed position (top-left corner)
    Move {
        index: usize,
        from: (f32, f32),
        to: (f32, f32),
    },
    /// The box at `index` changed size (top-left anchored)
    Resize {
        index: usize,
        from: (f32, f32),
        to: (f32, f32),
    },
    /// The box at `index` changed label
    Relabel {
        index: usize,
        from: String,
        to: String,
    },
    /// The whole list was swapped out (detection import)
    Replace {
        before: Vec<BoundingBox>,
        after: Vec<BoundingBox>,
    },
}

impl Command {
    /// Human-readable description, for log lines and host menus.
    pub fn description(&self) -> String {
        match self {
            Command::Add { bbox, .. } => format!("Add box '{}'", bbox.label),
            Command::Remove { bbox, .. } => format!("Delete box '{}'", bbox.label),
            Command::Move { .. } => "Move box".to_string(),
            Command::Resize { .. } => "Resize box".to_string(),
            Command::Relabel { to, .. } => format!("Relabel box to '{to}'"),
            Command::Replace { after, .. } => format!("Import {} boxes", after.len()),
        }
    }
}

/// Reverse a command's effect on the box list. Commands referring to indices
/// the list no longer has are ignored.
pub fn apply_undo(cmd: &Command, boxes: &mut Vec<BoundingBox>) {
    match cmd {
        Command::Add { index, .. } => {
            if *index < boxes.len() {
                boxes.remove(*index);
                log::debug!("⏪ Undid add at {index}");
            }
        }
        Command::Remove { index, bbox } => {
            let index = (*index).min(boxes.len());
            boxes.insert(index, bbox.clone());
            log::debug!("⏪ Undid delete at {index}");
        }
        Command::Move { index, from, .. } => {
            if let Some(bbox) = boxes.get_mut(*index) {
                bbox.x = from.0;
                bbox.y = from.1;
                log::debug!("⏪ Undid move at {index}");
            }
        }
        Command::Resize { index, from, .. } => {
            if let Some(bbox) = boxes.get_mut(*index) {
                bbox.width = from.0;
                bbox.height = from.1;
                log::debug!("⏪ Undid resize at {index}");
            }
        }
        Command::Relabel { index, from, .. } => {
            if let Some(bbox) = boxes.get_mut(*index) {
                bbox.label = from.clone();
                log::debug!("⏪ Undid relabel at {index}");
            }
        }
        Command::Replace { before, .. } => {
            *boxes = before.clone();
            log::debug!("⏪ Undid import, restored {} boxes", before.len());
        }
    }
}

/// Re-apply a previously undone command.
pub fn apply_redo(cmd: &Command, boxes: &mut Vec<BoundingBox>) {
    match cmd {
        Command::Add { index, bbox } => {
            let index = (*index).min(boxes.len());
            boxes.insert(index, bbox.clone());
            log::debug!("⏩ Redid add at {index}");
        }
        Command::Remove { index, .. } => {
            if *index < boxes.len() {
                boxes.remove(*index);
                log::debug!("⏩ Redid delete at {index}");
            }
        }
        Command::Move { index, to, .. } => {
            if let Some(bbox) = boxes.get_mut(*index) {
                bbox.x = to.0;
                bbox.y = to.1;
                log::debug!("⏩ Redid move at {index}");
            }
        }
        Command::Resize { index, to, .. } => {
            if let Some(bbox) = boxes.get_mut(*index) {
                bbox.width = to.0;
                bbox.height = to.1;
                log::debug!("⏩ Redid resize at {index}");
            }
        }
        Command::Relabel { index, to, .. } => {
            if let Some(bbox) = boxes.get_mut(*index) {
                bbox.label = to.clone();
                log::debug!("⏩ Redid relabel at {index}");
            }
        }
        Command::Replace { after, .. } => {
            *boxes = after.clone();
            log::debug!("⏩ Redid import of {} boxes", after.len());
        }
    }
}

/// The undo/redo history.
///
/// Two stacks with the most recent command at the end. Recording a new
/// command clears the redo stack; undo moves a command across to redo and
/// vice versa. History depth is bounded, dropping the oldest entries.
#[derive(Debug, Clone)]
pub struct UndoStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    max_history: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::with_limit(history::MAX_STEPS)
    }
}

impl UndoStack {
    /// Create an empty stack with the default history depth.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack holding at most `limit` undoable steps.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history: limit,
        }
    }

    /// Change the history cap, dropping the oldest steps if the stack is
    /// already over it.
    pub fn set_limit(&mut self, limit: usize) {
        self.max_history = limit;
        while self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    /// Record a completed command. Clears the redo stack: a fresh edit
    /// invalidates the redone future.
    pub fn push(&mut self, command: Command) {
        log::debug!("📝 Recorded '{}'", command.description());
        self.undo_stack.push(command);
        self.redo_stack.clear();

        while self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Move the most recent command to the redo stack and return it.
    pub fn pop_undo(&mut self) -> Option<Command> {
        let cmd = self.undo_stack.pop()?;
        log::debug!("⏪ Undo: '{}'", cmd.description());
        self.redo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Move the most recently undone command back and return it.
    pub fn pop_redo(&mut self) -> Option<Command> {
        let cmd = self.redo_stack.pop()?;
        log::debug!("⏩ Redo: '{}'", cmd.description());
        self.undo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Description of the command `undo` would reverse next.
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Description of the command `redo` would reapply next.
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Drop all history, both directions.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("🗑️ Edit history cleared");
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
