//! Undo/Redo History for World Edits
//!
//! Records world mutations in batches and allows stepping backwards and
//! forwards through them.
//!
//! # Usage
//!
//! ```ignore
//! use terra_clone::world::{UndoStack, EditBatch, WorldEdit};
//!
//! let mut stack = UndoStack::new();
//! stack.push(EditBatch::new(vec![WorldEdit::SetSolid { coord: IVec3::ZERO }]));
//!
//! if let Some(batch) = stack.undo() {
//!     // Apply inverse of batch to the world
//! }
//! ```

use glam::IVec3;

use super::orientation::{FlipMode, Orientation};

// ============================================================================
// TYPES
// ============================================================================

/// A single reversible world mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEdit {
    /// A cell became solid.
    SetSolid { coord: IVec3 },

    /// A cell became air.
    UnsetSolid { coord: IVec3 },

    /// An object was placed.
    PlaceObject {
        prefab: String,
        coord: IVec3,
        orientation: Orientation,
        flip: FlipMode,
        growth: f32,
    },

    /// An object was deleted (kept in full so it can be placed again).
    DeleteObject {
        prefab: String,
        coord: IVec3,
        orientation: Orientation,
        flip: FlipMode,
        growth: f32,
    },
}

impl WorldEdit {
    /// The edit that reverses this one.
    pub fn inverse(&self) -> WorldEdit {
        match self {
            WorldEdit::SetSolid { coord } => WorldEdit::UnsetSolid { coord: *coord },
            WorldEdit::UnsetSolid { coord } => WorldEdit::SetSolid { coord: *coord },
            WorldEdit::PlaceObject {
                prefab,
                coord,
                orientation,
                flip,
                growth,
            } => WorldEdit::DeleteObject {
                prefab: prefab.clone(),
                coord: *coord,
                orientation: *orientation,
                flip: *flip,
                growth: *growth,
            },
            WorldEdit::DeleteObject {
                prefab,
                coord,
                orientation,
                flip,
                growth,
            } => WorldEdit::PlaceObject {
                prefab: prefab.clone(),
                coord: *coord,
                orientation: *orientation,
                flip: *flip,
                growth: *growth,
            },
        }
    }
}

/// Edits recorded between one `batch_start` and its `batch_stop`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBatch {
    pub edits: Vec<WorldEdit>,
}

impl EditBatch {
    pub fn new(edits: Vec<WorldEdit>) -> Self {
        Self { edits }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Inverse batch: every edit inverted, in reverse order.
    pub fn inverse(&self) -> EditBatch {
        EditBatch {
            edits: self.edits.iter().rev().map(WorldEdit::inverse).collect(),
        }
    }
}

// ============================================================================
// UNDO STACK
// ============================================================================

/// Maximum number of batches stored in the undo stack.
/// When exceeded, the oldest batches are dropped.
const MAX_UNDO_SIZE: usize = 50;

/// A bounded undo/redo stack of [`EditBatch`]es.
///
/// Pushing a new batch after undoing discards the redo history.
#[derive(Debug)]
pub struct UndoStack {
    batches: Vec<EditBatch>,
    /// Batches at `[0..cursor]` are undoable, `[cursor..len]` are redoable.
    cursor: usize,
    max_size: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoStack {
    /// Create a new empty undo stack with the default max size (50).
    pub fn new() -> Self {
        Self {
            batches: Vec::new(),
            cursor: 0,
            max_size: MAX_UNDO_SIZE,
        }
    }

    /// Push a new batch. Empty batches are ignored.
    pub fn push(&mut self, batch: EditBatch) {
        if batch.is_empty() {
            return;
        }

        self.batches.truncate(self.cursor);
        self.batches.push(batch);
        self.cursor = self.batches.len();

        if self.batches.len() > self.max_size {
            let excess = self.batches.len() - self.max_size;
            self.batches.drain(0..excess);
            self.cursor = self.batches.len();
        }
    }

    /// Step back. Returns the batch whose inverse must be applied.
    pub fn undo(&mut self) -> Option<&EditBatch> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.batches[self.cursor])
    }

    /// Step forward. Returns the batch that must be re-applied.
    pub fn redo(&mut self) -> Option<&EditBatch> {
        if self.cursor >= self.batches.len() {
            return None;
        }
        let batch = &self.batches[self.cursor];
        self.cursor += 1;
        Some(batch)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.batches.len()
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.batches.len() - self.cursor
    }

    pub fn clear(&mut self) {
        self.batches.clear();
        self.cursor = 0;
    }
}

// ============================================================================
// TESTS
// ============================================================================
