//! # Undo/Redo Stack
//!
//! Linear history of whole-state snapshots.
//!
//! ## Design
//!
//! - The state *before* each mutating command is pushed as a snapshot
//! - Undo swaps the current state for the most recent snapshot and keeps the
//!   current one on the redo stack
//! - Redo swaps it back
//! - New snapshots clear the redo stack (no branching timeline)
//!
//! Restoration never replays or inverts commands, so undo is correct for any
//! command regardless of its complexity. Memory per entry stays small because
//! snapshots share unchanged subtrees.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! stack.push(state.clone(), "Add element");
//! state = apply(state);
//!
//! if let Some(previous) = stack.undo(&state) {
//!     state = previous;
//! }
//! ```

use crate::EditorState;

/// One captured state plus what produced the change after it
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: EditorState,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct UndoStack {
    /// States before each applied command (most recent last)
    undo_stack: Vec<Snapshot>,

    /// States left behind by undo (most recent last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the state a command is about to replace
    pub fn push(&mut self, before: EditorState, description: &'static str) {
        self.undo_stack.push(Snapshot {
            state: before,
            description,
        });

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the future
        self.redo_stack.clear();
    }

    /// Step back one snapshot. Returns the state to restore.
    pub fn undo(&mut self, current: &EditorState) -> Option<EditorState> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot {
            state: current.clone(),
            description: snapshot.description,
        });
        Some(snapshot.state)
    }

    /// Step forward one snapshot. Returns the state to restore.
    pub fn redo(&mut self, current: &EditorState) -> Option<EditorState> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(Snapshot {
            state: current.clone(),
            description: snapshot.description,
        });
        Some(snapshot.state)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Position of the cursor in the linear history
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_description(&self) -> Option<&'static str> {
        self.undo_stack.last().map(|s| s.description)
    }

    pub fn redo_description(&self) -> Option<&'static str> {
        self.redo_stack.last().map(|s| s.description)
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CanvasSize;

    fn state_with_zoom(zoom: f64) -> EditorState {
        let mut state = EditorState::new(CanvasSize {
            width: 1450.0,
            height: 900.0,
        });
        state.viewport.zoom = zoom;
        state
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_then_redo_restores_states() {
        let mut stack = UndoStack::new();
        let before = state_with_zoom(1.0);
        let after = state_with_zoom(2.0);

        stack.push(before.clone(), "Zoom");
        assert_eq!(stack.undo_description(), Some("Zoom"));

        let restored = stack.undo(&after).unwrap();
        assert_eq!(restored, before);
        assert_eq!(stack.redo_levels(), 1);
        assert_eq!(stack.redo_description(), Some("Zoom"));

        let redone = stack.redo(&restored).unwrap();
        assert_eq!(redone, after);
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_empty_stack_returns_none() {
        let mut stack = UndoStack::new();
        let state = state_with_zoom(1.0);
        assert!(stack.undo(&state).is_none());
        assert!(stack.redo(&state).is_none());
    }

    #[test]
    fn test_new_push_clears_redo() {
        let mut stack = UndoStack::new();
        stack.push(state_with_zoom(1.0), "a");
        stack.undo(&state_with_zoom(2.0));
        assert_eq!(stack.redo_levels(), 1);

        stack.push(state_with_zoom(1.0), "b");
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut stack = UndoStack::with_max_levels(2);
        for i in 0..3 {
            stack.push(state_with_zoom(i as f64), "step");
        }
        assert_eq!(stack.undo_levels(), 2);

        // Oldest snapshot was dropped
        let restored = stack.undo(&state_with_zoom(9.0)).unwrap();
        assert_eq!(restored.viewport.zoom, 2.0);
        let restored = stack.undo(&restored).unwrap();
        assert_eq!(restored.viewport.zoom, 1.0);
        assert!(!stack.can_undo());
    }
}
