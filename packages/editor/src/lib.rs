//! # Pagesmith Editor
//!
//! Core editing engine for the page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI: drag/drop, clicks, keystrokes           │
//! └─────────────────────────────────────────────┘
//!                     ↓ one Command per event
//! ┌─────────────────────────────────────────────┐
//! │ editor: dispatch + snapshot history         │
//! │  - Add guard (duplicate rapid-fire adds)    │
//! │  - Snapshot current state, then mutate      │
//! │  - Tree operations from pagesmith-model     │
//! └─────────────────────────────────────────────┘
//!                     ↓ new EditorState
//! ┌─────────────────────────────────────────────┐
//! │ UI re-render / compiler-html at publish     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Dispatch is the only writer**: nothing else replaces the tree
//! 2. **Whole-state history**: undo restores snapshots, never inverts commands
//! 3. **Linear timeline**: a new edit after undo discards the redo branch
//! 4. **Tolerant edits**: commands aimed at missing ids are silent no-ops
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagesmith_editor::{Editor, EditorConfig};
//! use pagesmith_model::{Element, ElementType};
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! editor.add(Element::new("draft", ElementType::Heading).with_prop("content", "Hello"))?;
//! editor.undo()?;
//! editor.redo()?;
//! ```

mod commands;
mod config;
mod editor;
mod errors;
mod guard;
mod state;
mod undo_stack;

pub use commands::{Command, Outcome};
pub use config::EditorConfig;
pub use editor::Editor;
pub use errors::EditorError;
pub use guard::AddGuard;
pub use state::{CanvasSize, EditorState, Viewport, HOME_SECTION_ID};
pub use undo_stack::{Snapshot, UndoStack};
