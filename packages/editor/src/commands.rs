//! # Editor Commands
//!
//! The command surface the surrounding UI drives the engine with.
//!
//! Commands are plain data. They serialize to tagged JSON so drag-and-drop
//! payloads and scripted edit sessions can carry them verbatim:
//!
//! ```json
//! { "type": "moveElement", "id": "3f2a91c0-4", "position": { "x": 120, "y": 40 } }
//! ```

use crate::EditorError;
use pagesmith_model::{Element, ElementPatch, Forest, Position, Sections, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Append a node (re-id'd) to the active section and select it
    AddElement { element: Element },

    /// Shallow-patch a node anywhere in the active tree
    UpdateElement { id: String, patch: ElementPatch },

    /// Remove a node and its subtree
    DeleteElement { id: String },

    /// Change the selection only
    SelectElement { id: Option<String> },

    MoveElement { id: String, position: Position },

    ResizeElement { id: String, size: Size },

    /// Replace the active top-level list (drag reordering, layer panel)
    ReorderElements { elements: Forest },

    SetZoom { zoom: f64 },

    SetCanvasSize { width: f64, height: f64 },

    /// Replace the active forest with canned template content
    LoadTemplate { elements: Forest },

    /// Replace every section with a saved project's
    LoadProject {
        sections: Sections,
        #[serde(default)]
        active_section: Option<String>,
    },

    ClearCanvas,

    AddSection { name: String },

    RemoveSection { id: String },

    SwitchSection { id: String },

    Undo,

    Redo,
}

impl Command {
    /// Parse a command carried by a drop or clipboard payload
    pub fn from_payload(payload: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddElement { .. } => "Add element",
            Command::UpdateElement { .. } => "Update element",
            Command::DeleteElement { .. } => "Delete element",
            Command::SelectElement { .. } => "Select element",
            Command::MoveElement { .. } => "Move element",
            Command::ResizeElement { .. } => "Resize element",
            Command::ReorderElements { .. } => "Reorder elements",
            Command::SetZoom { .. } => "Set zoom",
            Command::SetCanvasSize { .. } => "Set canvas size",
            Command::LoadTemplate { .. } => "Load template",
            Command::LoadProject { .. } => "Load project",
            Command::ClearCanvas => "Clear canvas",
            Command::AddSection { .. } => "Add section",
            Command::RemoveSection { .. } => "Remove section",
            Command::SwitchSection { .. } => "Switch section",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
        }
    }
}

/// What a dispatch did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Nothing matched (unknown id, empty history, ...)
    Unchanged,
    /// Rejected as a duplicate rapid-fire add
    Debounced,
}
