//! # Editor State
//!
//! Everything a history snapshot captures: all sections' trees, the active
//! section, the selection and the viewport. Cloning is cheap because the
//! trees are made of `Arc`-shared subtrees.

use pagesmith_model::{tree, Element, Forest, Section, Sections};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const HOME_SECTION_ID: &str = "home";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub canvas: CanvasSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub sections: Sections,
    pub active_section: String,
    pub selected: Option<String>,
    pub viewport: Viewport,
}

impl EditorState {
    /// Empty forest in a single home section, no selection
    pub fn new(canvas: CanvasSize) -> Self {
        let home = Section::home(HOME_SECTION_ID, "Home");
        Self {
            sections: Sections::from([(home.id.clone(), home)]),
            active_section: HOME_SECTION_ID.to_string(),
            selected: None,
            viewport: Viewport { zoom: 1.0, canvas },
        }
    }

    pub fn active(&self) -> Option<&Section> {
        self.sections.get(&self.active_section)
    }

    /// Forest of the active section
    pub fn elements(&self) -> &[Arc<Element>] {
        self.active()
            .map(|section| section.elements.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn set_elements(&mut self, elements: Forest) {
        if let Some(section) = self.sections.get_mut(&self.active_section) {
            section.elements = elements;
        }
    }

    pub fn find(&self, id: &str) -> Option<&Arc<Element>> {
        tree::find(self.elements(), id)
    }

    pub fn selected_element(&self) -> Option<&Arc<Element>> {
        self.selected.as_deref().and_then(|id| self.find(id))
    }

    pub fn home_id(&self) -> Option<&str> {
        pagesmith_model::home_section(&self.sections).map(|s| s.id.as_str())
    }
}
