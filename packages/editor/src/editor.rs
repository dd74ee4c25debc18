//! # Editing Engine
//!
//! Single-threaded state machine around the current [`EditorState`].
//!
//! The only way to change the document is [`Editor::dispatch`]. Mutating
//! commands capture the current state as a snapshot *before* they run, so two
//! commands can never interleave against the same base state, and undo is a
//! plain state substitution.

use crate::guard::AddGuard;
use crate::{CanvasSize, Command, EditorConfig, EditorError, EditorState, Outcome, UndoStack};
use pagesmith_model::{
    ensure_single_home, slugify, tree, Element, ElementPatch, Forest, IdGenerator, Position,
    Section, Sections, Size,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 4.0;

pub struct Editor {
    state: EditorState,
    history: UndoStack,
    ids: IdGenerator,
    guard: AddGuard,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let canvas = CanvasSize {
            width: config.canvas_width,
            height: config.canvas_height,
        };
        Self {
            state: EditorState::new(canvas),
            history: UndoStack::with_max_levels(config.max_history),
            ids: IdGenerator::new(&config.resolve_session_key()),
            guard: AddGuard::new(Duration::from_millis(config.add_debounce_ms)),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Forest of the active section
    pub fn elements(&self) -> &[Arc<Element>] {
        self.state.elements()
    }

    pub fn sections(&self) -> &Sections {
        &self.state.sections
    }

    pub fn selected(&self) -> Option<&str> {
        self.state.selected.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&Arc<Element>> {
        self.state.find(id)
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Parse and dispatch a JSON command payload.
    ///
    /// A payload that does not parse leaves the state untouched.
    pub fn dispatch_payload(&mut self, payload: &str) -> Result<Outcome, EditorError> {
        let command = Command::from_payload(payload).map_err(|e| {
            warn!(error = %e, "Dropping malformed command payload");
            e
        })?;
        self.dispatch(command)
    }

    /// Run one command to completion
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, EditorError> {
        let name = command.name();
        let outcome = match command {
            Command::AddElement { element } => self.add_element(element),
            Command::UpdateElement { id, patch } => {
                self.edit_forest(name, &id, |forest| tree::update(forest, &id, &patch))
            }
            Command::DeleteElement { id } => self.delete_element(&id),
            Command::SelectElement { id } => {
                self.state.selected = id;
                Outcome::Applied
            }
            Command::MoveElement { id, position } => {
                self.edit_forest(name, &id, |forest| tree::reposition(forest, &id, position))
            }
            Command::ResizeElement { id, size } => {
                self.edit_forest(name, &id, |forest| tree::resize(forest, &id, size))
            }
            Command::ReorderElements { elements } => {
                match tree::reorder(self.state.elements(), &elements) {
                    Some(forest) => {
                        let mut next = self.state.clone();
                        next.set_elements(forest);
                        self.commit(name, next)
                    }
                    None => {
                        warn!("Ignoring reorder that is not a permutation of the top-level nodes");
                        Outcome::Unchanged
                    }
                }
            }
            Command::SetZoom { zoom } => {
                if !zoom.is_finite() {
                    return Err(EditorError::InvalidZoom(zoom));
                }
                self.state.viewport.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
                Outcome::Applied
            }
            Command::SetCanvasSize { width, height } => {
                let valid = |v: f64| v.is_finite() && v > 0.0;
                if !valid(width) || !valid(height) {
                    return Err(EditorError::InvalidCanvasSize { width, height });
                }
                self.state.viewport.canvas = CanvasSize { width, height };
                Outcome::Applied
            }
            Command::LoadTemplate { elements } => {
                let fresh: Forest = elements
                    .iter()
                    .map(|el| Arc::new(el.with_fresh_ids(&mut self.ids)))
                    .collect();
                let mut next = self.state.clone();
                next.set_elements(fresh);
                next.selected = None;
                self.commit(name, next)
            }
            Command::LoadProject {
                sections,
                active_section,
            } => self.load_project(sections, active_section)?,
            Command::ClearCanvas => {
                let mut next = self.state.clone();
                next.set_elements(Vec::new());
                next.selected = None;
                self.commit(name, next)
            }
            Command::AddSection { name: section_name } => self.add_section(section_name),
            Command::RemoveSection { id } => self.remove_section(&id)?,
            Command::SwitchSection { id } => {
                if self.state.sections.contains_key(&id) {
                    self.state.active_section = id;
                    self.state.selected = None;
                    Outcome::Applied
                } else {
                    Outcome::Unchanged
                }
            }
            Command::Undo => match self.history.undo(&self.state) {
                Some(previous) => {
                    self.state = previous;
                    Outcome::Applied
                }
                None => Outcome::Unchanged,
            },
            Command::Redo => match self.history.redo(&self.state) {
                Some(next) => {
                    self.state = next;
                    Outcome::Applied
                }
                None => Outcome::Unchanged,
            },
        };

        debug!(
            command = name,
            outcome = ?outcome,
            undo_levels = self.history.undo_levels(),
            "Dispatched command"
        );
        Ok(outcome)
    }

    // Convenience wrappers for the surrounding UI

    pub fn add(&mut self, element: Element) -> Result<Outcome, EditorError> {
        self.dispatch(Command::AddElement { element })
    }

    pub fn update(&mut self, id: &str, patch: ElementPatch) -> Result<Outcome, EditorError> {
        self.dispatch(Command::UpdateElement {
            id: id.to_string(),
            patch,
        })
    }

    pub fn delete(&mut self, id: &str) -> Result<Outcome, EditorError> {
        self.dispatch(Command::DeleteElement { id: id.to_string() })
    }

    pub fn select(&mut self, id: Option<&str>) -> Result<Outcome, EditorError> {
        self.dispatch(Command::SelectElement {
            id: id.map(str::to_string),
        })
    }

    pub fn reposition(&mut self, id: &str, position: Position) -> Result<Outcome, EditorError> {
        self.dispatch(Command::MoveElement {
            id: id.to_string(),
            position,
        })
    }

    pub fn resize(&mut self, id: &str, size: Size) -> Result<Outcome, EditorError> {
        self.dispatch(Command::ResizeElement {
            id: id.to_string(),
            size,
        })
    }

    pub fn undo(&mut self) -> Result<Outcome, EditorError> {
        self.dispatch(Command::Undo)
    }

    pub fn redo(&mut self) -> Result<Outcome, EditorError> {
        self.dispatch(Command::Redo)
    }

    fn add_element(&mut self, element: Element) -> Outcome {
        if !self
            .guard
            .admit(element.element_type, element.position, Instant::now())
        {
            debug!(element_type = %element.element_type, "Ignoring duplicate add");
            return Outcome::Debounced;
        }

        let fresh = element.with_fresh_ids(&mut self.ids);
        let id = fresh.id.clone();

        let mut next = self.state.clone();
        let mut forest = next.elements().to_vec();
        forest.push(Arc::new(fresh));
        next.set_elements(forest);
        next.selected = Some(id);
        self.commit("Add element", next)
    }

    fn delete_element(&mut self, id: &str) -> Outcome {
        let clears_selection = match (self.state.find(id), self.state.selected.as_deref()) {
            (Some(node), Some(selected)) => {
                node.id == selected || tree::contains(&node.children, selected)
            }
            _ => false,
        };

        let outcome = self.edit_forest("Delete element", id, |forest| tree::delete(forest, id));
        if outcome == Outcome::Applied && clears_selection {
            self.state.selected = None;
        }
        outcome
    }

    fn load_project(
        &mut self,
        mut sections: Sections,
        active_section: Option<String>,
    ) -> Result<Outcome, EditorError> {
        if sections.is_empty() {
            return Err(EditorError::EmptyProject);
        }
        ensure_single_home(&mut sections);

        let active = active_section
            .filter(|id| sections.contains_key(id))
            .or_else(|| pagesmith_model::home_section(&sections).map(|s| s.id.clone()))
            .ok_or(EditorError::EmptyProject)?;

        info!(sections = sections.len(), active = %active, "Loading project");

        // Kept ids must never be handed out again
        for section in sections.values() {
            self.ids.advance_past(std::iter::once(section.id.as_str()));
            tree::walk(&section.elements, &mut |node| {
                self.ids.advance_past(std::iter::once(node.id.as_str()))
            });
        }

        let mut next = self.state.clone();
        next.sections = sections;
        next.active_section = active;
        next.selected = None;
        self.guard.reset();
        Ok(self.commit("Load project", next))
    }

    fn add_section(&mut self, name: String) -> Outcome {
        let base = slugify(&name);
        let mut slug = base.clone();
        let mut n = 2;
        while self.state.sections.values().any(|s| s.slug == slug) {
            slug = format!("{}-{}", base, n);
            n += 1;
        }

        let mut section = Section::new(self.ids.new_id(), name);
        section.slug = slug;

        let mut next = self.state.clone();
        next.active_section = section.id.clone();
        next.selected = None;
        next.sections.insert(section.id.clone(), section);
        self.commit("Add section", next)
    }

    fn remove_section(&mut self, id: &str) -> Result<Outcome, EditorError> {
        let Some(section) = self.state.sections.get(id) else {
            return Ok(Outcome::Unchanged);
        };
        if section.is_home {
            return Err(EditorError::CannotRemoveHome(id.to_string()));
        }

        let mut next = self.state.clone();
        next.sections.remove(id);
        if next.active_section == id {
            next.active_section = next.home_id().unwrap_or_default().to_string();
            next.selected = None;
        }
        Ok(self.commit("Remove section", next))
    }

    /// Run a tree operation on the active forest; a miss is a silent no-op
    fn edit_forest(
        &mut self,
        description: &'static str,
        id: &str,
        op: impl FnOnce(&[Arc<Element>]) -> Option<Forest>,
    ) -> Outcome {
        match op(self.state.elements()) {
            Some(forest) => {
                let mut next = self.state.clone();
                next.set_elements(forest);
                self.commit(description, next)
            }
            None => {
                debug!(id = %id, command = description, "No element matched");
                Outcome::Unchanged
            }
        }
    }

    fn commit(&mut self, description: &'static str, next: EditorState) -> Outcome {
        let previous = std::mem::replace(&mut self.state, next);
        self.history.push(previous, description);
        Outcome::Applied
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_model::{Dimension, ElementType};

    fn editor() -> Editor {
        Editor::new(EditorConfig {
            add_debounce_ms: 0,
            ..EditorConfig::default().with_session_key("unit")
        })
    }

    #[test]
    fn test_initial_state() {
        let editor = editor();
        assert!(editor.elements().is_empty());
        assert!(editor.selected().is_none());
        assert_eq!(editor.state().viewport.zoom, 1.0);
        assert_eq!(editor.state().home_id(), Some("home"));
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_add_selects_new_node() {
        let mut editor = editor();
        editor.add(Element::new("draft", ElementType::Text)).unwrap();

        let id = editor.selected().unwrap().to_string();
        assert_ne!(id, "draft");
        assert_eq!(editor.elements()[0].id, id);
        assert_eq!(editor.history().undo_levels(), 1);
    }

    #[test]
    fn test_select_and_zoom_skip_history() {
        let mut editor = editor();
        editor.add(Element::new("d", ElementType::Text)).unwrap();
        let levels = editor.history().undo_levels();

        editor.select(None).unwrap();
        editor.dispatch(Command::SetZoom { zoom: 10.0 }).unwrap();
        editor
            .dispatch(Command::SetCanvasSize { width: 1024.0, height: 768.0 })
            .unwrap();

        assert_eq!(editor.history().undo_levels(), levels);
        assert_eq!(editor.state().viewport.zoom, MAX_ZOOM);
        assert_eq!(editor.state().viewport.canvas.width, 1024.0);
    }

    #[test]
    fn test_invalid_viewport_values_rejected() {
        let mut editor = editor();
        assert!(matches!(
            editor.dispatch(Command::SetZoom { zoom: f64::NAN }),
            Err(EditorError::InvalidZoom(_))
        ));
        assert!(editor
            .dispatch(Command::SetCanvasSize { width: 0.0, height: 10.0 })
            .is_err());
    }

    #[test]
    fn test_resize_and_move_both_record_history() {
        let mut editor = editor();
        editor.add(Element::new("d", ElementType::Rectangle)).unwrap();
        let id = editor.selected().unwrap().to_string();

        editor.reposition(&id, Position::new(10.0, 20.0)).unwrap();
        editor
            .resize(&id, Size::new(Dimension::Px(50.0), Dimension::Auto))
            .unwrap();
        assert_eq!(editor.history().undo_levels(), 3);

        editor.undo().unwrap();
        assert_eq!(editor.find(&id).unwrap().size, ElementType::Rectangle.default_size());
        assert_eq!(editor.find(&id).unwrap().position, Position::new(10.0, 20.0));
    }

    #[test]
    fn test_unknown_id_is_silent_noop() {
        let mut editor = editor();
        assert_eq!(editor.delete("ghost").unwrap(), Outcome::Unchanged);
        assert_eq!(
            editor.reposition("ghost", Position::default()).unwrap(),
            Outcome::Unchanged
        );
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_delete_clears_selection_inside_subtree() {
        let mut editor = editor();
        editor
            .add(Element::new("c", ElementType::Container).with_child(Element::new("t", ElementType::Text)))
            .unwrap();
        let container = editor.elements()[0].clone();
        let child_id = container.children[0].id.clone();

        editor.select(Some(&child_id)).unwrap();
        editor.delete(&container.id).unwrap();

        assert!(editor.selected().is_none());
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_duplicate_add_is_debounced() {
        let mut editor = Editor::new(EditorConfig {
            add_debounce_ms: 60_000,
            ..EditorConfig::default().with_session_key("guard")
        });
        let element = Element::new("d", ElementType::Button).with_position(5.0, 5.0);

        assert_eq!(editor.add(element.clone()).unwrap(), Outcome::Applied);
        assert_eq!(editor.add(element).unwrap(), Outcome::Debounced);
        assert_eq!(editor.elements().len(), 1);
    }

    #[test]
    fn test_sections_lifecycle() {
        let mut editor = editor();
        editor
            .dispatch(Command::AddSection { name: "About Us".into() })
            .unwrap();
        let about = editor.state().active_section.clone();
        assert_eq!(editor.sections()[&about].slug, "about-us");

        editor
            .dispatch(Command::AddSection { name: "About us".into() })
            .unwrap();
        let second = editor.state().active_section.clone();
        assert_eq!(editor.sections()[&second].slug, "about-us-2");

        assert!(matches!(
            editor.dispatch(Command::RemoveSection { id: "home".into() }),
            Err(EditorError::CannotRemoveHome(_))
        ));

        editor.dispatch(Command::RemoveSection { id: second }).unwrap();
        assert_eq!(editor.state().active_section, "home");

        editor.dispatch(Command::SwitchSection { id: about.clone() }).unwrap();
        assert_eq!(editor.state().active_section, about);
        assert_eq!(
            editor.dispatch(Command::SwitchSection { id: "missing".into() }).unwrap(),
            Outcome::Unchanged
        );
    }

    #[test]
    fn test_load_project_requires_sections() {
        let mut editor = editor();
        assert!(matches!(
            editor.dispatch(Command::LoadProject {
                sections: Sections::new(),
                active_section: None
            }),
            Err(EditorError::EmptyProject)
        ));
    }

    #[test]
    fn test_malformed_payload_leaves_state() {
        let mut editor = editor();
        editor.add(Element::new("d", ElementType::Text)).unwrap();
        let before = editor.state().clone();

        assert!(editor.dispatch_payload("{\"type\": \"addElement\"").is_err());
        assert_eq!(editor.state(), &before);
    }
}
