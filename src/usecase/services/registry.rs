use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::domain::entities::definition::ViewDefinition;
use crate::domain::entities::saved_view::{SavedView, ViewId};
use crate::usecase::services::sequence::RequestGate;

/// Per-grid state for one page session.
#[derive(Debug, Clone, Default)]
pub struct GridRuntimeState {
    pub views: Vec<SavedView>,
    pub current_view_id: Option<ViewId>,
    pub current_name: String,
    pub fallback_applied: bool,
    pub applied_definition: Option<ViewDefinition>,
    /// Initial resolutions; any view activation retires pending ones.
    pub(crate) selection_gate: RequestGate,
    /// View listings; independent of activations.
    pub(crate) listing_gate: RequestGate,
    pub(crate) disposed: bool,
}

impl GridRuntimeState {
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn find_view(&self, id: ViewId) -> Option<&SavedView> {
        self.views.iter().find(|view| view.id == id)
    }

    /// Retires outstanding requests; later completions are dropped.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.selection_gate.invalidate();
        self.listing_gate.invalidate();
    }
}

pub type SharedGridState = Rc<RefCell<GridRuntimeState>>;

/// Entity name → grid state, for pages that host several grids.
/// Registering an entity again replaces (and closes) the previous grid.
#[derive(Debug, Default)]
pub struct GridRegistry {
    entries: HashMap<String, SharedGridState>,
}

impl GridRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entity_name: &str, state: SharedGridState) {
        if let Some(previous) = self.entries.insert(entity_name.to_string(), state.clone()) {
            if !Rc::ptr_eq(&previous, &state) {
                previous.borrow_mut().dispose();
            }
        }
    }

    pub fn get(&self, entity_name: &str) -> Option<SharedGridState> {
        self.entries.get(entity_name).cloned()
    }

    pub fn remove(&mut self, entity_name: &str) -> Option<SharedGridState> {
        let removed = self.entries.remove(entity_name);
        if let Some(state) = removed.as_ref() {
            state.borrow_mut().dispose();
        }
        removed
    }

    pub fn entity_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reregistering_an_entity_closes_the_previous_grid() {
        let mut registry = GridRegistry::new();
        let first: SharedGridState = Rc::default();
        let second: SharedGridState = Rc::default();

        registry.register("leads", first.clone());
        registry.register("invoices", Rc::default());
        registry.register("leads", second.clone());

        assert!(first.borrow().is_disposed());
        assert!(!second.borrow().is_disposed());
        assert!(Rc::ptr_eq(&registry.get("leads").unwrap(), &second));
        assert_eq!(registry.entity_names(), vec!["invoices", "leads"]);

        registry.remove("leads");
        assert!(second.borrow().is_disposed());
        assert_eq!(registry.len(), 1);
    }
}
