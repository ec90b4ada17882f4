use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::definition::{sanitize_against_known_keys, ColumnKey, ViewDefinition};
use crate::domain::entities::saved_view::{
    NewSavedView, SavedView, ViewId, ViewPatch, ViewVisibility,
};
use crate::domain::surface::moveable::MoveableSurface;
use crate::error::{Result, ViewError};
use crate::usecase::ports::host::{GridHost, PickerUpdate, Presentation};
use crate::usecase::ports::last_used::LastUsedStore;
use crate::usecase::ports::repo::{RepoError, SavedViewRepository};
use crate::usecase::services::pipeline::{activate, ActivateOptions};
use crate::usecase::services::registry::{GridRegistry, GridRuntimeState, SharedGridState};
use crate::usecase::services::selection::{
    fallback_selection, resolve_selection, FallbackPolicy, Selection, SelectionSource,
};
use crate::usecase::services::sequence::RequestToken;

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub entity_name: String,
    pub fallback: FallbackPolicy,
}

impl GridConfig {
    pub fn new(entity_name: impl Into<String>) -> Self {
        GridConfig {
            entity_name: entity_name.into(),
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_fallback_label(mut self, label: impl Into<String>) -> Self {
        self.fallback.label = label.into();
        self
    }

    pub fn with_fallback_definition(mut self, definition: ViewDefinition) -> Self {
        self.fallback.definition = Some(definition);
        self
    }

    pub fn with_first_view_fallback(mut self, enabled: bool) -> Self {
        self.fallback.use_first_view = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.entity_name.trim().is_empty() {
            return Err(ViewError::Config("entity name is required".to_string()));
        }
        if self.fallback.label.trim().is_empty() {
            return Err(ViewError::Config("fallback label is required".to_string()));
        }
        Ok(())
    }
}

/// First half of the initial resolution; the default-view lookup happens
/// between `begin_resolution` and `finish_resolution`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    token: RequestToken,
    last_used: Option<ViewId>,
    needs_server_default: bool,
}

impl PendingResolution {
    /// False when the last-used view is already valid and wins outright.
    pub fn needs_server_default(&self) -> bool {
        self.needs_server_default
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRefresh {
    token: RequestToken,
}

/// Saved views for one entity, bound to the host grid that displays them.
pub struct SavedViewsGrid<H: GridHost> {
    config: GridConfig,
    host: H,
    repo: Arc<dyn SavedViewRepository>,
    last_used: Arc<dyn LastUsedStore>,
    state: SharedGridState,
}

impl<H: GridHost> SavedViewsGrid<H> {
    pub fn new(
        config: GridConfig,
        host: H,
        repo: Arc<dyn SavedViewRepository>,
        last_used: Arc<dyn LastUsedStore>,
    ) -> Result<Self> {
        config.validate()?;
        if host.surface().header_slots().is_empty() {
            return Err(ViewError::Config(format!(
                "grid for `{}` has no header columns",
                config.entity_name
            )));
        }

        Ok(Self {
            config,
            host,
            repo,
            last_used,
            state: SharedGridState::default(),
        })
    }

    pub fn register(&self, registry: &mut GridRegistry) {
        registry.register(&self.config.entity_name, self.state.clone());
    }

    pub fn entity_name(&self) -> &str {
        &self.config.entity_name
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> SharedGridState {
        self.state.clone()
    }

    pub fn snapshot(&self) -> GridRuntimeState {
        self.state.borrow().clone()
    }

    pub fn views(&self) -> Vec<SavedView> {
        self.state.borrow().views.clone()
    }

    pub fn current_view_id(&self) -> Option<ViewId> {
        self.state.borrow().current_view_id
    }

    pub fn current_name(&self) -> String {
        self.state.borrow().current_name.clone()
    }

    pub fn fallback_applied(&self) -> bool {
        self.state.borrow().fallback_applied
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().is_disposed()
    }

    pub fn dispose(&mut self) {
        self.state.borrow_mut().dispose();
        info!(entity = %self.config.entity_name, "saved views grid closed");
    }

    /// Lists views and applies the initial selection. A failed listing is
    /// not fatal: the grid starts on the fallback view.
    pub fn load(&mut self) -> Result<SelectionSource> {
        self.ensure_open()?;
        match self.refresh() {
            Ok(()) => {}
            Err(ViewError::Remote(err)) => {
                warn!(entity = %self.config.entity_name, error = %err, "listing saved views failed");
            }
            Err(err) => return Err(err),
        }
        self.resolve_initial()
    }

    pub fn begin_refresh(&mut self) -> PendingRefresh {
        PendingRefresh {
            token: self.state.borrow_mut().listing_gate.issue(),
        }
    }

    /// Stores a listing unless a newer request superseded it. Returns
    /// whether the listing was applied.
    pub fn finish_refresh(
        &mut self,
        pending: PendingRefresh,
        listing: std::result::Result<Vec<SavedView>, RepoError>,
    ) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        if state.is_disposed() || !state.listing_gate.is_current(pending.token) {
            warn!(entity = %self.config.entity_name, "discarding stale saved view listing");
            return Ok(false);
        }
        state.views = listing?;
        Ok(true)
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.ensure_open()?;
        let pending = self.begin_refresh();
        let listing = self.repo.list_views(&self.config.entity_name);
        self.finish_refresh(pending, listing).map(|_| ())
    }

    pub fn begin_resolution(&mut self) -> PendingResolution {
        let last_used = match self.last_used.load(&self.config.entity_name) {
            Ok(id) => id,
            Err(err) => {
                warn!(entity = %self.config.entity_name, error = %err, "reading last used view failed");
                None
            }
        };

        let mut state = self.state.borrow_mut();
        let last_used_valid = last_used.is_some_and(|id| state.find_view(id).is_some());
        PendingResolution {
            token: state.selection_gate.issue(),
            last_used,
            needs_server_default: !last_used_valid,
        }
    }

    /// Completes the precedence chain and activates the winner. A failed
    /// default lookup counts as "no server default". Returns `None` when
    /// the resolution was superseded or the grid closed meanwhile.
    pub fn finish_resolution(
        &mut self,
        pending: PendingResolution,
        default_lookup: std::result::Result<Option<ViewId>, RepoError>,
    ) -> Option<SelectionSource> {
        {
            let state = self.state.borrow();
            if state.is_disposed() || !state.selection_gate.is_current(pending.token) {
                warn!(entity = %self.config.entity_name, "discarding stale view resolution");
                return None;
            }
        }

        let server_default = match default_lookup {
            Ok(id) => id,
            Err(err) => {
                warn!(entity = %self.config.entity_name, error = %err, "default view lookup failed");
                None
            }
        };

        let views = self.views();
        if let Some(stale) = pending.last_used {
            if !views.iter().any(|view| view.id == stale) {
                self.forget_last_used();
            }
        }

        let known_keys = self.host.all_column_keys();
        let selection = resolve_selection(
            &views,
            pending.last_used,
            server_default,
            &self.config.fallback,
            &known_keys,
        );
        let source = selection.source;
        self.apply_selection(selection, ActivateOptions::default());
        Some(source)
    }

    pub fn resolve_initial(&mut self) -> Result<SelectionSource> {
        self.ensure_open()?;
        let pending = self.begin_resolution();
        let lookup = if pending.needs_server_default() {
            self.repo.default_view_id(&self.config.entity_name)
        } else {
            Ok(None)
        };
        self.finish_resolution(pending, lookup)
            .ok_or_else(|| ViewError::Disposed(self.config.entity_name.clone()))
    }

    /// Picker selection of a stored view.
    pub fn select_view(&mut self, id: ViewId) -> Result<()> {
        self.ensure_open()?;
        let view = self
            .state
            .borrow()
            .find_view(id)
            .cloned()
            .ok_or(ViewError::UnknownView(id))?;
        self.activate_stored(
            view.id,
            &view.name,
            &view.definition,
            ActivateOptions {
                preserve_picker_value: true,
                ..ActivateOptions::default()
            },
        );
        Ok(())
    }

    /// Explicit return to the fallback view. Forgets the last used view,
    /// unless the fallback is itself a stored view (first-view policy), which
    /// is then recorded like any other stored activation.
    pub fn reset_to_fallback(&mut self) -> Result<()> {
        self.ensure_open()?;
        let known_keys = self.host.all_column_keys();
        let selection = fallback_selection(&self.views(), &self.config.fallback, &known_keys);
        let is_stored = selection.view_id.is_some();
        self.apply_selection(selection, ActivateOptions::default());
        if !is_stored {
            self.forget_last_used();
        }
        Ok(())
    }

    /// Activates a definition pushed from outside the saved view list.
    pub fn apply_external(
        &mut self,
        definition: &ViewDefinition,
        name: &str,
    ) -> Result<ViewDefinition> {
        self.ensure_open()?;
        let sanitized = self.run_activation(None, name, definition, ActivateOptions::default());
        self.state.borrow_mut().fallback_applied = false;
        Ok(sanitized)
    }

    /// Columns-editor result: new column selection on top of the host's
    /// current state, keeping the current view identity.
    pub fn apply_columns_edit(
        &mut self,
        columns: Vec<ColumnKey>,
        columns_order: Vec<ColumnKey>,
    ) -> Result<ViewDefinition> {
        self.ensure_open()?;
        let definition = ViewDefinition {
            columns,
            columns_order,
            ..self.host.current_state()
        };
        let (view_id, name, fallback_applied) = {
            let state = self.state.borrow();
            (
                state.current_view_id,
                state.current_name.clone(),
                state.fallback_applied,
            )
        };
        let sanitized = self.run_activation(
            view_id,
            &name,
            &definition,
            ActivateOptions {
                preserve_picker_value: true,
                from_columns_modal: true,
            },
        );
        self.state.borrow_mut().fallback_applied = fallback_applied;
        Ok(sanitized)
    }

    /// Saves the host's current state as a new view.
    pub fn save_as(
        &mut self,
        name: &str,
        visibility: ViewVisibility,
        set_as_default: bool,
    ) -> Result<ViewId> {
        let definition = self.host.current_state();
        self.create(name, definition, visibility, set_as_default)
    }

    pub fn create(
        &mut self,
        name: &str,
        definition: ViewDefinition,
        visibility: ViewVisibility,
        set_as_default: bool,
    ) -> Result<ViewId> {
        self.ensure_open()?;
        let name = validate_name(name)?;
        let known_keys = self.host.all_column_keys();
        let definition = sanitize_against_known_keys(&definition, &known_keys);

        let created = self.repo.create_view(NewSavedView {
            entity_name: self.config.entity_name.clone(),
            name,
            visibility,
            definition,
        })?;
        info!(entity = %self.config.entity_name, view_id = %created.id, "saved view created");

        if set_as_default {
            self.repo
                .set_default_view(&self.config.entity_name, Some(created.id))?;
        }
        self.refresh()?;

        let view = self
            .state
            .borrow()
            .find_view(created.id)
            .cloned()
            .unwrap_or(created);
        self.activate_stored(
            view.id,
            &view.name,
            &view.definition,
            ActivateOptions::default(),
        );
        Ok(view.id)
    }

    /// Persists a new name and/or definition. Does not re-activate.
    pub fn update(
        &mut self,
        id: ViewId,
        name: Option<&str>,
        definition: Option<ViewDefinition>,
    ) -> Result<SavedView> {
        self.ensure_open()?;
        let name = name.map(validate_name).transpose()?;
        let known_keys = self.host.all_column_keys();
        let definition =
            definition.map(|definition| sanitize_against_known_keys(&definition, &known_keys));

        let updated = self.repo.update_view(id, ViewPatch { name, definition })?;
        info!(entity = %self.config.entity_name, view_id = %id, "saved view updated");
        self.refresh()?;

        let is_current = self.current_view_id() == Some(id);
        if is_current {
            self.state.borrow_mut().current_name = updated.name.clone();
            self.host.present(&Presentation {
                label: updated.name.clone(),
                picker: PickerUpdate::Preserve,
            });
        }
        Ok(updated)
    }

    pub fn rename(&mut self, id: ViewId, name: &str) -> Result<SavedView> {
        self.update(id, Some(name), None)
    }

    /// Overwrites the current view with the host's current state.
    pub fn save_current(&mut self) -> Result<SavedView> {
        let id = self
            .current_view_id()
            .ok_or_else(|| ViewError::Validation("no saved view is selected".to_string()))?;
        let definition = self.host.current_state();
        self.update(id, None, Some(definition))
    }

    /// Deletes a view, forgets the last used view, and resolves again. A
    /// failed re-list keeps the previous listing minus the deleted view.
    pub fn remove(&mut self, id: ViewId) -> Result<SelectionSource> {
        self.ensure_open()?;
        self.repo.delete_view(id)?;
        info!(entity = %self.config.entity_name, view_id = %id, "saved view deleted");

        {
            let mut state = self.state.borrow_mut();
            state.views.retain(|view| view.id != id);
            if state.current_view_id == Some(id) {
                state.current_view_id = None;
                state.current_name.clear();
            }
        }
        self.forget_last_used();
        match self.refresh() {
            Ok(()) => {}
            Err(ViewError::Remote(err)) => {
                warn!(entity = %self.config.entity_name, error = %err, "listing saved views after delete failed");
            }
            Err(err) => return Err(err),
        }
        self.resolve_initial()
    }

    /// Marks `id` as the entity's default (or clears it). The current view
    /// does not change.
    pub fn set_default(&mut self, id: Option<ViewId>) -> Result<()> {
        self.ensure_open()?;
        if let Some(id) = id {
            if self.state.borrow().find_view(id).is_none() {
                return Err(ViewError::UnknownView(id));
            }
        }
        self.repo.set_default_view(&self.config.entity_name, id)?;
        info!(entity = %self.config.entity_name, view_id = ?id, "default view set");
        self.refresh()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(ViewError::Disposed(self.config.entity_name.clone()));
        }
        Ok(())
    }

    fn apply_selection(&mut self, selection: Selection, options: ActivateOptions) {
        match selection.view_id {
            Some(id) => self.activate_stored(id, &selection.name, &selection.definition, options),
            None => {
                self.run_activation(None, &selection.name, &selection.definition, options);
                self.state.borrow_mut().fallback_applied = true;
            }
        }
    }

    fn activate_stored(
        &mut self,
        id: ViewId,
        name: &str,
        definition: &ViewDefinition,
        options: ActivateOptions,
    ) {
        self.run_activation(Some(id), name, definition, options);
        self.state.borrow_mut().fallback_applied = false;
        if let Err(err) = self.last_used.store(&self.config.entity_name, id) {
            warn!(entity = %self.config.entity_name, error = %err, "storing last used view failed");
        }
    }

    fn run_activation(
        &mut self,
        view_id: Option<ViewId>,
        name: &str,
        definition: &ViewDefinition,
        options: ActivateOptions,
    ) -> ViewDefinition {
        let sanitized = activate(&mut self.host, view_id, name, definition, options);
        let mut state = self.state.borrow_mut();
        // A pending resolution must not override what was just shown.
        state.selection_gate.invalidate();
        state.current_view_id = view_id;
        state.current_name = name.to_string();
        state.applied_definition = Some(sanitized.clone());
        info!(entity = %self.config.entity_name, ?view_id, name, "view applied");
        sanitized
    }

    fn forget_last_used(&self) {
        if let Err(err) = self.last_used.clear(&self.config.entity_name) {
            warn!(entity = %self.config.entity_name, error = %err, "clearing last used view failed");
        }
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ViewError::Validation("view name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
