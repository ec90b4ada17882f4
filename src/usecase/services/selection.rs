use crate::domain::entities::definition::{ColumnKey, ViewDefinition};
use crate::domain::entities::saved_view::{SavedView, ViewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    LastUsed,
    ServerDefault,
    Fallback,
}

/// The view chosen for activation.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub source: SelectionSource,
    pub view_id: Option<ViewId>,
    pub name: String,
    pub definition: ViewDefinition,
}

impl Selection {
    fn stored(source: SelectionSource, view: &SavedView) -> Self {
        Selection {
            source,
            view_id: Some(view.id),
            name: view.name.clone(),
            definition: view.definition.clone(),
        }
    }
}

/// How to build the selection when no stored view applies.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPolicy {
    pub label: String,
    pub definition: Option<ViewDefinition>,
    pub use_first_view: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackPolicy {
            label: "Default".to_string(),
            definition: None,
            use_first_view: false,
        }
    }
}

/// Fallback only: a supplied definition, else the first listed view when the
/// policy allows it, else every known column visible.
pub fn fallback_selection(
    views: &[SavedView],
    policy: &FallbackPolicy,
    known_keys: &[ColumnKey],
) -> Selection {
    if let Some(definition) = policy.definition.as_ref() {
        return Selection {
            source: SelectionSource::Fallback,
            view_id: None,
            name: policy.label.clone(),
            definition: definition.clone(),
        };
    }

    if policy.use_first_view {
        if let Some(first) = views.first() {
            return Selection::stored(SelectionSource::Fallback, first);
        }
    }

    Selection {
        source: SelectionSource::Fallback,
        view_id: None,
        name: policy.label.clone(),
        definition: ViewDefinition::all_columns(known_keys),
    }
}

/// Precedence chain: last used, then server default, then fallback. A
/// candidate only counts if it names a view in `views`.
pub fn resolve_selection(
    views: &[SavedView],
    last_used: Option<ViewId>,
    server_default: Option<ViewId>,
    policy: &FallbackPolicy,
    known_keys: &[ColumnKey],
) -> Selection {
    let find = |id: Option<ViewId>| id.and_then(|id| views.iter().find(|view| view.id == id));

    if let Some(view) = find(last_used) {
        return Selection::stored(SelectionSource::LastUsed, view);
    }
    if let Some(view) = find(server_default) {
        return Selection::stored(SelectionSource::ServerDefault, view);
    }
    fallback_selection(views, policy, known_keys)
}
