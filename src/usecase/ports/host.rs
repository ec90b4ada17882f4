use crate::domain::entities::definition::{ColumnKey, ViewDefinition};
use crate::domain::entities::saved_view::ViewId;
use crate::domain::surface::moveable::MoveableSurface;

/// What the host receives when a view is activated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyRequest<'a> {
    pub view_id: Option<ViewId>,
    pub name: &'a str,
    pub definition: &'a ViewDefinition,
    pub from_columns_modal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerUpdate {
    /// Leave the picker showing whatever the user chose.
    Preserve,
    /// Select this entry; `None` is the fallback entry.
    Select(Option<ViewId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub label: String,
    pub picker: PickerUpdate,
}

/// The embedding page, as seen by the engine.
///
/// The host owns its rendering surface and may rebuild it from
/// `apply_state`; the engine re-shapes the columns afterwards.
pub trait GridHost {
    type Surface: MoveableSurface;

    fn surface(&self) -> &Self::Surface;
    fn surface_mut(&mut self) -> &mut Self::Surface;

    /// Known column universe. Queried again on every reconciliation.
    fn all_column_keys(&self) -> Vec<ColumnKey>;

    /// Snapshot of the host's current columns, order, filters, sort and search.
    fn current_state(&self) -> ViewDefinition;

    fn apply_state(&mut self, request: ApplyRequest<'_>);

    fn after_apply(&mut self) {}

    fn present(&mut self, _presentation: &Presentation) {}
}
