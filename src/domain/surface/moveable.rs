use crate::domain::entities::definition::ColumnKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedSide {
    Left,
    Right,
}

/// One positional row of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRow {
    Header,
    Filter,
    Body(usize),
}

/// What the header knows about a column slot at its current position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    pub key: Option<ColumnKey>,
    pub fixed: Option<FixedSide>,
}

impl SlotInfo {
    pub fn keyed(key: impl Into<ColumnKey>) -> Self {
        SlotInfo {
            key: Some(key.into()),
            fixed: None,
        }
    }

    pub fn loose() -> Self {
        SlotInfo {
            key: None,
            fixed: None,
        }
    }

    pub fn fixed(side: FixedSide) -> Self {
        SlotInfo {
            key: None,
            fixed: Some(side),
        }
    }
}

/// A live table whose cell widgets can be relocated and shown/hidden in place.
///
/// Implementations must move the existing widget on `move_cell`, never
/// replace it: anything attached to a widget has to survive reconciliation.
/// The filter row and body rows carry no identity of their own; they are
/// aligned to the header by position.
pub trait MoveableSurface {
    /// Header slots in their current order.
    fn header_slots(&self) -> Vec<SlotInfo>;

    fn has_filter_row(&self) -> bool;

    fn body_row_count(&self) -> usize;

    fn cell_count(&self, row: SurfaceRow) -> usize;

    /// Removes the cell at `from` and reinserts it at `to`.
    fn move_cell(&mut self, row: SurfaceRow, from: usize, to: usize);

    fn set_visible(&mut self, row: SurfaceRow, index: usize, visible: bool);

    fn is_visible(&self, row: SurfaceRow, index: usize) -> bool;

    /// Header, then the filter row when present, then every body row.
    fn rows(&self) -> Vec<SurfaceRow> {
        let mut rows = vec![SurfaceRow::Header];
        if self.has_filter_row() {
            rows.push(SurfaceRow::Filter);
        }
        rows.extend((0..self.body_row_count()).map(SurfaceRow::Body));
        rows
    }
}
