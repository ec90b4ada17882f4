use crate::domain::entities::definition::ColumnKey;
use crate::domain::surface::moveable::{FixedSide, MoveableSurface, SlotInfo, SurfaceRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: WidgetId,
    pub content: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSlot {
    pub key: Option<ColumnKey>,
    pub fixed: Option<FixedSide>,
    pub widget: Widget,
}

/// Column as declared by the host, in its natural (data) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: Option<ColumnKey>,
    pub fixed: Option<FixedSide>,
    pub label: String,
}

impl ColumnSpec {
    pub fn keyed(key: &str, label: &str) -> Self {
        ColumnSpec {
            key: Some(ColumnKey::from(key)),
            fixed: None,
            label: label.to_string(),
        }
    }

    pub fn loose(label: &str) -> Self {
        ColumnSpec {
            key: None,
            fixed: None,
            label: label.to_string(),
        }
    }

    pub fn fixed(side: FixedSide, label: &str) -> Self {
        ColumnSpec {
            key: None,
            fixed: Some(side),
            label: label.to_string(),
        }
    }
}

/// In-memory rendering surface: header, optional filter row, body rows.
///
/// Every widget gets a fresh `WidgetId` when built and keeps it for as long
/// as it lives; moves only change positions.
#[derive(Debug, Clone, Default)]
pub struct GridSurface {
    header: Vec<HeaderSlot>,
    filter: Option<Vec<Widget>>,
    body: Vec<Vec<Widget>>,
    next_id: u64,
}

impl GridSurface {
    pub fn new(columns: &[ColumnSpec], with_filter_row: bool, rows: &[Vec<String>]) -> Self {
        let mut surface = GridSurface::default();
        surface.rebuild(columns, with_filter_row, rows);
        surface
    }

    /// Throws away every widget and renders again in natural column order.
    pub fn rebuild(&mut self, columns: &[ColumnSpec], with_filter_row: bool, rows: &[Vec<String>]) {
        let header: Vec<HeaderSlot> = columns
            .iter()
            .map(|column| HeaderSlot {
                key: column.key.clone(),
                fixed: column.fixed,
                widget: self.widget(column.label.clone()),
            })
            .collect();
        let filter = with_filter_row.then(|| {
            columns
                .iter()
                .map(|_| self.widget(String::new()))
                .collect::<Vec<_>>()
        });
        self.header = header;
        self.filter = filter;
        self.body = Vec::new();
        for row in rows {
            self.push_row(row);
        }
    }

    /// Appends a body row laid out in natural column order. Missing cells
    /// render empty; extra cells are ignored.
    pub fn push_row(&mut self, cells: &[String]) {
        let width = self.header.len();
        let row: Vec<Widget> = (0..width)
            .map(|idx| self.widget(cells.get(idx).cloned().unwrap_or_default()))
            .collect();
        self.body.push(row);
    }

    pub fn header(&self) -> &[HeaderSlot] {
        &self.header
    }

    pub fn filter_row(&self) -> Option<&[Widget]> {
        self.filter.as_deref()
    }

    pub fn body(&self) -> &[Vec<Widget>] {
        &self.body
    }

    pub fn keyed_order(&self) -> Vec<ColumnKey> {
        self.header
            .iter()
            .filter(|slot| slot.fixed.is_none())
            .filter_map(|slot| slot.key.clone())
            .collect()
    }

    pub fn visible_keys(&self) -> Vec<ColumnKey> {
        self.header
            .iter()
            .filter(|slot| slot.fixed.is_none() && slot.widget.visible)
            .filter_map(|slot| slot.key.clone())
            .collect()
    }

    pub fn visible_labels(&self) -> Vec<&str> {
        self.header
            .iter()
            .filter(|slot| slot.widget.visible)
            .map(|slot| slot.widget.content.as_str())
            .collect()
    }

    fn widget(&mut self, content: String) -> Widget {
        self.next_id += 1;
        Widget {
            id: WidgetId(self.next_id),
            content,
            visible: true,
        }
    }

    fn row_widgets(&self, row: SurfaceRow) -> Option<Vec<&Widget>> {
        match row {
            SurfaceRow::Header => Some(self.header.iter().map(|slot| &slot.widget).collect()),
            SurfaceRow::Filter => self.filter.as_ref().map(|cells| cells.iter().collect()),
            SurfaceRow::Body(idx) => self.body.get(idx).map(|cells| cells.iter().collect()),
        }
    }

    fn widget_mut(&mut self, row: SurfaceRow, index: usize) -> Option<&mut Widget> {
        match row {
            SurfaceRow::Header => self.header.get_mut(index).map(|slot| &mut slot.widget),
            SurfaceRow::Filter => self.filter.as_mut().and_then(|cells| cells.get_mut(index)),
            SurfaceRow::Body(idx) => self.body.get_mut(idx).and_then(|cells| cells.get_mut(index)),
        }
    }
}

fn relocate<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

impl MoveableSurface for GridSurface {
    fn header_slots(&self) -> Vec<SlotInfo> {
        self.header
            .iter()
            .map(|slot| SlotInfo {
                key: slot.key.clone(),
                fixed: slot.fixed,
            })
            .collect()
    }

    fn has_filter_row(&self) -> bool {
        self.filter.is_some()
    }

    fn body_row_count(&self) -> usize {
        self.body.len()
    }

    fn cell_count(&self, row: SurfaceRow) -> usize {
        self.row_widgets(row).map(|cells| cells.len()).unwrap_or(0)
    }

    fn move_cell(&mut self, row: SurfaceRow, from: usize, to: usize) {
        match row {
            SurfaceRow::Header => relocate(&mut self.header, from, to),
            SurfaceRow::Filter => {
                if let Some(cells) = self.filter.as_mut() {
                    relocate(cells, from, to);
                }
            }
            SurfaceRow::Body(idx) => {
                if let Some(cells) = self.body.get_mut(idx) {
                    relocate(cells, from, to);
                }
            }
        }
    }

    fn set_visible(&mut self, row: SurfaceRow, index: usize, visible: bool) {
        if let Some(widget) = self.widget_mut(row, index) {
            widget.visible = visible;
        }
    }

    fn is_visible(&self, row: SurfaceRow, index: usize) -> bool {
        self.row_widgets(row)
            .and_then(|cells| cells.get(index).map(|widget| widget.visible))
            .unwrap_or(false)
    }
}
