use serde_json::Value;

use crate::domain::entities::definition::{ColumnKey, ViewDefinition};
use crate::domain::entities::saved_view::ViewId;
use crate::domain::surface::grid::{ColumnSpec, GridSurface};
use crate::domain::surface::moveable::FixedSide;
use crate::domain::surface::reconciler::apply_columns;
use crate::usecase::ports::host::{ApplyRequest, GridHost, PickerUpdate, Presentation};

pub const CONTACTS_ENTITY: &str = "contacts";

pub fn contact_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::fixed(FixedSide::Left, "☐"),
        ColumnSpec::keyed("id", "ID"),
        ColumnSpec::keyed("name", "Name"),
        ColumnSpec::keyed("email", "Email"),
        ColumnSpec::keyed("phone", "Phone"),
        ColumnSpec::keyed("company", "Company"),
        ColumnSpec::loose("Actions"),
        ColumnSpec::fixed(FixedSide::Right, "Open"),
    ]
}

pub fn sample_contacts() -> Vec<Vec<String>> {
    let rows = [
        ("1", "Ada Lovelace", "ada@analytical.io", "555-0101", "Analytical Engines"),
        ("2", "Grace Hopper", "grace@cobol.dev", "555-0102", "Navy Labs"),
        ("3", "Alan Turing", "alan@bletchley.uk", "555-0103", "Bletchley"),
        ("4", "Katherine Johnson", "kj@nasa.gov", "555-0104", "NASA"),
        ("5", "Linus Torvalds", "linus@kernel.org", "555-0105", "Linux Foundation"),
        ("6", "Margaret Hamilton", "mh@apollo.space", "555-0106", "NASA"),
    ];
    rows.iter()
        .map(|(id, name, email, phone, company)| {
            vec![
                String::new(),
                id.to_string(),
                name.to_string(),
                email.to_string(),
                phone.to_string(),
                company.to_string(),
                "Edit · Delete".to_string(),
                "›".to_string(),
            ]
        })
        .collect()
}

/// Desktop host for the contacts grid. Filters, sort and quick search are
/// interpreted here; every data change re-renders the surface.
pub struct ContactsHost {
    columns: Vec<ColumnSpec>,
    records: Vec<Vec<String>>,
    surface: GridSurface,
    filters: Vec<Value>,
    sort: Vec<Value>,
    page_size: u64,
    quick_search: String,
    layout: Option<ViewDefinition>,
    label: String,
    picker: Option<ViewId>,
}

impl ContactsHost {
    pub fn new(columns: Vec<ColumnSpec>, records: Vec<Vec<String>>) -> Self {
        let surface = GridSurface::new(&columns, true, &records);
        Self {
            columns,
            records,
            surface,
            filters: Vec::new(),
            sort: Vec::new(),
            page_size: 0,
            quick_search: String::new(),
            layout: None,
            label: String::new(),
            picker: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn picker(&self) -> Option<ViewId> {
        self.picker
    }

    pub fn quick_search(&self) -> &str {
        &self.quick_search
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column_label(&self, key: &ColumnKey) -> String {
        self.columns
            .iter()
            .find(|column| column.key.as_ref() == Some(key))
            .map(|column| column.label.clone())
            .unwrap_or_else(|| key.to_string())
    }

    /// Host-side search. Re-renders and restores the current layout itself.
    pub fn set_quick_search(&mut self, text: &str) {
        self.quick_search = text.to_string();
        self.render();
        if let Some(layout) = self.layout.clone() {
            let known_keys = self.all_column_keys();
            apply_columns(&mut self.surface, &layout, &known_keys);
        }
    }

    fn column_index(&self, key: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.key.as_ref().map(ColumnKey::as_str) == Some(key))
    }

    fn matches(&self, record: &[String]) -> bool {
        let needle = self.quick_search.trim().to_lowercase();
        if !needle.is_empty()
            && !record
                .iter()
                .any(|cell| cell.to_lowercase().contains(&needle))
        {
            return false;
        }

        self.filters.iter().all(|filter| {
            let key = filter.get("key").and_then(Value::as_str).unwrap_or_default();
            let value = filter
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_lowercase();
            match self.column_index(key) {
                Some(idx) => record
                    .get(idx)
                    .map(|cell| cell.to_lowercase().contains(&value))
                    .unwrap_or(false),
                None => true,
            }
        })
    }

    fn visible_records(&self) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = self
            .records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();

        for clause in self.sort.iter().rev() {
            let Some(idx) = clause
                .get("key")
                .and_then(Value::as_str)
                .and_then(|key| self.column_index(key))
            else {
                continue;
            };
            let descending = clause.get("dir").and_then(Value::as_str) == Some("desc");
            rows.sort_by(|a, b| {
                let ordering = a.get(idx).cmp(&b.get(idx));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        if self.page_size > 0 {
            rows.truncate(self.page_size as usize);
        }
        rows
    }

    /// Full re-render in natural column order.
    fn render(&mut self) {
        let rows = self.visible_records();
        self.surface.rebuild(&self.columns, true, &rows);
    }
}

impl GridHost for ContactsHost {
    type Surface = GridSurface;

    fn surface(&self) -> &GridSurface {
        &self.surface
    }

    fn surface_mut(&mut self) -> &mut GridSurface {
        &mut self.surface
    }

    fn all_column_keys(&self) -> Vec<ColumnKey> {
        self.columns
            .iter()
            .filter(|column| column.fixed.is_none())
            .filter_map(|column| column.key.clone())
            .collect()
    }

    fn current_state(&self) -> ViewDefinition {
        ViewDefinition {
            columns: self.surface.visible_keys(),
            columns_order: self.surface.keyed_order(),
            filters: self.filters.clone(),
            sort: self.sort.clone(),
            page_size: self.page_size,
            quick_search: self.quick_search.clone(),
        }
    }

    fn apply_state(&mut self, request: ApplyRequest<'_>) {
        self.filters = request.definition.filters.clone();
        self.sort = request.definition.sort.clone();
        self.page_size = request.definition.page_size;
        self.quick_search = request.definition.quick_search.clone();
        self.layout = Some(request.definition.clone());
        self.render();
    }

    fn present(&mut self, presentation: &Presentation) {
        self.label = presentation.label.clone();
        if let PickerUpdate::Select(id) = presentation.picker {
            self.picker = id;
        }
    }
}
