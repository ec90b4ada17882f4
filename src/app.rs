use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use dioxus::prelude::*;
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::domain::entities::definition::ColumnKey;
use crate::domain::entities::saved_view::{ViewId, ViewVisibility};
use crate::domain::surface::grid::Widget;
use crate::error::ViewError;
use crate::infra::local::last_used::FileLastUsedStore;
use crate::infra::paths::AppPaths;
use crate::infra::sqlite::repo::SqliteViewRepo;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::host::{contact_columns, sample_contacts, ContactsHost, CONTACTS_ENTITY};
use crate::ui::state::app_state::AppState;
use crate::usecase::ports::host::GridHost;
use crate::usecase::ports::repo::SavedViewRepository;
use crate::usecase::services::store::{GridConfig, SavedViewsGrid};

const FALLBACK_OPTION_VALUE: &str = "__fallback__";

type SharedGrid = Rc<RefCell<SavedViewsGrid<ContactsHost>>>;

#[derive(Clone, Debug, PartialEq)]
struct CellView {
    id: u64,
    text: String,
    visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct ViewOption {
    value: String,
    label: String,
}

#[derive(Clone, Debug, PartialEq)]
struct ColumnToggle {
    key: ColumnKey,
    label: String,
    visible: bool,
}

/// Owned copy of what one render needs, so no `RefCell` borrow outlives it.
struct GridSnapshot {
    label: String,
    selected: String,
    options: Vec<ViewOption>,
    header: Vec<CellView>,
    filter: Vec<CellView>,
    rows: Vec<Vec<CellView>>,
    columns: Vec<ColumnToggle>,
    view_count: usize,
}

impl GridSnapshot {
    fn capture(grid: &SavedViewsGrid<ContactsHost>) -> Self {
        let host = grid.host();
        let surface = host.surface();
        let cell = |widget: &Widget| CellView {
            id: widget.id.0,
            text: widget.content.clone(),
            visible: widget.visible,
        };

        let views = grid.views();
        let mut options = vec![ViewOption {
            value: FALLBACK_OPTION_VALUE.to_string(),
            label: grid.config().fallback.label.clone(),
        }];
        options.extend(views.iter().map(|view| ViewOption {
            value: view.id.to_string(),
            label: match (view.is_default, view.visibility) {
                (true, ViewVisibility::Shared) => format!("{} (default, shared)", view.name),
                (true, ViewVisibility::Private) => format!("{} (default)", view.name),
                (false, ViewVisibility::Shared) => format!("{} (shared)", view.name),
                (false, ViewVisibility::Private) => view.name.clone(),
            },
        }));

        let visible = surface.visible_keys();
        let columns = surface
            .keyed_order()
            .into_iter()
            .map(|key| ColumnToggle {
                label: host.column_label(&key),
                visible: visible.contains(&key),
                key,
            })
            .collect();

        GridSnapshot {
            label: grid.current_name(),
            selected: grid
                .current_view_id()
                .map(|id| id.to_string())
                .unwrap_or_else(|| FALLBACK_OPTION_VALUE.to_string()),
            options,
            header: surface
                .header()
                .iter()
                .map(|slot| cell(&slot.widget))
                .collect(),
            filter: surface
                .filter_row()
                .map(|cells| cells.iter().map(cell).collect())
                .unwrap_or_default(),
            rows: surface
                .body()
                .iter()
                .map(|row| row.iter().map(cell).collect())
                .collect(),
            columns,
            view_count: views.len(),
        }
    }
}

fn open_grid() -> Result<SavedViewsGrid<ContactsHost>> {
    let paths = AppPaths::resolve()?;
    paths.ensure_dirs()?;

    let repo = Arc::new(SqliteViewRepo::new(paths.db_path.clone()));
    repo.init().map_err(|err| anyhow!(err.to_string()))?;
    let last_used = Arc::new(FileLastUsedStore::new(paths.last_used_dir.clone()));
    let host = ContactsHost::new(contact_columns(), sample_contacts());

    let mut grid = SavedViewsGrid::new(
        GridConfig::new(CONTACTS_ENTITY).with_fallback_label("All columns"),
        host,
        repo,
        last_used,
    )
    .map_err(|err| anyhow!(err.to_string()))?;
    grid.load().map_err(|err| anyhow!(err.to_string()))?;
    Ok(grid)
}

fn cell_style(visible: bool) -> String {
    let display = if visible { "" } else { "display: none;" };
    format!("border-bottom: 1px solid #eee; padding: 6px 10px; white-space: nowrap; {display}")
}

fn header_cell_style(visible: bool) -> String {
    let display = if visible { "" } else { "display: none;" };
    format!(
        "position: sticky; top: 0; background: #f6f7f9; border-bottom: 1px solid #ccc; padding: 6px 10px; text-align: left; {display}"
    )
}

fn report(status: &mut Signal<String>, action: &str, result: std::result::Result<(), ViewError>) {
    match result {
        Ok(()) => status.set(format!("{action}: done")),
        Err(err) => {
            status.set(format!("{action} failed: {err}"));
            if !matches!(err, ViewError::Validation(_)) {
                MessageDialog::new()
                    .set_level(MessageLevel::Error)
                    .set_title(action)
                    .set_description(err.to_string())
                    .set_buttons(MessageButtons::Ok)
                    .show();
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let AppState {
        mut status,
        mut revision,
        mut save_as_name,
        mut save_as_shared,
        mut save_as_default,
        mut rename_input,
        mut quick_search,
        mut show_column_editor,
    } = AppState::new();

    let grid = use_hook(|| open_grid().map(|grid| Rc::new(RefCell::new(grid))).map_err(|err| err.to_string()));
    let grid: SharedGrid = match grid {
        Ok(grid) => grid,
        Err(err) => {
            return rsx! {
                div {
                    p { "Unable to open saved views: {err}" }
                }
            };
        }
    };

    let _ = revision();
    let snapshot = GridSnapshot::capture(&grid.borrow());
    let current_label = snapshot.label.clone();
    let view_count = snapshot.view_count;

    let grid_for_pick = grid.clone();
    let grid_for_save_as = grid.clone();
    let grid_for_save_current = grid.clone();
    let grid_for_rename = grid.clone();
    let grid_for_default = grid.clone();
    let grid_for_delete = grid.clone();
    let grid_for_search = grid.clone();
    let grid_for_columns = grid.clone();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100vh; font-family: sans-serif;",
            nav {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; padding: 8px;",
                span { "View:" }
                select {
                    onchange: move |event| {
                        let value = event.value();
                        let result = if value == FALLBACK_OPTION_VALUE {
                            run_blocking(|| grid_for_pick.borrow_mut().reset_to_fallback())
                        } else {
                            match value.parse::<ViewId>() {
                                Ok(id) => run_blocking(|| grid_for_pick.borrow_mut().select_view(id)),
                                Err(_) => return,
                            }
                        };
                        report(&mut status, "Switch view", result);
                        *revision.write() += 1;
                    },
                    {snapshot.options.iter().map(|opt| {
                        let value = opt.value.clone();
                        let label = opt.label.clone();
                        let is_selected = value == snapshot.selected;
                        rsx!(
                            option { value: "{value}", selected: is_selected, "{label}" }
                        )
                    })}
                }
                span { style: "color: #555;", "Current: {current_label} ({view_count} saved)" }
                input {
                    placeholder: "Quick search",
                    value: "{quick_search}",
                    oninput: move |event| {
                        let value = event.value();
                        grid_for_search.borrow_mut().host_mut().set_quick_search(&value);
                        quick_search.set(value);
                        *revision.write() += 1;
                    }
                }
                button {
                    onclick: move |_| {
                        let open = show_column_editor();
                        show_column_editor.set(!open);
                    },
                    "Columns"
                }
            }

            nav {
                style: "display: flex; gap: 8px; align-items: center; flex-wrap: wrap; padding: 0 8px 8px;",
                input {
                    placeholder: "New view name",
                    value: "{save_as_name}",
                    oninput: move |event| save_as_name.set(event.value()),
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: save_as_shared(),
                        onclick: move |_| {
                            let shared = save_as_shared();
                            save_as_shared.set(!shared);
                        }
                    }
                    "Shared"
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: save_as_default(),
                        onclick: move |_| {
                            let default = save_as_default();
                            save_as_default.set(!default);
                        }
                    }
                    "Default"
                }
                button {
                    onclick: move |_| {
                        let name = save_as_name();
                        let visibility = if save_as_shared() {
                            ViewVisibility::Shared
                        } else {
                            ViewVisibility::Private
                        };
                        let set_default = save_as_default();
                        let result = run_blocking(|| {
                            grid_for_save_as
                                .borrow_mut()
                                .save_as(&name, visibility, set_default)
                                .map(|_| ())
                        });
                        if result.is_ok() {
                            save_as_name.set(String::new());
                        }
                        report(&mut status, "Save as", result);
                        *revision.write() += 1;
                    },
                    "Save as"
                }
                button {
                    onclick: move |_| {
                        let result = run_blocking(|| {
                            grid_for_save_current.borrow_mut().save_current().map(|_| ())
                        });
                        report(&mut status, "Save", result);
                        *revision.write() += 1;
                    },
                    "Save"
                }
                input {
                    placeholder: "Rename to",
                    value: "{rename_input}",
                    oninput: move |event| rename_input.set(event.value()),
                }
                button {
                    onclick: move |_| {
                        let current = grid_for_rename.borrow().current_view_id();
                        let Some(id) = current else {
                            status.set("Select a saved view to rename".to_string());
                            return;
                        };
                        let name = rename_input();
                        let result = run_blocking(|| {
                            grid_for_rename.borrow_mut().rename(id, &name).map(|_| ())
                        });
                        report(&mut status, "Rename", result);
                        *revision.write() += 1;
                    },
                    "Rename"
                }
                button {
                    onclick: move |_| {
                        let current = grid_for_default.borrow().current_view_id();
                        let result = run_blocking(|| grid_for_default.borrow_mut().set_default(current));
                        report(&mut status, "Set default", result);
                        *revision.write() += 1;
                    },
                    "Set default"
                }
                button {
                    onclick: move |_| {
                        let current = grid_for_delete.borrow().current_view_id();
                        let Some(id) = current else {
                            status.set("Select a saved view to delete".to_string());
                            return;
                        };
                        let confirmed = MessageDialog::new()
                            .set_level(MessageLevel::Warning)
                            .set_title("Delete view")
                            .set_description("Delete this saved view? This cannot be undone.")
                            .set_buttons(MessageButtons::YesNo)
                            .show();
                        if confirmed != MessageDialogResult::Yes {
                            return;
                        }
                        let result = run_blocking(|| grid_for_delete.borrow_mut().remove(id).map(|_| ()));
                        report(&mut status, "Delete", result);
                        *revision.write() += 1;
                    },
                    "Delete"
                }
            }

            if show_column_editor() {
                div {
                    style: "display: flex; gap: 12px; flex-wrap: wrap; padding: 0 8px 8px; border-bottom: 1px solid #ddd;",
                    {snapshot.columns.iter().enumerate().map(|(idx, column)| {
                        let key = column.key.clone();
                        let label = column.label.clone();
                        let checked = column.visible;
                        let grid_for_toggle = grid_for_columns.clone();
                        let grid_for_left = grid_for_columns.clone();
                        let key_for_left = key.clone();
                        rsx!(
                            span {
                                style: "display: inline-flex; gap: 4px; align-items: center;",
                                input {
                                    r#type: "checkbox",
                                    checked: checked,
                                    onclick: move |_| {
                                        let (mut columns, order) = {
                                            let grid = grid_for_toggle.borrow();
                                            let surface = grid.host().surface();
                                            (surface.visible_keys(), surface.keyed_order())
                                        };
                                        if checked {
                                            columns.retain(|k| k != &key);
                                        } else {
                                            columns.push(key.clone());
                                        }
                                        let result = grid_for_toggle
                                            .borrow_mut()
                                            .apply_columns_edit(columns, order)
                                            .map(|_| ());
                                        report(&mut status, "Columns", result);
                                        *revision.write() += 1;
                                    }
                                }
                                span { "{label}" }
                                button {
                                    disabled: idx == 0,
                                    onclick: move |_| {
                                        let (columns, mut order) = {
                                            let grid = grid_for_left.borrow();
                                            let surface = grid.host().surface();
                                            (surface.visible_keys(), surface.keyed_order())
                                        };
                                        if let Some(pos) = order.iter().position(|k| k == &key_for_left) {
                                            if pos > 0 {
                                                order.swap(pos, pos - 1);
                                            }
                                        }
                                        let result = grid_for_left
                                            .borrow_mut()
                                            .apply_columns_edit(columns, order)
                                            .map(|_| ());
                                        report(&mut status, "Columns", result);
                                        *revision.write() += 1;
                                    },
                                    "◀"
                                }
                            }
                        )
                    })}
                }
            }

            div {
                style: "flex: 1; overflow: auto;",
                table {
                    style: "border-collapse: collapse; width: 100%;",
                    thead {
                        tr {
                            {snapshot.header.iter().map(|cell| {
                                let id = cell.id;
                                let text = cell.text.clone();
                                let style = header_cell_style(cell.visible);
                                rsx!( th { key: "{id}", style: "{style}", "{text}" } )
                            })}
                        }
                        tr {
                            {snapshot.filter.iter().map(|cell| {
                                let id = cell.id;
                                let style = cell_style(cell.visible);
                                rsx!( th { key: "{id}", style: "{style}" } )
                            })}
                        }
                    }
                    tbody {
                        {snapshot.rows.iter().enumerate().map(|(row_idx, row)| {
                            rsx!(
                                tr {
                                    key: "{row_idx}",
                                    {row.iter().map(|cell| {
                                        let id = cell.id;
                                        let text = cell.text.clone();
                                        let style = cell_style(cell.visible);
                                        rsx!( td { key: "{id}", style: "{style}", "{text}" } )
                                    })}
                                }
                            )
                        })}
                    }
                }
            }

            footer {
                style: "padding: 6px 8px; border-top: 1px solid #ddd; color: #444;",
                "{status}"
            }
        }
    }
}
