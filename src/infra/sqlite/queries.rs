use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::domain::entities::definition::ViewDefinition;
use crate::domain::entities::saved_view::{
    NewSavedView, SavedView, ViewId, ViewPatch, ViewVisibility,
};
use crate::infra::sqlite::schema::open_connection;

const VIEW_COLUMNS: &str = "v.id, v.entity_name, v.name, v.visibility, v.definition_json,
             v.created_at, v.updated_at, d.view_id IS NOT NULL";

fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

fn view_from_row(row: &Row<'_>) -> rusqlite::Result<SavedView> {
    let visibility: String = row.get(3)?;
    let definition_json: String = row.get(4)?;
    Ok(SavedView {
        id: ViewId(row.get(0)?),
        entity_name: row.get(1)?,
        name: row.get(2)?,
        visibility: ViewVisibility::parse(&visibility),
        definition: ViewDefinition::from_json_str(&definition_json),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        is_default: row.get(7)?,
    })
}

pub fn list_views(db_path: &Path, entity_name: &str) -> Result<Vec<SavedView>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {VIEW_COLUMNS}
             FROM saved_view v
             LEFT JOIN view_default d
               ON d.entity_name = v.entity_name AND d.view_id = v.id
             WHERE v.entity_name = ?1
             ORDER BY v.name COLLATE NOCASE ASC, v.id ASC"
        ))
        .context("failed to prepare saved view query")?;

    let views = stmt
        .query_map([entity_name], view_from_row)
        .context("failed to query saved views")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to read saved view rows")?;

    Ok(views)
}

pub fn load_view(db_path: &Path, view_id: i64) -> Result<Option<SavedView>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        &format!(
            "SELECT {VIEW_COLUMNS}
             FROM saved_view v
             LEFT JOIN view_default d
               ON d.entity_name = v.entity_name AND d.view_id = v.id
             WHERE v.id = ?1"
        ),
        [view_id],
        view_from_row,
    )
    .optional()
    .context("failed to load saved view")
}

pub fn insert_view(db_path: &Path, view: &NewSavedView) -> Result<i64> {
    let conn = open_connection(db_path)?;
    let now = now_timestamp();
    conn.execute(
        "INSERT INTO saved_view(entity_name, name, visibility, definition_json, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            view.entity_name,
            view.name,
            view.visibility.as_str(),
            view.definition.to_json_string(),
            now
        ],
    )
    .context("failed to insert saved view")?;
    Ok(conn.last_insert_rowid())
}

/// Returns false when no row matched `view_id`.
pub fn update_view(db_path: &Path, view_id: i64, patch: &ViewPatch) -> Result<bool> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start saved view update")?;
    let now = now_timestamp();

    let mut touched = tx
        .execute(
            "UPDATE saved_view SET updated_at = ?1 WHERE id = ?2",
            params![now, view_id],
        )
        .context("failed to touch saved view")?;

    if let Some(name) = patch.name.as_ref() {
        touched = tx
            .execute(
                "UPDATE saved_view SET name = ?1 WHERE id = ?2",
                params![name, view_id],
            )
            .context("failed to rename saved view")?;
    }

    if let Some(definition) = patch.definition.as_ref() {
        touched = tx
            .execute(
                "UPDATE saved_view SET definition_json = ?1 WHERE id = ?2",
                params![definition.to_json_string(), view_id],
            )
            .context("failed to update saved view definition")?;
    }

    tx.commit().context("failed to commit saved view update")?;
    Ok(touched > 0)
}

/// Returns false when no row matched `view_id`.
pub fn delete_view(db_path: &Path, view_id: i64) -> Result<bool> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start saved view delete")?;

    tx.execute("DELETE FROM view_default WHERE view_id = ?1", [view_id])
        .context("failed to clear default view")?;
    let deleted = tx
        .execute("DELETE FROM saved_view WHERE id = ?1", [view_id])
        .context("failed to delete saved view")?;

    tx.commit().context("failed to commit saved view delete")?;
    Ok(deleted > 0)
}

pub fn load_default_view_id(db_path: &Path, entity_name: &str) -> Result<Option<i64>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT view_id FROM view_default WHERE entity_name = ?1",
        [entity_name],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .context("failed to load default view")
}

pub fn store_default_view_id(db_path: &Path, entity_name: &str, view_id: Option<i64>) -> Result<()> {
    let conn = open_connection(db_path)?;
    match view_id {
        Some(view_id) => {
            conn.execute(
                "INSERT INTO view_default(entity_name, view_id)
                 VALUES (?1, ?2)
                 ON CONFLICT(entity_name) DO UPDATE SET view_id = excluded.view_id",
                params![entity_name, view_id],
            )
            .context("failed to store default view")?;
        }
        None => {
            conn.execute(
                "DELETE FROM view_default WHERE entity_name = ?1",
                [entity_name],
            )
            .context("failed to clear default view")?;
        }
    }
    Ok(())
}
