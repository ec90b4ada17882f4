use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS saved_view (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            entity_name     TEXT NOT NULL,
            name            TEXT NOT NULL,
            visibility      TEXT NOT NULL DEFAULT 'private',
            definition_json TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS view_default (
            entity_name TEXT PRIMARY KEY,
            view_id     INTEGER NOT NULL,
            FOREIGN KEY (view_id) REFERENCES saved_view(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_saved_view_entity
            ON saved_view(entity_name, id);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
