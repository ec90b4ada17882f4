use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::domain::entities::saved_view::ViewId;
use crate::usecase::ports::last_used::LastUsedStore;
use crate::usecase::ports::repo::RepoError;

/// One plain-text file per entity holding the last used view id.
pub struct FileLastUsedStore {
    dir: PathBuf,
}

impl FileLastUsedStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, entity_name: &str) -> PathBuf {
        let file_stem: String = entity_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_stem}.last_view"))
    }
}

fn read_id(path: &Path) -> Result<Option<ViewId>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    // Unparseable content counts as no value.
    Ok(text.parse::<ViewId>().ok())
}

fn write_id(path: &Path, id: ViewId) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }
    std::fs::write(path, id.to_string())
        .with_context(|| format!("failed to write {}", path.display()))
}

fn remove_file(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
    }
    Ok(())
}

fn message(err: anyhow::Error) -> RepoError {
    RepoError::Message(format!("{err:#}"))
}

impl LastUsedStore for FileLastUsedStore {
    fn load(&self, entity_name: &str) -> Result<Option<ViewId>, RepoError> {
        read_id(&self.path_for(entity_name)).map_err(message)
    }

    fn store(&self, entity_name: &str, id: ViewId) -> Result<(), RepoError> {
        write_id(&self.path_for(entity_name), id).map_err(message)
    }

    fn clear(&self, entity_name: &str) -> Result<(), RepoError> {
        remove_file(&self.path_for(entity_name)).map_err(message)
    }
}

/// Process-local store for hosts without a writable directory.
#[derive(Default)]
pub struct MemoryLastUsedStore {
    values: Mutex<HashMap<String, ViewId>>,
}

impl MemoryLastUsedStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, ViewId>>, RepoError> {
        self.values
            .lock()
            .map_err(|_| RepoError::Message("last used store lock poisoned".to_string()))
    }
}

impl LastUsedStore for MemoryLastUsedStore {
    fn load(&self, entity_name: &str) -> Result<Option<ViewId>, RepoError> {
        Ok(self.lock()?.get(entity_name).copied())
    }

    fn store(&self, entity_name: &str, id: ViewId) -> Result<(), RepoError> {
        self.lock()?.insert(entity_name.to_string(), id);
        Ok(())
    }

    fn clear(&self, entity_name: &str) -> Result<(), RepoError> {
        self.lock()?.remove(entity_name);
        Ok(())
    }
}
