use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

/// Where saved views and the last used cache live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub db_path: PathBuf,
    pub last_used_dir: PathBuf,
}

impl AppPaths {
    /// Lays both locations out under one base directory.
    pub fn under(base_dir: &Path) -> Self {
        AppPaths {
            db_path: base_dir.join("saved_views.sqlite"),
            last_used_dir: base_dir.join("last_used"),
        }
    }

    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("com", "hellhbbd", "saved-views")
            .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
        Ok(Self::under(project_dirs.data_local_dir()))
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data dir: {}", parent.display()))?;
        }
        std::fs::create_dir_all(&self.last_used_dir).with_context(|| {
            format!(
                "failed to create last used dir: {}",
                self.last_used_dir.display()
            )
        })?;
        Ok(())
    }

    pub fn webview_data_dir(&self) -> Option<PathBuf> {
        self.db_path.parent().map(|dir| dir.join("webview2"))
    }
}
