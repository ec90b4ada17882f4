use std::path::PathBuf;

use crate::domain::entities::saved_view::{NewSavedView, SavedView, ViewId, ViewPatch};
use crate::infra::sqlite::queries::{
    delete_view, insert_view, list_views, load_default_view_id, load_view,
    store_default_view_id, update_view,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{RepoError, SavedViewRepository};

pub struct SqliteViewRepo {
    pub db_path: PathBuf,
}

impl SqliteViewRepo {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

fn message(err: anyhow::Error) -> RepoError {
    RepoError::Message(format!("{err:#}"))
}

impl SavedViewRepository for SqliteViewRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(message)
    }

    fn list_views(&self, entity_name: &str) -> Result<Vec<SavedView>, RepoError> {
        list_views(&self.db_path, entity_name).map_err(message)
    }

    fn create_view(&self, view: NewSavedView) -> Result<SavedView, RepoError> {
        let id = insert_view(&self.db_path, &view).map_err(message)?;
        load_view(&self.db_path, id)
            .map_err(message)?
            .ok_or(RepoError::NotFound(ViewId(id)))
    }

    fn update_view(&self, id: ViewId, patch: ViewPatch) -> Result<SavedView, RepoError> {
        if !update_view(&self.db_path, id.0, &patch).map_err(message)? {
            return Err(RepoError::NotFound(id));
        }
        load_view(&self.db_path, id.0)
            .map_err(message)?
            .ok_or(RepoError::NotFound(id))
    }

    fn delete_view(&self, id: ViewId) -> Result<(), RepoError> {
        if !delete_view(&self.db_path, id.0).map_err(message)? {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn default_view_id(&self, entity_name: &str) -> Result<Option<ViewId>, RepoError> {
        load_default_view_id(&self.db_path, entity_name)
            .map(|id| id.map(ViewId))
            .map_err(message)
    }

    fn set_default_view(&self, entity_name: &str, id: Option<ViewId>) -> Result<(), RepoError> {
        store_default_view_id(&self.db_path, entity_name, id.map(|id| id.0)).map_err(message)
    }
}
