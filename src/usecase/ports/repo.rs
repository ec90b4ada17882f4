use thiserror::Error;

use crate::domain::entities::saved_view::{NewSavedView, SavedView, ViewId, ViewPatch};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("{0}")]
    Message(String),
    #[error("saved view {0} not found")]
    NotFound(ViewId),
}

/// Entity-scoped saved view persistence.
pub trait SavedViewRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn list_views(&self, entity_name: &str) -> Result<Vec<SavedView>, RepoError>;
    fn create_view(&self, view: NewSavedView) -> Result<SavedView, RepoError>;
    fn update_view(&self, id: ViewId, patch: ViewPatch) -> Result<SavedView, RepoError>;
    fn delete_view(&self, id: ViewId) -> Result<(), RepoError>;
    fn default_view_id(&self, entity_name: &str) -> Result<Option<ViewId>, RepoError>;
    fn set_default_view(&self, entity_name: &str, id: Option<ViewId>) -> Result<(), RepoError>;
}
