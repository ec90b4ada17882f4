use crate::domain::entities::saved_view::ViewId;
use crate::usecase::ports::repo::RepoError;

/// Client-local "last used view" value, one per entity name.
pub trait LastUsedStore: Send + Sync {
    fn load(&self, entity_name: &str) -> Result<Option<ViewId>, RepoError>;
    fn store(&self, entity_name: &str, id: ViewId) -> Result<(), RepoError>;
    fn clear(&self, entity_name: &str) -> Result<(), RepoError>;
}
