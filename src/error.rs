use thiserror::Error;

use crate::domain::entities::saved_view::ViewId;
use crate::usecase::ports::repo::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The grid cannot start with this configuration.
    #[error("invalid grid configuration: {0}")]
    Config(String),
    /// User input rejected before any state changed.
    #[error("{0}")]
    Validation(String),
    #[error("saved view request failed: {0}")]
    Remote(#[from] RepoError),
    #[error("saved view {0} is not in the current list")]
    UnknownView(ViewId),
    #[error("grid for `{0}` has been closed")]
    Disposed(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;
