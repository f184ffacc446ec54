//! Path Repository Port - persistence for saved paths and watch progress.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::curation::LearningPath;
use crate::domain::foundation::{LearningPathId, UserId};
use crate::domain::progress::ProgressRecord;

/// A persisted learning path together with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPath {
    pub id: LearningPathId,
    pub owner: UserId,
    pub path: LearningPath,
}

/// Errors from the path repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Failed to serialize record: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Port for learning-path and progress persistence.
#[async_trait]
pub trait PathRepository: Send + Sync {
    /// Saves a new path for the owner, returning its id.
    async fn save_path(
        &self,
        owner: UserId,
        path: &LearningPath,
    ) -> Result<LearningPathId, RepositoryError>;

    /// Finds a stored path, or `None` if absent.
    async fn find_path(&self, id: LearningPathId) -> Result<Option<StoredPath>, RepositoryError>;

    /// Idempotent upsert of one video's watched flag.
    async fn upsert_progress(
        &self,
        path_id: LearningPathId,
        video_id: &str,
        watched: bool,
    ) -> Result<(), RepositoryError>;

    /// Lists all progress records for a path.
    async fn list_progress(
        &self,
        path_id: LearningPathId,
    ) -> Result<Vec<ProgressRecord>, RepositoryError>;
}
