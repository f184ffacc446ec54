//! Progress use-cases: marking videos watched and reading completion.
//!
//! Both handlers enforce ownership, and completion is always computed
//! live from the stored records rather than read from a cached figure.

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::domain::foundation::{LearningPathId, UserId};
use crate::domain::progress::ProgressSummary;
use crate::ports::{PathRepository, RepositoryError, StoredPath};

/// Errors from the progress use-cases.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Learning path {0} not found")]
    PathNotFound(LearningPathId),

    #[error("Learning path {path_id} does not belong to this user")]
    Forbidden { path_id: LearningPathId },

    #[error("Video '{video_id}' is not part of this path")]
    UnknownVideo { video_id: String },

    #[error("Path repository failure: {0}")]
    Repository(#[from] RepositoryError),
}

/// Request to flip one video's watched flag.
#[derive(Debug, Clone)]
pub struct SetWatchedCommand {
    pub user_id: UserId,
    pub path_id: LearningPathId,
    pub video_id: String,
    pub watched: bool,
}

async fn load_owned(
    paths: &Arc<dyn PathRepository>,
    path_id: LearningPathId,
    user_id: UserId,
) -> Result<StoredPath, ProgressError> {
    let stored = paths
        .find_path(path_id)
        .await?
        .ok_or(ProgressError::PathNotFound(path_id))?;
    if stored.owner != user_id {
        return Err(ProgressError::Forbidden { path_id });
    }
    Ok(stored)
}

async fn summarize(
    paths: &Arc<dyn PathRepository>,
    stored: &StoredPath,
) -> Result<ProgressSummary, ProgressError> {
    let records = paths.list_progress(stored.id).await?;
    Ok(ProgressSummary::compute(
        &records,
        &stored.path.video_ids(),
        stored.path.total_videos,
    ))
}

/// Marks one video of a saved path watched or unwatched.
pub struct SetWatchedHandler {
    paths: Arc<dyn PathRepository>,
}

impl SetWatchedHandler {
    /// Creates a handler over the given repository.
    pub fn new(paths: Arc<dyn PathRepository>) -> Self {
        Self { paths }
    }

    /// Applies the flag and returns the resulting live summary.
    ///
    /// Re-marking an already-watched video is a no-op.
    pub async fn handle(
        &self,
        command: SetWatchedCommand,
    ) -> Result<ProgressSummary, ProgressError> {
        let stored = load_owned(&self.paths, command.path_id, command.user_id).await?;

        if !stored
            .path
            .video_ids()
            .contains(&command.video_id.as_str())
        {
            return Err(ProgressError::UnknownVideo {
                video_id: command.video_id,
            });
        }

        self.paths
            .upsert_progress(command.path_id, &command.video_id, command.watched)
            .await?;
        debug!(
            path = %command.path_id,
            video = command.video_id,
            watched = command.watched,
            "progress updated"
        );

        summarize(&self.paths, &stored).await
    }
}

/// Reads the live completion summary for a saved path.
pub struct GetProgressHandler {
    paths: Arc<dyn PathRepository>,
}

impl GetProgressHandler {
    /// Creates a handler over the given repository.
    pub fn new(paths: Arc<dyn PathRepository>) -> Self {
        Self { paths }
    }

    /// Computes the summary for the owner's path.
    pub async fn handle(
        &self,
        user_id: UserId,
        path_id: LearningPathId,
    ) -> Result<ProgressSummary, ProgressError> {
        let stored = load_owned(&self.paths, path_id, user_id).await?;
        summarize(&self.paths, &stored).await
    }
}
