//! In-memory path repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::curation::LearningPath;
use crate::domain::foundation::{LearningPathId, UserId};
use crate::domain::progress::ProgressRecord;
use crate::ports::{PathRepository, RepositoryError, StoredPath};

/// HashMap-backed [`PathRepository`].
#[derive(Default)]
pub struct InMemoryPathRepository {
    paths: RwLock<HashMap<LearningPathId, StoredPath>>,
    /// Progress per path, keyed by video id.
    progress: RwLock<HashMap<LearningPathId, HashMap<String, ProgressRecord>>>,
}

impl InMemoryPathRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PathRepository for InMemoryPathRepository {
    async fn save_path(
        &self,
        owner: UserId,
        path: &LearningPath,
    ) -> Result<LearningPathId, RepositoryError> {
        let id = LearningPathId::new();
        let stored = StoredPath {
            id,
            owner,
            path: path.clone(),
        };
        self.paths.write().await.insert(id, stored);
        Ok(id)
    }

    async fn find_path(&self, id: LearningPathId) -> Result<Option<StoredPath>, RepositoryError> {
        Ok(self.paths.read().await.get(&id).cloned())
    }

    async fn upsert_progress(
        &self,
        path_id: LearningPathId,
        video_id: &str,
        watched: bool,
    ) -> Result<(), RepositoryError> {
        let mut progress = self.progress.write().await;
        let records = progress.entry(path_id).or_default();
        match records.get_mut(video_id) {
            Some(record) => record.set_watched(watched),
            None => {
                records.insert(video_id.to_string(), ProgressRecord::new(video_id, watched));
            }
        }
        Ok(())
    }

    async fn list_progress(
        &self,
        path_id: LearningPathId,
    ) -> Result<Vec<ProgressRecord>, RepositoryError> {
        Ok(self
            .progress
            .read()
            .await
            .get(&path_id)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::curation::{LearningStage, VideoAnalysis};
    use crate::domain::dialogue::{LearningGoal, SkillLevel};

    fn path() -> LearningPath {
        let video = VideoAnalysis {
            video_id: "v1".to_string(),
            title: "Intro".to_string(),
            url: "https://example.com/watch?v=v1".to_string(),
            quality_score: 8,
            difficulty: SkillLevel::Beginner,
            concepts_covered: vec!["basics".to_string()],
            learning_outcomes: vec![],
            prerequisites: vec![],
            why_recommended: "clear".to_string(),
            estimated_time: "10:00".to_string(),
            order: 1,
        };
        let mut path = LearningPath {
            topic: "rust".to_string(),
            user_level: SkillLevel::Beginner,
            user_goal: LearningGoal::Concepts,
            total_videos: 0,
            estimated_total_time: String::new(),
            stages: vec![LearningStage {
                stage_name: "Foundations".to_string(),
                stage_number: 1,
                description: String::new(),
                videos: vec![video],
            }],
            completion_goals: vec![],
            summary: String::new(),
        };
        path.recompute_totals();
        path
    }

    #[tokio::test]
    async fn saved_paths_are_found_by_id() {
        let repo = InMemoryPathRepository::new();
        let owner = UserId::new();
        let id = repo.save_path(owner, &path()).await.unwrap();

        let stored = repo.find_path(id).await.unwrap().unwrap();
        assert_eq!(stored.owner, owner);
        assert_eq!(stored.path.topic, "rust");
    }

    #[tokio::test]
    async fn unknown_path_is_none() {
        let repo = InMemoryPathRepository::new();
        assert!(repo.find_path(LearningPathId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_creates_then_updates() {
        let repo = InMemoryPathRepository::new();
        let id = repo.save_path(UserId::new(), &path()).await.unwrap();

        repo.upsert_progress(id, "v1", true).await.unwrap();
        repo.upsert_progress(id, "v1", true).await.unwrap();

        let records = repo.list_progress(id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].watched);
    }

    #[tokio::test]
    async fn progress_is_scoped_per_path() {
        let repo = InMemoryPathRepository::new();
        let a = repo.save_path(UserId::new(), &path()).await.unwrap();
        let b = repo.save_path(UserId::new(), &path()).await.unwrap();

        repo.upsert_progress(a, "v1", true).await.unwrap();
        assert!(repo.list_progress(b).await.unwrap().is_empty());
    }
}
