//! Curated learning-path model.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::duration;
use crate::domain::dialogue::{LearningGoal, SkillLevel};

/// Curated annotation of one search candidate inside a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    /// References a `SearchCandidate.id` from the curated batch.
    pub video_id: String,
    pub title: String,
    pub url: String,
    /// Honest quality assessment, 1-10.
    pub quality_score: u8,
    pub difficulty: SkillLevel,
    pub concepts_covered: Vec<String>,
    pub learning_outcomes: Vec<String>,
    pub prerequisites: Vec<String>,
    pub why_recommended: String,
    /// Always the candidate's own duration label; the reasoning service
    /// has no authoritative duration data.
    pub estimated_time: String,
    /// Watch order within the stage, starting at 1.
    pub order: u32,
}

/// A group of ordered videos within a curated path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStage {
    pub stage_name: String,
    /// Unique and increasing within the path, starting at 1.
    pub stage_number: u32,
    pub description: String,
    /// Never empty; stages that lose all videos to validation are dropped.
    pub videos: Vec<VideoAnalysis>,
}

/// A validated, staged curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub topic: String,
    pub user_level: SkillLevel,
    pub user_goal: LearningGoal,
    /// Always the recomputed count of videos across stages.
    pub total_videos: usize,
    pub estimated_total_time: String,
    /// Never empty for a surfaced path.
    pub stages: Vec<LearningStage>,
    pub completion_goals: Vec<String>,
    pub summary: String,
}

impl LearningPath {
    /// Counts videos across all stages.
    pub fn video_count(&self) -> usize {
        self.stages.iter().map(|s| s.videos.len()).sum()
    }

    /// Returns every video id across all stages, in stage order.
    pub fn video_ids(&self) -> Vec<&str> {
        self.stages
            .iter()
            .flat_map(|s| s.videos.iter().map(|v| v.video_id.as_str()))
            .collect()
    }

    /// Recomputes the total-video count and estimated total time from the
    /// stages currently present.
    pub fn recompute_totals(&mut self) {
        self.total_videos = self.video_count();
        self.estimated_total_time = duration::total_label(
            self.stages
                .iter()
                .flat_map(|s| s.videos.iter().map(|v| v.estimated_time.as_str())),
        );
    }

    /// Checks the structural invariants of a surfaced path: at least one
    /// stage, no empty stages, unique video ids, consistent totals, and
    /// strictly increasing stage numbers.
    pub fn invariants_hold(&self) -> bool {
        if self.stages.is_empty() {
            return false;
        }
        if self.stages.iter().any(|s| s.videos.is_empty()) {
            return false;
        }
        if self.total_videos != self.video_count() {
            return false;
        }
        let ids = self.video_ids();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        if unique.len() != ids.len() {
            return false;
        }
        self.stages
            .windows(2)
            .all(|w| w[0].stage_number < w[1].stage_number)
    }
}
