//! Watch-progress records and completion computation.
//!
//! The completion percentage is always computed live from the current
//! records, never cached alongside them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{Percentage, Timestamp};

/// Watch state for one video within a saved path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub video_id: String,
    pub watched: bool,
    pub watched_at: Option<Timestamp>,
}

impl ProgressRecord {
    /// Creates a record, stamping `watched_at` only when watched.
    pub fn new(video_id: impl Into<String>, watched: bool) -> Self {
        Self {
            video_id: video_id.into(),
            watched,
            watched_at: watched.then(Timestamp::now),
        }
    }

    /// Applies a new watched flag, preserving idempotency: re-marking an
    /// already-watched video keeps the original timestamp.
    pub fn set_watched(&mut self, watched: bool) {
        if self.watched == watched {
            return;
        }
        self.watched = watched;
        self.watched_at = watched.then(Timestamp::now);
    }
}

/// Live progress view over one saved path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Watched flag per video id; videos with no record are unwatched.
    pub per_video: HashMap<String, bool>,
    pub watched_count: usize,
    pub total_videos: usize,
    pub percent: Percentage,
}

impl ProgressSummary {
    /// Computes the summary from current records and the path's video
    /// count. Records for ids outside the path are ignored.
    pub fn compute(
        records: &[ProgressRecord],
        path_video_ids: &[&str],
        total_videos: usize,
    ) -> Self {
        let mut per_video: HashMap<String, bool> = path_video_ids
            .iter()
            .map(|id| ((*id).to_string(), false))
            .collect();

        for record in records {
            if let Some(flag) = per_video.get_mut(&record.video_id) {
                *flag = record.watched;
            }
        }

        let watched_count = per_video.values().filter(|w| **w).count();
        Self {
            per_video,
            watched_count,
            total_videos,
            percent: Percentage::from_ratio(watched_count, total_videos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwatched_records_yield_zero_percent() {
        let summary = ProgressSummary::compute(&[], &["a", "b"], 2);
        assert_eq!(summary.watched_count, 0);
        assert_eq!(summary.percent, Percentage::ZERO);
        assert_eq!(summary.per_video.len(), 2);
    }

    #[test]
    fn percent_is_rounded_live() {
        let records = vec![ProgressRecord::new("a", true)];
        let summary = ProgressSummary::compute(&records, &["a", "b", "c"], 3);
        assert_eq!(summary.watched_count, 1);
        assert_eq!(summary.percent.value(), 33);
    }

    #[test]
    fn zero_total_videos_is_zero_percent() {
        let summary = ProgressSummary::compute(&[], &[], 0);
        assert_eq!(summary.percent, Percentage::ZERO);
    }

    #[test]
    fn records_outside_the_path_are_ignored() {
        let records = vec![ProgressRecord::new("stray", true)];
        let summary = ProgressSummary::compute(&records, &["a"], 1);
        assert_eq!(summary.watched_count, 0);
        assert!(!summary.per_video.contains_key("stray"));
    }

    #[test]
    fn set_watched_is_idempotent() {
        let mut record = ProgressRecord::new("a", true);
        let first_stamp = record.watched_at;
        record.set_watched(true);
        assert_eq!(record.watched_at, first_stamp);
    }

    #[test]
    fn unwatching_clears_the_timestamp() {
        let mut record = ProgressRecord::new("a", true);
        record.set_watched(false);
        assert!(!record.watched);
        assert_eq!(record.watched_at, None);
    }
}
