//! Raw video search results.

use serde::{Deserialize, Serialize};

/// One item returned by the external video search provider.
///
/// Immutable once fetched. The `id` is opaque and unique within a batch;
/// label fields carry whatever formatting the provider chose and are never
/// parsed for meaning (durations are summed best-effort by the path model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_label: String,
    pub published_at: String,
    pub duration_label: String,
    pub view_count_label: String,
    pub url: String,
}

impl SearchCandidate {
    /// Returns the description truncated to `max_len` characters, for
    /// embedding in the reasoning-service prompt.
    pub fn truncated_description(&self, max_len: usize) -> &str {
        match self.description.char_indices().nth(max_len) {
            Some((idx, _)) => &self.description[..idx],
            None => &self.description,
        }
    }
}
