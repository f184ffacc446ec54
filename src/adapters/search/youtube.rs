//! YouTube Data API v3 search adapter.
//!
//! Two calls per search: `search.list` for relevance-ordered matches, then
//! `videos.list` for durations and view counts, which the search endpoint
//! does not return. Items that vanish between the two calls keep empty
//! labels rather than being dropped.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::curation::SearchCandidate;
use crate::ports::{SearchError, VideoSearch};

/// Configuration for the YouTube search adapter.
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    api_key: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl YouTubeConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// YouTube Data API v3 implementation of [`VideoSearch`].
pub struct YouTubeSearch {
    config: YouTubeConfig,
    client: Client,
}

impl YouTubeSearch {
    /// Creates a new adapter with the given configuration.
    pub fn new(config: YouTubeConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SearchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", self.config.api_key())])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_status_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::invalid_response(e.to_string()))
    }

    fn map_send_error(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if err.is_connect() {
            SearchError::network(format!("connection failed: {}", err))
        } else {
            SearchError::network(err.to_string())
        }
    }

    fn map_status_error(status: StatusCode, body: &str) -> SearchError {
        match status {
            // The Data API reports quota exhaustion as 403.
            StatusCode::FORBIDDEN if body.contains("quota") => SearchError::QuotaExceeded,
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => SearchError::AuthenticationFailed,
            s if s.is_server_error() => {
                SearchError::unavailable(format!("HTTP {}: {}", s, body))
            }
            s => SearchError::invalid_response(format!("HTTP {}: {}", s, body)),
        }
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<HashMap<String, VideoItem>, SearchError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let joined = ids.join(",");
        let url = format!("{}/videos", self.config.base_url);
        let list: VideoListResponse = self
            .get_json(&url, &[("part", "contentDetails,statistics"), ("id", &joined)])
            .await?;

        Ok(list
            .items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect())
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearch {
    async fn search(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        debug!(query, max_results, "searching videos");

        let url = format!("{}/search", self.config.base_url);
        let max = max_results.to_string();
        let list: SearchListResponse = self
            .get_json(
                &url,
                &[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("q", query),
                    ("maxResults", &max),
                ],
            )
            .await?;

        let ids: Vec<String> = list
            .items
            .iter()
            .filter_map(|item| item.id.video_id.clone())
            .collect();
        let details = self.fetch_details(&ids).await?;

        let candidates = list
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.video_id?;
                let detail = details.get(&id);
                Some(SearchCandidate {
                    url: format!("https://www.youtube.com/watch?v={}", id),
                    title: item.snippet.title,
                    description: item.snippet.description,
                    channel_label: item.snippet.channel_title,
                    published_at: item.snippet.published_at,
                    duration_label: detail
                        .map(|d| iso8601_to_label(&d.content_details.duration))
                        .unwrap_or_default(),
                    view_count_label: detail
                        .and_then(|d| d.statistics.view_count.as_deref())
                        .map(view_count_label)
                        .unwrap_or_default(),
                    id,
                })
            })
            .collect();

        Ok(candidates)
    }
}

/// Converts an ISO 8601 duration (`PT1H2M30S`) to a clock label
/// (`1:02:30`). Unparseable input yields an empty label.
fn iso8601_to_label(duration: &str) -> String {
    let Some(rest) = duration.strip_prefix("PT") else {
        return String::new();
    };

    let mut hours = 0u64;
    let mut minutes = 0u64;
    let mut seconds = 0u64;
    let mut number = String::new();
    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            number.push(ch);
            continue;
        }
        let value: u64 = match number.parse() {
            Ok(v) => v,
            Err(_) => return String::new(),
        };
        number.clear();
        match ch {
            'H' => hours = value,
            'M' => minutes = value,
            'S' => seconds = value,
            _ => return String::new(),
        }
    }
    if !number.is_empty() {
        return String::new();
    }

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Formats a raw view count into the compact label form (`1.2M views`).
fn view_count_label(raw: &str) -> String {
    let count: u64 = match raw.parse() {
        Ok(v) => v,
        Err(_) => return String::new(),
    };
    let compact = if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    };
    format!("{} views", compact.replace(".0", ""))
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    channel_title: String,
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    content_details: ContentDetails,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod durations {
        use super::*;

        #[test]
        fn minutes_and_seconds() {
            assert_eq!(iso8601_to_label("PT12M34S"), "12:34");
        }

        #[test]
        fn hours_pad_minutes_and_seconds() {
            assert_eq!(iso8601_to_label("PT1H2M3S"), "1:02:03");
        }

        #[test]
        fn missing_components_default_to_zero() {
            assert_eq!(iso8601_to_label("PT45S"), "0:45");
            assert_eq!(iso8601_to_label("PT2H"), "2:00:00");
        }

        #[test]
        fn garbage_yields_empty_label() {
            assert_eq!(iso8601_to_label("12:34"), "");
            assert_eq!(iso8601_to_label("PT12X"), "");
            assert_eq!(iso8601_to_label("PT12"), "");
        }
    }

    mod view_counts {
        use super::*;

        #[test]
        fn compacts_large_counts() {
            assert_eq!(view_count_label("1234567"), "1.2M views");
            assert_eq!(view_count_label("45200"), "45.2K views");
        }

        #[test]
        fn small_counts_stay_exact() {
            assert_eq!(view_count_label("847"), "847 views");
        }

        #[test]
        fn trailing_zero_fraction_is_dropped() {
            assert_eq!(view_count_label("2000000"), "2M views");
        }
    }

    mod error_mapping {
        use super::*;

        #[test]
        fn quota_forbidden_is_quota_exceeded() {
            let err = YouTubeSearch::map_status_error(
                StatusCode::FORBIDDEN,
                r#"{"error": {"errors": [{"reason": "quotaExceeded"}]}}"#,
            );
            assert_eq!(err, SearchError::QuotaExceeded);
        }

        #[test]
        fn plain_forbidden_is_authentication() {
            let err = YouTubeSearch::map_status_error(StatusCode::FORBIDDEN, "bad key");
            assert_eq!(err, SearchError::AuthenticationFailed);
        }

        #[test]
        fn server_errors_are_unavailable() {
            let err = YouTubeSearch::map_status_error(StatusCode::BAD_GATEWAY, "down");
            assert!(matches!(err, SearchError::Unavailable { .. }));
        }
    }

    mod response_parsing {
        use super::*;

        #[test]
        fn search_items_without_video_ids_are_skipped() {
            let json = r#"{
                "items": [
                    {"id": {"videoId": "abc"}, "snippet": {
                        "title": "T", "description": "D",
                        "channelTitle": "C", "publishedAt": "2024-01-01T00:00:00Z"
                    }},
                    {"id": {"channelId": "chan"}, "snippet": {
                        "title": "X", "description": "",
                        "channelTitle": "C", "publishedAt": "2024-01-01T00:00:00Z"
                    }}
                ]
            }"#;
            let parsed: SearchListResponse = serde_json::from_str(json).unwrap();
            let ids: Vec<_> = parsed
                .items
                .iter()
                .filter_map(|i| i.id.video_id.clone())
                .collect();
            assert_eq!(ids, vec!["abc"]);
        }

        #[test]
        fn video_items_tolerate_missing_statistics() {
            let json = r#"{
                "items": [
                    {"id": "abc", "contentDetails": {"duration": "PT5M"}}
                ]
            }"#;
            let parsed: VideoListResponse = serde_json::from_str(json).unwrap();
            assert_eq!(parsed.items[0].statistics.view_count, None);
        }
    }
}
