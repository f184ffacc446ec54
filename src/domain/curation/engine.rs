//! Curation engine: candidates + resolved intent -> validated path.
//!
//! The reasoning service proposes a staged plan over the candidate batch;
//! the engine treats that plan as untrusted claims and merges it back
//! against the batch. Unknown ids and duplicates are dropped silently,
//! durations always come from the candidates, and totals are recomputed.
//! Any failure along the way resolves to `None`, which callers must treat
//! as "fall back to the raw candidate list", never as a hard error.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use super::candidate::SearchCandidate;
use super::extractor::{extract_json_object, CurationParseError, ResponseSanitizer};
use super::path::{LearningPath, LearningStage, VideoAnalysis};
use super::payload::CuratedPathPayload;
use crate::domain::dialogue::{LearningGoal, SkillLevel};
use crate::ports::{AiProvider, CompletionRequest, MessageRole};

/// Stage-count band requested from the reasoning service.
const MIN_STAGES: u8 = 2;
const MAX_STAGES: u8 = 4;

/// Video-count band requested from the reasoning service.
const MIN_PATH_VIDEOS: u8 = 5;
const MAX_PATH_VIDEOS: u8 = 12;

/// Per-candidate description budget in the prompt.
const DESCRIPTION_BUDGET: usize = 200;

/// Completion limits for the single curation call.
const MAX_COMPLETION_TOKENS: u32 = 4_096;
const CURATION_TEMPERATURE: f32 = 0.3;

/// Resolved intent handed to the engine alongside the candidates.
#[derive(Debug, Clone)]
pub struct CurationRequest<'a> {
    pub topic: &'a str,
    pub level: SkillLevel,
    pub goal: LearningGoal,
    /// Recent transcript, used only as prompt context.
    pub conversation_context: &'a str,
}

/// Builds learning paths from search candidates via the reasoning service.
pub struct CurationEngine {
    provider: Arc<dyn AiProvider>,
    sanitizer: ResponseSanitizer,
}

impl CurationEngine {
    /// Creates an engine over the given provider.
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self {
            provider,
            sanitizer: ResponseSanitizer::new(),
        }
    }

    /// Curates the candidate batch into a staged path.
    ///
    /// Returns `None` when there is nothing to curate, when the service
    /// call or decode fails, or when validation leaves no stage standing.
    pub async fn curate(
        &self,
        candidates: &[SearchCandidate],
        request: CurationRequest<'_>,
    ) -> Option<LearningPath> {
        if candidates.is_empty() {
            return None;
        }

        let completion_request = CompletionRequest::new()
            .with_system_prompt(system_prompt())
            .with_message(MessageRole::User, build_prompt(candidates, &request))
            .with_max_tokens(MAX_COMPLETION_TOKENS)
            .with_temperature(CURATION_TEMPERATURE);

        let response = match self.provider.complete(completion_request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, topic = request.topic, "curation call failed");
                return None;
            }
        };

        let payload = match self.decode(&response.content) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, topic = request.topic, "curation response rejected");
                return None;
            }
        };

        let path = merge(payload, candidates, &request);
        match &path {
            Some(path) => debug!(
                topic = request.topic,
                stages = path.stages.len(),
                videos = path.total_videos,
                "curation produced a path"
            ),
            None => warn!(topic = request.topic, "no videos survived validation"),
        }
        path
    }

    /// Sanitizes, locates, and strictly decodes the structured block.
    fn decode(&self, content: &str) -> Result<CuratedPathPayload, CurationParseError> {
        let sanitized = self.sanitizer.sanitize(content)?;
        let block = extract_json_object(&sanitized)?;
        let value: serde_json::Value =
            serde_json::from_str(&block).map_err(|e| CurationParseError::Parse(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| CurationParseError::Schema(e.to_string()))
    }
}

/// Merges the service's claims against the original candidate batch.
///
/// This is the correctness-critical step: every claimed video must match
/// a candidate id; entries that don't, and repeats of ones that do, are
/// dropped. Stages left empty are removed and the rest renumbered.
pub fn merge(
    payload: CuratedPathPayload,
    candidates: &[SearchCandidate],
    request: &CurationRequest<'_>,
) -> Option<LearningPath> {
    let by_id: HashMap<&str, &SearchCandidate> =
        candidates.iter().map(|c| (c.id.as_str(), c)).collect();
    let mut seen: HashSet<String> = HashSet::new();

    let mut stages: Vec<LearningStage> = Vec::new();
    for stage in payload.stages {
        let mut videos: Vec<VideoAnalysis> = Vec::new();
        for claimed in stage.videos {
            let Some(candidate) = by_id.get(claimed.video_id.as_str()) else {
                continue;
            };
            if !seen.insert(claimed.video_id.clone()) {
                continue;
            }
            videos.push(VideoAnalysis {
                video_id: claimed.video_id,
                title: candidate.title.clone(),
                url: candidate.url.clone(),
                quality_score: claimed.quality_score.clamp(1, 10),
                difficulty: claimed.difficulty.unwrap_or(request.level),
                concepts_covered: claimed.concepts_covered,
                learning_outcomes: claimed.learning_outcomes,
                prerequisites: claimed.prerequisites,
                why_recommended: claimed.why_recommended,
                // The service has no authoritative duration data.
                estimated_time: candidate.duration_label.clone(),
                order: videos.len() as u32 + 1,
            });
        }
        if videos.is_empty() {
            continue;
        }
        stages.push(LearningStage {
            stage_name: stage.stage_name,
            stage_number: stages.len() as u32 + 1,
            description: stage.description,
            videos,
        });
    }

    if stages.is_empty() {
        return None;
    }

    let mut path = LearningPath {
        topic: request.topic.to_string(),
        user_level: request.level,
        user_goal: request.goal,
        total_videos: 0,
        estimated_total_time: String::new(),
        stages,
        completion_goals: payload.completion_goals,
        summary: payload.summary,
    };
    path.recompute_totals();
    Some(path)
}

fn system_prompt() -> String {
    "You are a learning-path curator. You select and order instructional videos \
     into a staged curriculum for one learner. Score quality honestly on a 1-10 \
     scale; do not default to high scores. Exclude irrelevant or low-quality \
     videos entirely. Respond with a single JSON object and nothing else."
        .to_string()
}

/// Renders the candidate batch and intent into the curation instruction.
fn build_prompt(candidates: &[SearchCandidate], request: &CurationRequest<'_>) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Build a learning path for the topic \"{}\".\n\
         Learner level: {}. Learning style: {}.\n\n",
        request.topic,
        request.level.label(),
        request.goal.label(),
    ));

    if !request.conversation_context.is_empty() {
        prompt.push_str("Recent conversation:\n");
        prompt.push_str(request.conversation_context);
        prompt.push_str("\n\n");
    }

    prompt.push_str("Candidate videos (use only these ids):\n");
    for candidate in candidates {
        prompt.push_str(&format!(
            "- id: {} | title: {} | channel: {} | duration: {} | description: {}\n",
            candidate.id,
            candidate.title,
            candidate.channel_label,
            candidate.duration_label,
            candidate.truncated_description(DESCRIPTION_BUDGET),
        ));
    }

    prompt.push_str(&format!(
        "\nRules:\n\
         - Produce {}-{} stages, ordered from foundations to mastery.\n\
         - Include {}-{} videos in total across all stages.\n\
         - Within each stage, order videos from easiest to hardest.\n\
         - Only reference the candidate ids listed above.\n\n\
         Reply with one JSON object of this shape:\n\
         {{\"stages\": [{{\"stage_name\": \"...\", \"stage_number\": 1, \
         \"description\": \"...\", \"videos\": [{{\"video_id\": \"...\", \
         \"quality_score\": 7, \"difficulty\": \"beginner\", \
         \"concepts_covered\": [\"...\"], \"learning_outcomes\": [\"...\"], \
         \"prerequisites\": [], \"why_recommended\": \"...\"}}]}}], \
         \"completion_goals\": [\"...\"], \"summary\": \"...\"}}\n",
        MIN_STAGES, MAX_STAGES, MIN_PATH_VIDEOS, MAX_PATH_VIDEOS,
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{
        AiError, AiProvider, CompletionResponse, FinishReason, ProviderInfo, TokenUsage,
    };
    use async_trait::async_trait;

    /// Minimal fixed-response provider for engine tests.
    struct FixedProvider {
        reply: Result<String, AiError>,
    }

    #[async_trait]
    impl AiProvider for FixedProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, AiError> {
            self.reply.clone().map(|content| CompletionResponse {
                content,
                usage: TokenUsage::new(100, 200),
                model: "fixed".to_string(),
                finish_reason: FinishReason::Stop,
            })
        }

        fn provider_info(&self) -> ProviderInfo {
            ProviderInfo::new("fixed", "fixed", 100_000)
        }
    }

    fn candidates(n: usize) -> Vec<SearchCandidate> {
        (0..n)
            .map(|i| SearchCandidate {
                id: format!("vid{}", i),
                title: format!("Video {}", i),
                description: "desc".to_string(),
                channel_label: "Chan".to_string(),
                published_at: "2024-01-01T00:00:00Z".to_string(),
                duration_label: "10:00".to_string(),
                view_count_label: "1K views".to_string(),
                url: format!("https://example.com/watch?v=vid{}", i),
            })
            .collect()
    }

    fn request<'a>() -> CurationRequest<'a> {
        CurationRequest {
            topic: "python",
            level: SkillLevel::Beginner,
            goal: LearningGoal::Project,
            conversation_context: "",
        }
    }

    fn stage_json(name: &str, number: u32, ids: &[&str]) -> String {
        let videos: Vec<String> = ids
            .iter()
            .map(|id| format!("{{\"video_id\": \"{}\", \"quality_score\": 8}}", id))
            .collect();
        format!(
            "{{\"stage_name\": \"{}\", \"stage_number\": {}, \"videos\": [{}]}}",
            name,
            number,
            videos.join(",")
        )
    }

    fn payload_json(stages: &[String]) -> String {
        format!("{{\"stages\": [{}]}}", stages.join(","))
    }

    fn engine_with(reply: Result<String, AiError>) -> CurationEngine {
        CurationEngine::new(Arc::new(FixedProvider { reply }))
    }

    mod curate {
        use super::*;

        #[tokio::test]
        async fn empty_candidates_short_circuit_to_none() {
            let engine = engine_with(Ok("{\"stages\": []}".to_string()));
            assert!(engine.curate(&[], request()).await.is_none());
        }

        #[tokio::test]
        async fn provider_failure_resolves_to_none() {
            let engine = engine_with(Err(AiError::unavailable("overloaded")));
            assert!(engine.curate(&candidates(10), request()).await.is_none());
        }

        #[tokio::test]
        async fn malformed_block_resolves_to_none() {
            let engine = engine_with(Ok("here you go: {\"stages\": [broken".to_string()));
            assert!(engine.curate(&candidates(10), request()).await.is_none());
        }

        #[tokio::test]
        async fn schema_violation_resolves_to_none() {
            // Valid JSON, wrong shape.
            let engine = engine_with(Ok("{\"plan\": \"watch stuff\"}".to_string()));
            assert!(engine.curate(&candidates(10), request()).await.is_none());
        }

        #[tokio::test]
        async fn unknown_ids_are_dropped_and_totals_recomputed() {
            let stages = [
                stage_json("Foundations", 1, &["vid0", "ghost1", "vid1", "vid2"]),
                stage_json("Practice", 2, &["vid3", "ghost2", "vid4", "vid5", "ghost3", "vid6"]),
            ];
            let reply = format!(
                "Here's your path:\n```json\n{}\n```",
                payload_json(&stages)
            );
            let engine = engine_with(Ok(reply));

            let path = engine.curate(&candidates(10), request()).await.unwrap();
            assert_eq!(path.total_videos, 7);
            assert_eq!(path.stages.len(), 2);
            assert!(path.invariants_hold());
        }

        #[tokio::test]
        async fn path_inherits_candidate_durations() {
            let stages = [stage_json("Foundations", 1, &["vid0"])];
            let engine = engine_with(Ok(payload_json(&stages)));

            let path = engine.curate(&candidates(3), request()).await.unwrap();
            assert_eq!(path.stages[0].videos[0].estimated_time, "10:00");
        }
    }

    mod merge_rules {
        use super::*;

        fn parse(json: &str) -> CuratedPathPayload {
            serde_json::from_str(json).unwrap()
        }

        #[test]
        fn duplicate_ids_across_stages_keep_first_occurrence() {
            let stages = [
                stage_json("One", 1, &["vid0", "vid1"]),
                stage_json("Two", 2, &["vid1", "vid2"]),
            ];
            let payload = parse(&payload_json(&stages));

            let path = merge(payload, &candidates(5), &request()).unwrap();
            assert_eq!(path.total_videos, 3);
            assert!(path.invariants_hold());
        }

        #[test]
        fn stages_left_empty_are_dropped_and_renumbered() {
            let stages = [
                stage_json("Ghost town", 1, &["nope1", "nope2"]),
                stage_json("Real", 7, &["vid0"]),
            ];
            let payload = parse(&payload_json(&stages));

            let path = merge(payload, &candidates(2), &request()).unwrap();
            assert_eq!(path.stages.len(), 1);
            assert_eq!(path.stages[0].stage_number, 1);
            assert_eq!(path.stages[0].stage_name, "Real");
        }

        #[test]
        fn all_unknown_ids_resolve_to_none() {
            let stages = [stage_json("Ghosts", 1, &["nope1", "nope2"])];
            let payload = parse(&payload_json(&stages));
            assert!(merge(payload, &candidates(3), &request()).is_none());
        }

        #[test]
        fn quality_scores_are_clamped_into_range() {
            let json = r#"{"stages": [{
                "stage_name": "One", "stage_number": 1,
                "videos": [{"video_id": "vid0", "quality_score": 250}]
            }]}"#;
            let payload = parse(json);

            let path = merge(payload, &candidates(1), &request()).unwrap();
            assert_eq!(path.stages[0].videos[0].quality_score, 10);
        }

        #[test]
        fn missing_difficulty_defaults_to_the_learner_level() {
            let stages = [stage_json("One", 1, &["vid0"])];
            let payload = parse(&payload_json(&stages));

            let path = merge(payload, &candidates(1), &request()).unwrap();
            assert_eq!(path.stages[0].videos[0].difficulty, SkillLevel::Beginner);
        }

        #[test]
        fn watch_order_is_sequential_after_filtering() {
            let stages = [stage_json("One", 1, &["vid0", "ghost", "vid1"])];
            let payload = parse(&payload_json(&stages));

            let path = merge(payload, &candidates(2), &request()).unwrap();
            let orders: Vec<u32> = path.stages[0].videos.iter().map(|v| v.order).collect();
            assert_eq!(orders, vec![1, 2]);
        }
    }

    mod id_closure {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Whatever ids the service invents, every id in the merged
            /// path comes from the candidate batch.
            #[test]
            fn merged_paths_only_reference_real_candidates(
                claimed_ids in proptest::collection::vec("[a-z0-9]{1,8}", 1..30),
                batch_size in 1usize..15,
            ) {
                let batch = candidates(batch_size);
                let stages = [stage_json(
                    "Fuzz",
                    1,
                    &claimed_ids.iter().map(String::as_str).collect::<Vec<_>>(),
                )];
                let payload: CuratedPathPayload =
                    serde_json::from_str(&payload_json(&stages)).unwrap();

                if let Some(path) = merge(payload, &batch, &request()) {
                    let known: std::collections::HashSet<&str> =
                        batch.iter().map(|c| c.id.as_str()).collect();
                    for id in path.video_ids() {
                        prop_assert!(known.contains(id));
                    }
                    prop_assert!(path.invariants_hold());
                }
            }
        }
    }
}
