//! Wire schema for the reasoning service's curation output.
//!
//! The service reply is untrusted. Decoding is strict on structure: the
//! stage list, each stage's name, number, and video list, and each video's
//! id and quality score are required, and a payload that misses any of
//! them is rejected wholesale (treated the same as "service unavailable").
//! Cosmetic fields default instead.

use serde::Deserialize;

use crate::domain::dialogue::SkillLevel;

/// Top-level curated-path claim from the reasoning service.
#[derive(Debug, Clone, Deserialize)]
pub struct CuratedPathPayload {
    pub stages: Vec<CuratedStagePayload>,
    #[serde(default)]
    pub completion_goals: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// One claimed stage.
#[derive(Debug, Clone, Deserialize)]
pub struct CuratedStagePayload {
    pub stage_name: String,
    pub stage_number: u32,
    #[serde(default)]
    pub description: String,
    pub videos: Vec<CuratedVideoPayload>,
}

/// One claimed video within a stage.
///
/// `estimated_time` and `order` are deliberately absent: the engine
/// always takes the duration from the original candidate and renumbers
/// watch order itself after filtering, never trusting the service.
#[derive(Debug, Clone, Deserialize)]
pub struct CuratedVideoPayload {
    pub video_id: String,
    pub quality_score: u8,
    #[serde(default)]
    pub difficulty: Option<SkillLevel>,
    #[serde(default)]
    pub concepts_covered: Vec<String>,
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub why_recommended: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_payload() {
        let json = r#"{
            "stages": [{
                "stage_name": "Foundations",
                "stage_number": 1,
                "description": "Start here",
                "videos": [{
                    "video_id": "abc",
                    "quality_score": 8,
                    "difficulty": "beginner",
                    "concepts_covered": ["syntax"],
                    "learning_outcomes": ["read code"],
                    "prerequisites": [],
                    "why_recommended": "clear"
                }]
            }],
            "completion_goals": ["write a script"],
            "summary": "A gentle start"
        }"#;

        let payload: CuratedPathPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.stages.len(), 1);
        assert_eq!(payload.stages[0].videos[0].video_id, "abc");
        assert_eq!(payload.summary, "A gentle start");
    }

    #[test]
    fn cosmetic_fields_default() {
        let json = r#"{
            "stages": [{
                "stage_name": "Foundations",
                "stage_number": 1,
                "videos": [{"video_id": "abc", "quality_score": 5}]
            }]
        }"#;

        let payload: CuratedPathPayload = serde_json::from_str(json).unwrap();
        let video = &payload.stages[0].videos[0];
        assert!(video.concepts_covered.is_empty());
        assert_eq!(video.difficulty, None);
        assert!(payload.completion_goals.is_empty());
    }

    #[test]
    fn missing_stages_is_rejected() {
        let json = r#"{"summary": "no stages here"}"#;
        assert!(serde_json::from_str::<CuratedPathPayload>(json).is_err());
    }

    #[test]
    fn missing_video_id_is_rejected() {
        let json = r#"{
            "stages": [{
                "stage_name": "Foundations",
                "stage_number": 1,
                "videos": [{"quality_score": 5}]
            }]
        }"#;
        assert!(serde_json::from_str::<CuratedPathPayload>(json).is_err());
    }

    #[test]
    fn missing_quality_score_is_rejected() {
        let json = r#"{
            "stages": [{
                "stage_name": "Foundations",
                "stage_number": 1,
                "videos": [{"video_id": "abc"}]
            }]
        }"#;
        assert!(serde_json::from_str::<CuratedPathPayload>(json).is_err());
    }
}
