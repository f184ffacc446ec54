//! Slot value enums: skill level and learning goal.

use serde::{Deserialize, Serialize};

/// Self-reported experience level for the requested topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Returns the search-query modifier for this level.
    pub fn query_modifier(&self) -> &'static str {
        match self {
            Self::Beginner => "for beginners",
            Self::Intermediate => "intermediate tutorial",
            Self::Advanced => "advanced",
        }
    }
}

impl Default for SkillLevel {
    fn default() -> Self {
        Self::Beginner
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How the user prefers to learn.
///
/// Three mutually exclusive learning-style buckets: build something
/// concrete, understand underlying concepts, or get a fast overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningGoal {
    Project,
    Concepts,
    Quick,
}

impl LearningGoal {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Project => "project-based",
            Self::Concepts => "concept-focused",
            Self::Quick => "quick overview",
        }
    }

    /// Returns the search-query modifier for this goal.
    pub fn query_modifier(&self) -> &'static str {
        match self {
            Self::Project => "project build hands-on",
            Self::Concepts => "explained in depth",
            Self::Quick => "crash course",
        }
    }
}

impl Default for LearningGoal {
    fn default() -> Self {
        Self::Concepts
    }
}

impl std::fmt::Display for LearningGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_level_serializes_to_lowercase() {
        let json = serde_json::to_string(&SkillLevel::Beginner).unwrap();
        assert_eq!(json, "\"beginner\"");
    }

    #[test]
    fn learning_goal_deserializes_from_lowercase() {
        let goal: LearningGoal = serde_json::from_str("\"project\"").unwrap();
        assert_eq!(goal, LearningGoal::Project);
    }

    #[test]
    fn default_level_is_beginner() {
        assert_eq!(SkillLevel::default(), SkillLevel::Beginner);
    }

    #[test]
    fn default_goal_is_concepts() {
        assert_eq!(LearningGoal::default(), LearningGoal::Concepts);
    }

    #[test]
    fn all_levels_have_query_modifiers() {
        for level in [
            SkillLevel::Beginner,
            SkillLevel::Intermediate,
            SkillLevel::Advanced,
        ] {
            assert!(!level.query_modifier().is_empty());
        }
    }

    #[test]
    fn all_goals_have_query_modifiers() {
        for goal in [
            LearningGoal::Project,
            LearningGoal::Concepts,
            LearningGoal::Quick,
        ] {
            assert!(!goal.query_modifier().is_empty());
        }
    }
}
