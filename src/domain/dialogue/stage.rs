//! Dialogue stage machine.
//!
//! Each stage variant carries exactly the slots that are valid at that
//! stage, so "slot present but stage says it shouldn't be" states are
//! unrepresentable.

use serde::{Deserialize, Serialize};

use super::slots::{LearningGoal, SkillLevel};

/// The current stage of a conversation, with its resolved slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum DialogueStage {
    /// No intent resolved yet.
    Greeting,

    /// Topic known, skill level pending.
    GotTopic { topic: String },

    /// Topic and level known, goal pending.
    GotLevel { topic: String, level: SkillLevel },

    /// All slots resolved, search not yet run.
    ReadyToSearch {
        topic: String,
        level: SkillLevel,
        goal: LearningGoal,
    },

    /// Search has run; refinements and new topics re-enter from here.
    Results {
        topic: String,
        level: SkillLevel,
        goal: LearningGoal,
    },
}

/// Stage discriminant without slot data, for transition checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Greeting,
    GotTopic,
    GotLevel,
    ReadyToSearch,
    Results,
}

impl DialogueStage {
    /// Returns the stage discriminant.
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Greeting => StageKind::Greeting,
            Self::GotTopic { .. } => StageKind::GotTopic,
            Self::GotLevel { .. } => StageKind::GotLevel,
            Self::ReadyToSearch { .. } => StageKind::ReadyToSearch,
            Self::Results { .. } => StageKind::Results,
        }
    }

    /// Returns the resolved topic, if the stage carries one.
    pub fn topic(&self) -> Option<&str> {
        match self {
            Self::Greeting => None,
            Self::GotTopic { topic }
            | Self::GotLevel { topic, .. }
            | Self::ReadyToSearch { topic, .. }
            | Self::Results { topic, .. } => Some(topic),
        }
    }

    /// Returns the resolved skill level, if the stage carries one.
    pub fn level(&self) -> Option<SkillLevel> {
        match self {
            Self::Greeting | Self::GotTopic { .. } => None,
            Self::GotLevel { level, .. }
            | Self::ReadyToSearch { level, .. }
            | Self::Results { level, .. } => Some(*level),
        }
    }

    /// Returns the resolved learning goal, if the stage carries one.
    pub fn goal(&self) -> Option<LearningGoal> {
        match self {
            Self::Greeting | Self::GotTopic { .. } | Self::GotLevel { .. } => None,
            Self::ReadyToSearch { goal, .. } | Self::Results { goal, .. } => Some(*goal),
        }
    }

    /// Returns true if all three slots are resolved.
    pub fn is_fully_resolved(&self) -> bool {
        matches!(self, Self::ReadyToSearch { .. } | Self::Results { .. })
    }
}

impl StageKind {
    /// Returns all stages reachable from this one in a single turn.
    ///
    /// Reset phrases make Greeting reachable from everywhere. Early exit
    /// resolves all slots and runs the search within the same turn, so
    /// Results is reachable directly from every slot-collecting stage.
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Greeting => vec![Self::GotTopic, Self::GotLevel, Self::Results],
            Self::GotTopic => vec![Self::Greeting, Self::GotLevel, Self::Results],
            Self::GotLevel => vec![Self::Greeting, Self::Results],
            Self::ReadyToSearch => vec![Self::Greeting, Self::GotTopic, Self::Results],
            Self::Results => vec![Self::Greeting, Self::GotTopic, Self::Results],
        }
    }

    /// Returns true if a single-turn transition to the target is valid.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        self == target || self.valid_transitions().contains(target)
    }
}

impl Default for DialogueStage {
    fn default() -> Self {
        Self::Greeting
    }
}
