//! Dialogue module - multi-turn intent resolution.
//!
//! Turns free-form user utterances into resolved learning intent (topic,
//! skill level, goal) across conversational turns. The `intent` submodule
//! classifies single utterances; the `controller` drives the stage machine.

pub mod controller;
pub mod intent;
mod session;
mod slots;
mod stage;

pub use controller::{DialogueController, SearchDirective, TurnAction};
pub use session::{ChatMessage, ChatRole, ConversationSession};
pub use slots::{LearningGoal, SkillLevel};
pub use stage::{DialogueStage, StageKind};
