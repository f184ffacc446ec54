//! Conversation session: stage plus append-only message history.

use serde::{Deserialize, Serialize};

use super::stage::DialogueStage;
use crate::domain::foundation::{ConversationId, Timestamp};

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub at: Timestamp,
}

impl ChatMessage {
    /// Creates a user message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            at: Timestamp::now(),
        }
    }

    /// Creates an assistant message stamped with the current time.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            at: Timestamp::now(),
        }
    }
}

/// One active conversation: current stage, transcript, and clarify budget.
///
/// The transcript is append-only; it is never reordered or truncated, and
/// it survives stage resets so the reasoning-service prompt keeps full
/// context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub id: ConversationId,
    pub stage: DialogueStage,
    messages: Vec<ChatMessage>,
    /// How many times the current missing slot has been re-asked.
    /// At most one re-ask per slot before a default is applied.
    pub clarify_attempts: u8,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConversationSession {
    /// Creates a fresh session at the greeting stage.
    pub fn new(id: ConversationId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            stage: DialogueStage::Greeting,
            messages: Vec::new(),
            clarify_attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a user message to the transcript.
    pub fn record_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
        self.updated_at = Timestamp::now();
    }

    /// Appends an assistant message to the transcript.
    pub fn record_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
        self.updated_at = Timestamp::now();
    }

    /// Returns the full transcript in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Renders the last `n` messages as prompt context.
    pub fn recent_context(&self, n: usize) -> String {
        let start = self.messages.len().saturating_sub(n);
        self.messages[start..]
            .iter()
            .map(|m| {
                let who = match m.role {
                    ChatRole::User => "User",
                    ChatRole::Assistant => "Assistant",
                };
                format!("{}: {}", who, m.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Clears all slots and returns to the greeting stage.
    ///
    /// The transcript is preserved.
    pub fn reset(&mut self) {
        self.stage = DialogueStage::Greeting;
        self.clarify_attempts = 0;
        self.updated_at = Timestamp::now();
    }

    /// Moves to a new stage, resetting the clarify budget.
    ///
    /// Single-turn transitions must follow the stage machine's table.
    pub fn advance_to(&mut self, stage: DialogueStage) {
        debug_assert!(
            self.stage.kind().can_transition_to(&stage.kind()),
            "invalid stage transition: {:?} -> {:?}",
            self.stage.kind(),
            stage.kind(),
        );
        self.stage = stage;
        self.clarify_attempts = 0;
        self.updated_at = Timestamp::now();
    }
}
