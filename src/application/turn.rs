//! Handle Turn - one user utterance in, one reply out.
//!
//! The handler loads (or creates) the conversation, runs the dialogue
//! controller, and when the controller emits a search directive it runs
//! the single search call and at most one curation call. External
//! failures never surface as errors on this path: a failed search rolls
//! the conversation back to its pre-turn state with a retry message, and
//! a failed curation falls back to the raw candidate list.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::curation::{CurationEngine, CurationRequest, LearningPath, SearchCandidate};
use crate::domain::dialogue::{
    ConversationSession, DialogueController, SearchDirective, TurnAction,
};
use crate::domain::foundation::{ConversationId, LearningPathId, UserId};
use crate::ports::{
    AiProvider, PathRepository, RepositoryError, SessionStore, SessionStoreError, VideoSearch,
};

/// How many recent transcript messages feed the curation prompt.
const CONTEXT_MESSAGES: usize = 10;

/// Default candidate batch size per search.
pub const DEFAULT_MAX_RESULTS: u8 = 10;

/// One user utterance addressed to a conversation.
#[derive(Debug, Clone)]
pub struct TurnCommand {
    pub conversation_id: ConversationId,
    /// Present when the caller is signed in; enables path saving.
    pub user_id: Option<UserId>,
    pub utterance: String,
}

/// The reply to one turn.
///
/// `prompt_text` is always present; at most one of `learning_path` and
/// `tutorials` is set, and `learning_path_id` only when the path was
/// persisted for a signed-in user.
#[derive(Debug, Clone)]
pub struct TurnResponse {
    pub conversation_id: ConversationId,
    pub prompt_text: String,
    pub learning_path: Option<LearningPath>,
    pub learning_path_id: Option<LearningPathId>,
    pub tutorials: Option<Vec<SearchCandidate>>,
}

impl TurnResponse {
    fn ask(conversation_id: ConversationId, prompt_text: impl Into<String>) -> Self {
        Self {
            conversation_id,
            prompt_text: prompt_text.into(),
            learning_path: None,
            learning_path_id: None,
            tutorials: None,
        }
    }
}

/// Errors a turn can fail with. External-provider failures are absorbed
/// into the response instead; only storage failures surface here.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Session store failure: {0}")]
    Session(#[from] SessionStoreError),

    #[error("Path repository failure: {0}")]
    Repository(#[from] RepositoryError),
}

/// Use-case handler for conversation turns.
pub struct HandleTurnHandler {
    sessions: Arc<dyn SessionStore>,
    search: Arc<dyn VideoSearch>,
    paths: Arc<dyn PathRepository>,
    curation: CurationEngine,
    controller: DialogueController,
    max_results: u8,
}

impl HandleTurnHandler {
    /// Creates a handler over the given collaborators.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        search: Arc<dyn VideoSearch>,
        provider: Arc<dyn AiProvider>,
        paths: Arc<dyn PathRepository>,
    ) -> Self {
        Self {
            sessions,
            search,
            paths,
            curation: CurationEngine::new(provider),
            controller: DialogueController::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Sets the candidate batch size per search.
    pub fn with_max_results(mut self, max_results: u8) -> Self {
        self.max_results = max_results;
        self
    }

    /// Processes one turn.
    pub async fn handle(&self, command: TurnCommand) -> Result<TurnResponse, TurnError> {
        let mut session = match self.sessions.get(command.conversation_id).await? {
            Some(session) => session,
            None => {
                debug!(conversation = %command.conversation_id, "starting new conversation");
                ConversationSession::new(command.conversation_id)
            }
        };

        // Kept so a failed search can roll the whole turn back.
        let snapshot = session.clone();

        match self.controller.advance(&mut session, &command.utterance) {
            TurnAction::Ask { prompt } => {
                session.record_assistant(&prompt);
                self.sessions.put(session).await?;
                Ok(TurnResponse::ask(command.conversation_id, prompt))
            }
            TurnAction::Search(directive) => {
                self.run_search(command, session, snapshot, directive).await
            }
        }
    }

    async fn run_search(
        &self,
        command: TurnCommand,
        mut session: ConversationSession,
        snapshot: ConversationSession,
        directive: SearchDirective,
    ) -> Result<TurnResponse, TurnError> {
        let query = directive.query();
        info!(conversation = %command.conversation_id, query, "running video search");

        let candidates = match self.search.search(&query, self.max_results).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(error = %err, query, "search failed, rolling the turn back");
                self.sessions.put(snapshot).await?;
                return Ok(TurnResponse::ask(
                    command.conversation_id,
                    "I couldn't reach the video search just now. Please try that again in a moment.",
                ));
            }
        };

        if candidates.is_empty() {
            let prompt = format!(
                "I couldn't find any videos for {}. Could you describe it differently?",
                directive.topic
            );
            session.record_assistant(&prompt);
            self.sessions.put(session).await?;
            return Ok(TurnResponse::ask(command.conversation_id, prompt));
        }

        let context = session.recent_context(CONTEXT_MESSAGES);
        let request = CurationRequest {
            topic: &directive.topic,
            level: directive.level,
            goal: directive.goal,
            conversation_context: &context,
        };

        match self.curation.curate(&candidates, request).await {
            Some(path) => {
                let path_id = match command.user_id {
                    Some(owner) => Some(self.paths.save_path(owner, &path).await?),
                    None => None,
                };
                let prompt = path_summary(&path);
                session.record_assistant(&prompt);
                self.sessions.put(session).await?;
                Ok(TurnResponse {
                    conversation_id: command.conversation_id,
                    prompt_text: prompt,
                    learning_path: Some(path),
                    learning_path_id: path_id,
                    tutorials: None,
                })
            }
            None => {
                let prompt = format!(
                    "I couldn't put together a structured path this time, but here are the top {} tutorials I found.",
                    directive.topic
                );
                session.record_assistant(&prompt);
                self.sessions.put(session).await?;
                Ok(TurnResponse {
                    conversation_id: command.conversation_id,
                    prompt_text: prompt,
                    learning_path: None,
                    learning_path_id: None,
                    tutorials: Some(candidates),
                })
            }
        }
    }
}

fn path_summary(path: &LearningPath) -> String {
    format!(
        "Here's your {} learning path: {} stages, {} videos, about {} of watching.",
        path.topic,
        path.stages.len(),
        path.total_videos,
        path.estimated_total_time
    )
}
