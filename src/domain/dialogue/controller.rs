//! Dialogue controller: the per-turn stage machine.
//!
//! Given the current session and a new utterance, updates slots via the
//! intent classifier, decides the next stage, and produces either a single
//! clarifying question or a directive to run the video search.
//!
//! Policy:
//! - At most one question per turn, in fixed priority order: topic, then
//!   skill level, then goal.
//! - A missing slot is re-asked at most once; after that a conservative
//!   default is applied (beginner / concept-focused).
//! - Reset phrases return to the greeting from any stage and clear slots.
//! - In the results stage, an utterance with no lexical overlap with the
//!   stored topic is treated as a brand-new topic unless it contains
//!   follow-up vocabulary.

use super::intent;
use super::session::ConversationSession;
use super::slots::{LearningGoal, SkillLevel};
use super::stage::DialogueStage;

/// Tokens at least this long count toward the new-topic overlap check.
///
/// Tunable heuristic, not a load-bearing constant.
pub const SIGNIFICANT_TOKEN_MIN_LEN: usize = 3;

/// An utterance needs more than this many significant tokens before a
/// zero-overlap utterance is treated as a new topic.
///
/// Tunable heuristic, not a load-bearing constant.
pub const NEW_TOPIC_MIN_TOKENS: usize = 2;

/// Utterances longer than this are rejected with a neutral re-prompt.
pub const MAX_UTTERANCE_LEN: usize = 2_000;

/// Phrases that unconditionally restart the conversation.
const RESET_PHRASES: &[&str] = &["start over", "something else", "different", "reset"];

/// Vocabulary that marks an utterance as a follow-up to the current
/// results rather than a new topic.
const FOLLOW_UP_WORDS: &[&str] = &["more", "similar", "another", "also"];

/// Neutral re-prompt for empty or malformed input.
const NEUTRAL_REPROMPT: &str = "What would you like to learn?";

/// What the caller should do after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnAction {
    /// Ask the user the given clarifying question.
    Ask { prompt: String },
    /// Run the video search with the resolved slots.
    Search(SearchDirective),
}

/// Resolved slots plus an optional refinement term, ready for search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDirective {
    pub topic: String,
    pub level: SkillLevel,
    pub goal: LearningGoal,
    /// Extra terms from a follow-up utterance in the results stage.
    pub refinement: Option<String>,
}

impl SearchDirective {
    /// Assembles the provider query deterministically from the slots.
    pub fn query(&self) -> String {
        let mut query = format!(
            "{} {} {}",
            self.topic,
            self.level.query_modifier(),
            self.goal.query_modifier()
        );
        if let Some(refinement) = &self.refinement {
            query.push(' ');
            query.push_str(refinement);
        }
        query
    }
}

/// Stateless turn processor over [`ConversationSession`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogueController;

impl DialogueController {
    /// Creates a new controller.
    pub fn new() -> Self {
        Self
    }

    /// Processes one utterance against the session.
    ///
    /// Mutates the session's stage and transcript; empty or oversized
    /// input leaves the session untouched and yields a neutral re-prompt.
    pub fn advance(&self, session: &mut ConversationSession, utterance: &str) -> TurnAction {
        let text = utterance.trim();
        if text.is_empty() || text.len() > MAX_UTTERANCE_LEN {
            return TurnAction::Ask {
                prompt: NEUTRAL_REPROMPT.to_string(),
            };
        }

        session.record_user(text);

        if is_reset(text) {
            session.reset();
            return TurnAction::Ask {
                prompt: "Okay, let's start fresh. What would you like to learn?".to_string(),
            };
        }

        match session.stage.clone() {
            DialogueStage::Greeting => self.on_greeting(session, text),
            DialogueStage::GotTopic { topic } => self.on_got_topic(session, text, topic),
            DialogueStage::GotLevel { topic, level } => {
                self.on_got_level(session, text, topic, level)
            }
            DialogueStage::ReadyToSearch { topic, level, goal }
            | DialogueStage::Results { topic, level, goal } => {
                self.on_results(session, text, topic, level, goal)
            }
        }
    }

    /// First contact: any non-empty text is a topic candidate. If the same
    /// utterance also carries level and goal, skip straight to search.
    fn on_greeting(&self, session: &mut ConversationSession, text: &str) -> TurnAction {
        let topic = intent::extract_topic(text).unwrap_or_else(|| text.to_lowercase());
        let level = intent::extract_skill_level(text);
        let goal = intent::extract_goal(text);

        match (level, goal) {
            (Some(level), Some(goal)) => self.start_search(session, topic, level, goal, None),
            (Some(level), None) => {
                session.advance_to(DialogueStage::GotLevel {
                    topic: topic.clone(),
                    level,
                });
                TurnAction::Ask {
                    prompt: ask_goal(),
                }
            }
            _ => {
                let prompt = ask_level(&topic);
                session.advance_to(DialogueStage::GotTopic { topic });
                TurnAction::Ask { prompt }
            }
        }
    }

    /// Topic known, hunting for a skill level.
    fn on_got_topic(
        &self,
        session: &mut ConversationSession,
        text: &str,
        topic: String,
    ) -> TurnAction {
        // The user may restate or sharpen the topic before answering.
        let mut topic = topic;
        let mut topic_changed = false;
        if let Some(new_topic) = intent::extract_topic_strict(text) {
            if new_topic != topic {
                topic = new_topic;
                topic_changed = true;
            }
        }

        match intent::extract_skill_level(text) {
            Some(level) => self.with_level(session, text, topic, level),
            None if topic_changed => {
                let prompt = ask_level(&topic);
                session.advance_to(DialogueStage::GotTopic { topic });
                TurnAction::Ask { prompt }
            }
            None if intent::is_unclear(text) => {
                // Default rather than re-ask a hedging user.
                self.with_level(session, text, topic, SkillLevel::default())
            }
            None => {
                if session.clarify_attempts == 0 {
                    session.clarify_attempts = 1;
                    TurnAction::Ask {
                        prompt: ask_level_retry(),
                    }
                } else {
                    self.with_level(session, text, topic, SkillLevel::default())
                }
            }
        }
    }

    /// Level just resolved; chain to goal if it came in the same utterance.
    fn with_level(
        &self,
        session: &mut ConversationSession,
        text: &str,
        topic: String,
        level: SkillLevel,
    ) -> TurnAction {
        if let Some(goal) = intent::extract_goal(text) {
            return self.start_search(session, topic, level, goal, None);
        }
        session.advance_to(DialogueStage::GotLevel { topic, level });
        TurnAction::Ask {
            prompt: ask_goal(),
        }
    }

    /// Topic and level known, hunting for a goal.
    fn on_got_level(
        &self,
        session: &mut ConversationSession,
        text: &str,
        topic: String,
        level: SkillLevel,
    ) -> TurnAction {
        // A corrected level is accepted at any point.
        let level = intent::extract_skill_level(text).unwrap_or(level);

        match intent::extract_goal(text) {
            Some(goal) => self.start_search(session, topic, level, goal, None),
            None if intent::is_unclear(text) => {
                self.start_search(session, topic, level, LearningGoal::default(), None)
            }
            None => {
                if session.clarify_attempts == 0 {
                    session.clarify_attempts = 1;
                    session.stage = DialogueStage::GotLevel {
                        topic,
                        level,
                    };
                    TurnAction::Ask {
                        prompt: ask_goal_retry(),
                    }
                } else {
                    self.start_search(session, topic, level, LearningGoal::default(), None)
                }
            }
        }
    }

    /// Results stage: refinements re-search, slot updates re-search, and a
    /// materially different topic restarts slot collection.
    fn on_results(
        &self,
        session: &mut ConversationSession,
        text: &str,
        topic: String,
        level: SkillLevel,
        goal: LearningGoal,
    ) -> TurnAction {
        if let Some(new_level) = intent::extract_skill_level(text) {
            return self.start_search(session, topic, new_level, goal, None);
        }
        if let Some(new_goal) = intent::extract_goal(text) {
            return self.start_search(session, topic, level, new_goal, None);
        }

        if is_new_topic(&topic, text) {
            let new_topic = intent::extract_topic(text).unwrap_or_else(|| text.to_lowercase());
            let prompt = ask_level(&new_topic);
            session.advance_to(DialogueStage::GotTopic { topic: new_topic });
            return TurnAction::Ask { prompt };
        }

        // Anything else refines the existing search.
        self.start_search(session, topic, level, goal, Some(text.to_lowercase()))
    }

    /// Moves the session to the results stage and emits a search directive.
    fn start_search(
        &self,
        session: &mut ConversationSession,
        topic: String,
        level: SkillLevel,
        goal: LearningGoal,
        refinement: Option<String>,
    ) -> TurnAction {
        session.advance_to(DialogueStage::Results {
            topic: topic.clone(),
            level,
            goal,
        });
        TurnAction::Search(SearchDirective {
            topic,
            level,
            goal,
            refinement,
        })
    }
}

/// Returns true if the utterance contains a reset phrase.
///
/// Matched at word boundaries so "differential equations" is a topic,
/// not a reset.
fn is_reset(text: &str) -> bool {
    let lower = text.to_lowercase();
    RESET_PHRASES.iter().any(|p| intent::contains_word(&lower, p))
}

/// Word-overlap heuristic for detecting a topic change in the results
/// stage. Follow-up vocabulary always pins the utterance to the current
/// topic.
fn is_new_topic(stored_topic: &str, text: &str) -> bool {
    let lower = text.to_lowercase();
    let utterance_tokens = significant_tokens(&lower);

    if utterance_tokens
        .iter()
        .any(|t| FOLLOW_UP_WORDS.contains(&t.as_str()))
    {
        return false;
    }

    let topic_tokens = significant_tokens(&stored_topic.to_lowercase());
    let overlaps = utterance_tokens.iter().any(|t| topic_tokens.contains(t));

    !overlaps && utterance_tokens.len() > NEW_TOPIC_MIN_TOKENS
}

/// Lower-cased alphanumeric tokens long enough to carry meaning.
fn significant_tokens(lower: &str) -> Vec<String> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= SIGNIFICANT_TOKEN_MIN_LEN)
        .map(|t| t.to_string())
        .collect()
}

fn ask_level(topic: &str) -> String {
    format!(
        "Got it, {}! How experienced are you: beginner, intermediate, or advanced?",
        topic
    )
}

fn ask_level_retry() -> String {
    "Just so I pitch this right, would you say you're a beginner, intermediate, or advanced?"
        .to_string()
}

fn ask_goal() -> String {
    "How do you like to learn: building a project, understanding the concepts, or a quick overview?"
        .to_string()
}

fn ask_goal_retry() -> String {
    "Which sounds closest: building a project, digging into the concepts, or a quick overview?"
        .to_string()
}
