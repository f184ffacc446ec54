//! Table-driven intent classification for single utterances.
//!
//! Matching is case-insensitive substring matching against ordered keyword
//! tables. The first matching category wins; table order is the tie-break.
//! All functions are pure and deterministic given the static tables.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::slots::{LearningGoal, SkillLevel};

/// Utterances shorter than this (after trimming) are treated as unclear.
pub const MIN_CLEAR_LEN: usize = 3;

/// Topic candidates shorter than this are rejected.
pub const MIN_TOPIC_LEN: usize = 3;

/// Ordered keyword table for skill levels. First match wins.
const LEVEL_TABLE: &[(SkillLevel, &[&str])] = &[
    (
        SkillLevel::Beginner,
        &[
            "beginner",
            "newbie",
            "new to",
            "never",
            "no experience",
            "just starting",
            "starting out",
            "from scratch",
            "the basics",
            "novice",
            "first time",
            "complete noob",
        ],
    ),
    (
        SkillLevel::Intermediate,
        &[
            "intermediate",
            "some experience",
            "know the basics",
            "used it before",
            "familiar with",
            "comfortable with",
            "a little experience",
        ],
    ),
    (
        SkillLevel::Advanced,
        &[
            "advanced",
            "expert",
            "deep dive",
            "in depth",
            "in-depth",
            "mastery",
            "professional",
            "experienced",
        ],
    ),
];

/// Ordered keyword table for learning goals. First match wins.
const GOAL_TABLE: &[(LearningGoal, &[&str])] = &[
    (
        LearningGoal::Project,
        &[
            "project",
            "build",
            "make something",
            "create",
            "hands-on",
            "hands on",
            "portfolio",
            "practical",
        ],
    ),
    (
        LearningGoal::Concepts,
        &[
            "concept",
            "understand",
            "theory",
            "fundamentals",
            "deeply",
            "how it works",
            "why it works",
            "foundations",
        ],
    ),
    (
        LearningGoal::Quick,
        &[
            "quick",
            "fast",
            "crash course",
            "overview",
            "summary",
            "refresher",
            "brief",
            "short",
        ],
    ),
];

/// Hedge phrases matched as exact (whole-utterance) text.
static EXACT_HEDGES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "?", "idk", "dunno", "any", "anything", "whatever", "meh", "hm", "hmm", "eh",
    ]
    .into_iter()
    .collect()
});

/// Hedge phrases matched as substrings.
const SUBSTRING_HEDGES: &[&str] = &[
    "not sure",
    "no idea",
    "don't know",
    "dont know",
    "don't care",
    "dont care",
    "up to you",
    "you choose",
    "you decide",
    "no preference",
    "doesn't matter",
    "doesnt matter",
];

/// Canonical names of commonly-requested subjects.
///
/// Matched at word boundaries so "learn some python please" resolves to
/// "python" but "go" does not fire inside "algorithms". Longer names come
/// first so "machine learning" wins over "machine".
const KNOWN_TOPICS: &[&str] = &[
    "machine learning",
    "data science",
    "web development",
    "game development",
    "digital marketing",
    "graphic design",
    "public speaking",
    "javascript",
    "typescript",
    "kubernetes",
    "photography",
    "statistics",
    "photoshop",
    "python",
    "blender",
    "spanish",
    "android",
    "cooking",
    "drawing",
    "guitar",
    "docker",
    "django",
    "kotlin",
    "react",
    "excel",
    "linux",
    "swift",
    "piano",
    "rust",
    "java",
    "node",
    "unity",
    "c++",
    "sql",
    "aws",
    "git",
    "vue",
    "go",
];

/// Leading filler phrases stripped before treating text as a topic.
///
/// Order matters: longer phrases first so "i want to learn" is removed
/// before "i want to".
const FILLER_PREFIXES: &[&str] = &[
    "i would like to learn about",
    "i would like to learn",
    "i'd like to learn about",
    "i'd like to learn",
    "i want to learn about",
    "i want to learn",
    "i wanna learn",
    "i want to",
    "can you teach me about",
    "can you teach me",
    "could you teach me",
    "please teach me",
    "teach me about",
    "teach me",
    "help me learn",
    "help me with",
    "help me",
    "can you",
    "could you",
    "show me",
    "learn about",
    "learn",
    "how to",
];

/// Extracts a skill level from the utterance, if any keyword matches.
pub fn extract_skill_level(text: &str) -> Option<SkillLevel> {
    let lower = text.to_lowercase();
    for (level, keywords) in LEVEL_TABLE {
        if keywords.iter().any(|k| lower.contains(k)) {
            return Some(*level);
        }
    }
    None
}

/// Extracts a learning goal from the utterance, if any keyword matches.
pub fn extract_goal(text: &str) -> Option<LearningGoal> {
    let lower = text.to_lowercase();
    for (goal, keywords) in GOAL_TABLE {
        if keywords.iter().any(|k| lower.contains(k)) {
            return Some(*goal);
        }
    }
    None
}

/// Extracts a topic from the utterance.
///
/// Known subjects match first and return their canonical name. Otherwise
/// leading filler phrases are stripped and the remainder is returned when
/// long enough.
pub fn extract_topic(text: &str) -> Option<String> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    for topic in KNOWN_TOPICS {
        if contains_word(&lower, topic) {
            return Some((*topic).to_string());
        }
    }

    let stripped = strip_fillers(&lower);
    if stripped.len() >= MIN_TOPIC_LEN && !is_unclear(&stripped) {
        Some(stripped)
    } else {
        None
    }
}

/// Like [`extract_topic`], but only fires on strong topic signals: a known
/// subject name, or explicit learning phrasing ("teach me ...").
///
/// Used mid-conversation, where arbitrary text is usually an answer to the
/// pending question rather than a topic restatement.
pub fn extract_topic_strict(text: &str) -> Option<String> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    for topic in KNOWN_TOPICS {
        if contains_word(&lower, topic) {
            return Some((*topic).to_string());
        }
    }

    let stripped = strip_fillers(&lower);
    let had_filler = stripped != lower.trim_matches(['!', '.', '?', ' ']);
    if had_filler && stripped.len() >= MIN_TOPIC_LEN && !is_unclear(&stripped) {
        Some(stripped)
    } else {
        None
    }
}

/// Returns true if the utterance is a hedge or too short to carry intent.
pub fn is_unclear(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    if lower.len() < MIN_CLEAR_LEN {
        return true;
    }
    if EXACT_HEDGES.contains(lower.as_str()) {
        return true;
    }
    SUBSTRING_HEDGES.iter().any(|h| lower.contains(h))
}

/// Substring search that only matches at word boundaries.
///
/// A boundary is the string edge or any non-alphanumeric character, so
/// "c++" and "node" both match as whole words.
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut search_from = 0;
    while let Some(pos) = haystack[search_from..].find(needle) {
        let start = search_from + pos;
        let end = start + needle.len();
        let before_ok = start == 0
            || !haystack[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let after_ok = end == haystack.len()
            || !haystack[end..].chars().next().is_some_and(|c| c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        search_from = end;
    }
    false
}

/// Strips leading filler phrases and surrounding punctuation.
fn strip_fillers(lower: &str) -> String {
    let mut rest = lower.trim();
    let mut stripped_any = true;
    while stripped_any {
        stripped_any = false;
        for filler in FILLER_PREFIXES {
            if let Some(tail) = rest.strip_prefix(filler) {
                // Only strip at a word boundary, not inside a word.
                if tail.is_empty() || tail.starts_with([' ', ',', ':', '.']) {
                    rest = tail.trim_start_matches([' ', ',', ':', '.']);
                    stripped_any = true;
                }
            }
        }
    }
    rest.trim_matches(['!', '.', '?', ' ']).to_string()
}
