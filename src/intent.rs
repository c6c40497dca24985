//! Intent detector - categorizes utterances by phrase containment

use serde::{Deserialize, Serialize};

/// Coarse conversational intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    Greeting,
    Farewell,
    Gratitude,
    None,
}

impl IntentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::Greeting => "greeting",
            IntentCategory::Farewell => "farewell",
            IntentCategory::Gratitude => "gratitude",
            IntentCategory::None => "none",
        }
    }
}

pub const GREETING_PHRASES: &[&str] = &[
    "hello", "hi", "hey", "greetings", "good morning", "good afternoon", "good evening",
];

pub const FAREWELL_PHRASES: &[&str] =
    &["bye", "goodbye", "see you", "talk later", "have a good day"];

pub const GRATITUDE_PHRASES: &[&str] = &["thank you", "thanks", "appreciate it", "grateful"];

pub const QUESTION_CUES: &[&str] = &["what", "who", "where", "when", "why", "how", "?"];

/// Priority order used by [`detect`]; the first list with a hit wins.
const PRIORITY: &[(IntentCategory, &[&str])] = &[
    (IntentCategory::Greeting, GREETING_PHRASES),
    (IntentCategory::Farewell, FAREWELL_PHRASES),
    (IntentCategory::Gratitude, GRATITUDE_PHRASES),
];

/// Independent flags describing an utterance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentSignals {
    pub is_greeting: bool,
    pub is_farewell: bool,
    pub is_question: bool,
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

/// Classify raw text. Matching is plain substring containment on the
/// lowercased text, so "this" counts as containing "hi".
pub fn detect(text: &str) -> IntentCategory {
    let lower = text.to_lowercase();

    PRIORITY
        .iter()
        .find(|(_, phrases)| contains_any(&lower, phrases))
        .map(|(category, _)| *category)
        .unwrap_or(IntentCategory::None)
}

/// Report every signal present in `text`, without priority.
pub fn extract_signals(text: &str) -> IntentSignals {
    let lower = text.to_lowercase();

    IntentSignals {
        is_greeting: contains_any(&lower, GREETING_PHRASES),
        is_farewell: contains_any(&lower, FAREWELL_PHRASES),
        is_question: contains_any(&lower, QUESTION_CUES),
    }
}
