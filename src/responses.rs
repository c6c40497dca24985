//! Canned response bank

use rand::seq::SliceRandom;
use rand::Rng;

use crate::intent::IntentCategory;

pub const GREETING_RESPONSES: &[&str] = &[
    "Hello! How can I help you today?",
    "Hi there! What can I do for you?",
    "Greetings! How may I assist you?",
    "Hey! What can I help you with today?",
    "Hello! I'm here to help. What do you need?",
];

pub const FAREWELL_RESPONSES: &[&str] = &[
    "Goodbye! Have a great day!",
    "See you later! Feel free to chat again anytime.",
    "Bye for now! Come back if you have more questions.",
    "Farewell! Thanks for chatting.",
    "Take care! I'll be here if you need help again.",
];

pub const GRATITUDE_RESPONSES: &[&str] = &[
    "You're welcome!",
    "Happy to help!",
    "No problem at all!",
    "Anytime! That's what I'm here for.",
    "Glad I could be of assistance!",
];

pub const FALLBACK_RESPONSES: &[&str] = &[
    "I'm not sure I understand. Could you rephrase that?",
    "I don't have an answer for that right now. Could you ask something else?",
    "I'm still learning! That's a bit beyond my current knowledge.",
    "Interesting question! I don't have a specific answer for that yet.",
    "I'm not sure about that. Is there something else I can help with?",
    "I'm having trouble understanding that request. Could you try again?",
    "I don't have enough information to answer that question properly.",
    "That's a good question, but I don't have a good answer for it yet.",
    "I'm sorry, I couldn't process that correctly. Could you try asking differently?",
];

/// Response categories with a fixed candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedCategory {
    Greeting,
    Farewell,
    Gratitude,
    Fallback,
}

impl CannedCategory {
    /// Canned category for a detected intent, if it has one
    pub fn for_intent(intent: IntentCategory) -> Option<Self> {
        match intent {
            IntentCategory::Greeting => Some(CannedCategory::Greeting),
            IntentCategory::Farewell => Some(CannedCategory::Farewell),
            IntentCategory::Gratitude => Some(CannedCategory::Gratitude),
            IntentCategory::None => None,
        }
    }

    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            CannedCategory::Greeting => GREETING_RESPONSES,
            CannedCategory::Farewell => FAREWELL_RESPONSES,
            CannedCategory::Gratitude => GRATITUDE_RESPONSES,
            CannedCategory::Fallback => FALLBACK_RESPONSES,
        }
    }
}

/// Uniform pick from the category's candidates
pub fn sample_with<R: Rng + ?Sized>(category: CannedCategory, rng: &mut R) -> &'static str {
    category
        .candidates()
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_RESPONSES[0])
}

/// Uniform pick using the thread-local RNG
pub fn sample(category: CannedCategory) -> &'static str {
    sample_with(category, &mut rand::thread_rng())
}
