//! Training examples and the built-in corpus

use serde::{Deserialize, Serialize};

/// A question/answer pair used to train the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub question: String,
    pub answer: String,
    pub active: bool,
}

impl TrainingExample {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            active: true,
        }
    }
}

/// Where a training set came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    /// Rows from the named relational backend
    Store(String),
    /// The built-in corpus
    Builtin,
    /// Examples handed in directly by the caller
    Supplied,
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataOrigin::Store(name) => write!(f, "{} store", name),
            DataOrigin::Builtin => write!(f, "built-in corpus"),
            DataOrigin::Supplied => write!(f, "supplied examples"),
        }
    }
}

const BUILTIN: &[(&str, &str)] = &[
    // Greetings
    ("hello", "Hello! How can I help you today?"),
    ("hi", "Hi there! What can I do for you?"),
    ("hey there", "Hey! What can I help you with?"),
    ("good morning", "Good morning! How can I assist you today?"),
    ("good afternoon", "Good afternoon! How may I help you?"),
    ("good evening", "Good evening! What can I do for you today?"),
    // General questions
    ("how are you", "I'm doing well, thank you for asking! How can I assist you?"),
    ("what is your name", "I'm a chatbot assistant. You can call me ChatBot."),
    (
        "what can you do",
        "I can answer questions, have a conversation, and help you find information.",
    ),
    (
        "who made you",
        "I was created by a development team to assist users with information and conversation.",
    ),
    (
        "what is your purpose",
        "I'm here to provide information, answer questions, and assist you with various tasks.",
    ),
    // Farewells
    ("goodbye", "Goodbye! Feel free to chat again anytime."),
    ("bye", "Bye! Have a great day!"),
    ("see you later", "See you later! Come back if you need more help."),
    ("talk to you later", "Talk to you later! I'll be here when you need me."),
    // Gratitude
    ("thank you", "You're welcome! Is there anything else I can help with?"),
    ("thanks", "Happy to help! Let me know if you need anything else."),
    (
        "appreciate it",
        "No problem at all! Feel free to ask if you have more questions.",
    ),
    // Fun
    (
        "tell me a joke",
        "Why don't scientists trust atoms? Because they make up everything!",
    ),
    ("say something funny", "What do you call a fake noodle? An impasta!"),
    (
        "another joke",
        "Why did the scarecrow win an award? Because he was outstanding in his field!",
    ),
    // Knowledge
    (
        "what is water",
        "Water is a transparent, tasteless, odorless, and nearly colorless chemical substance that is the main constituent of Earth's streams, lakes, and oceans, and the fluids of most living organisms.",
    ),
    (
        "what is ice",
        "Ice is water frozen into a solid state. It can appear transparent or opaque bluish-white color depending on the presence of impurities or air inclusions.",
    ),
    (
        "what is the sun",
        "The Sun is the star at the center of our Solar System. It's a nearly perfect sphere of hot plasma, with internal convective motion that generates a magnetic field.",
    ),
    (
        "what is the moon",
        "The Moon is Earth's only natural satellite. It's about a quarter of Earth's diameter and is the fifth largest satellite in the Solar System.",
    ),
    (
        "what is a star",
        "A star is an astronomical object consisting of a luminous spheroid of plasma held together by its own gravity.",
    ),
    (
        "who is the president",
        "I don't have real-time information about current political leaders. You would need to check a reliable news source for up-to-date information.",
    ),
    (
        "what is a computer",
        "A computer is an electronic device that manipulates information, or data. It can store, retrieve, and process data.",
    ),
    (
        "what is artificial intelligence",
        "Artificial intelligence (AI) is intelligence demonstrated by machines, unlike the natural intelligence displayed by humans and animals.",
    ),
    (
        "what is machine learning",
        "Machine learning is a field of inquiry devoted to understanding and building methods that 'learn', that is, methods that leverage data to improve performance on some set of tasks.",
    ),
    // Time-related
    (
        "what time is it",
        "I don't have access to real-time information like the current time. You can check your device's clock for that information.",
    ),
    (
        "what day is it today",
        "I don't have access to real-time calendar information. You can check your device's calendar for the current date.",
    ),
    (
        "what is the date",
        "I don't have access to the current date. You might want to check your device's calendar for that information.",
    ),
    // Help
    (
        "how does this work",
        "You can type any message or question, and I'll try to respond appropriately. I can provide information on various topics or just chat.",
    ),
    (
        "help me",
        "I'm here to assist you. Just type your question or what you need help with, and I'll do my best to help you.",
    ),
    (
        "I need assistance",
        "What do you need assistance with? Feel free to ask any question, and I'll try to provide a helpful response.",
    ),
    (
        "how do I use this",
        "This is a chat interface. Simply type your message or question, and I'll respond as helpfully as I can.",
    ),
];

/// The built-in corpus, in its fixed order. Never empty.
pub fn builtin_corpus() -> Vec<TrainingExample> {
    BUILTIN
        .iter()
        .map(|(question, answer)| TrainingExample::new(*question, *answer))
        .collect()
}

/// Keep only active examples with a non-blank question and answer
pub fn active_only(examples: Vec<TrainingExample>) -> Vec<TrainingExample> {
    examples
        .into_iter()
        .filter(|e| e.active && !e.question.trim().is_empty() && !e.answer.trim().is_empty())
        .collect()
}
