//! Parley - a small conversational chatbot backend
//!
//! User input is matched against intent rules, a trained bag-of-words
//! classifier and the built-in corpus, always ending in a reply.

pub mod bot;
pub mod classifier;
pub mod config;
pub mod conversation;
pub mod corpus;
pub mod error;
pub mod intent;
pub mod llm;
pub mod nlp;
pub mod orchestrator;
pub mod responses;
pub mod store;

pub use bot::ChatBot;
pub use config::Config;
pub use error::{BotError, Result};
pub use orchestrator::{Orchestrator, Provenance, ResponseCandidate};
