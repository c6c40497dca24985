//! Error types for Parley

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No training examples available")]
    EmptyTrainingSet,

    #[error("Classifier has not been trained")]
    NotTrained,

    #[error("Model error: {0}")]
    Model(String),

    #[error("Text processing error: {0}")]
    Text(String),

    #[error("LLM provider error: {0}")]
    Provider(String),

    #[error("No API key configured for {0}")]
    MissingApiKey(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
