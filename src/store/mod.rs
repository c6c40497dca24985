//! Training data sources
//!
//! Active question/answer rows come from a relational store when one is
//! configured; the built-in corpus covers every other case.

mod sql;

pub use sql::*;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::StorageConfig;
use crate::corpus::{active_only, builtin_corpus, DataOrigin, TrainingExample};
use crate::error::Result;

/// A backend that can list active training examples
#[async_trait]
pub trait TrainingSource: Send + Sync {
    async fn fetch_active(&self) -> Result<Vec<TrainingExample>>;
    fn name(&self) -> &str;
}

/// Fixed in-memory source, handy for seeding and tests
pub struct StaticSource {
    examples: Vec<TrainingExample>,
}

impl StaticSource {
    pub fn new(examples: Vec<TrainingExample>) -> Self {
        Self { examples }
    }
}

#[async_trait]
impl TrainingSource for StaticSource {
    async fn fetch_active(&self) -> Result<Vec<TrainingExample>> {
        Ok(self.examples.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Factory function to create the configured backend.
///
/// Must run inside a tokio runtime since the pools are created lazily on it.
pub fn create_source(config: &StorageConfig) -> Result<Box<dyn TrainingSource>> {
    if config.use_mysql {
        Ok(Box::new(MySqlSource::new(config)))
    } else {
        Ok(Box::new(PostgresSource::new(config)?))
    }
}

/// Fetch the best available training data: store rows first, then the
/// built-in corpus. Never returns an empty set.
pub async fn load_training_data(
    source: Option<&dyn TrainingSource>,
) -> (Vec<TrainingExample>, DataOrigin) {
    if let Some(source) = source {
        match source.fetch_active().await {
            Ok(rows) => {
                let rows = active_only(rows);
                if !rows.is_empty() {
                    return (rows, DataOrigin::Store(source.name().to_string()));
                }
                warn!("{} returned no active training rows", source.name());
            }
            Err(e) => error!("Failed to fetch training data from {}: {}", source.name(), e),
        }
    }

    info!("Using built-in training corpus");
    (builtin_corpus(), DataOrigin::Builtin)
}
