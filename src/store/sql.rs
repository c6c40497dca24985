//! sqlx-backed training data sources

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use super::TrainingSource;
use crate::config::StorageConfig;
use crate::corpus::TrainingExample;
use crate::error::{BotError, Result};

const ACTIVE_ROWS_QUERY: &str = "SELECT question, answer FROM training_data WHERE is_active = TRUE";

fn into_examples(rows: Vec<(String, String)>) -> Vec<TrainingExample> {
    rows.into_iter()
        .map(|(question, answer)| TrainingExample::new(question, answer))
        .collect()
}

/// PostgreSQL source addressed by a connection URL
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    /// Builds a lazy pool; nothing connects until the first fetch.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| BotError::Config("DATABASE_URL not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_lazy(url)?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl TrainingSource for PostgresSource {
    async fn fetch_active(&self) -> Result<Vec<TrainingExample>> {
        let rows: Vec<(String, String)> = sqlx::query_as(ACTIVE_ROWS_QUERY)
            .fetch_all(&self.pool)
            .await?;

        info!("Retrieved {} training rows from PostgreSQL", rows.len());
        Ok(into_examples(rows))
    }

    fn name(&self) -> &str {
        "postgres"
    }
}

/// MySQL source addressed by host, database, user, password and port
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    /// Builds a lazy pool; nothing connects until the first fetch.
    pub fn new(config: &StorageConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_lazy_with(options);

        Self { pool }
    }
}

#[async_trait]
impl TrainingSource for MySqlSource {
    async fn fetch_active(&self) -> Result<Vec<TrainingExample>> {
        let rows: Vec<(String, String)> = sqlx::query_as(ACTIVE_ROWS_QUERY)
            .fetch_all(&self.pool)
            .await?;

        info!("Retrieved {} training rows from MySQL", rows.len());
        Ok(into_examples(rows))
    }

    fn name(&self) -> &str {
        "mysql"
    }
}
