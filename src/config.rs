//! Configuration management for Parley

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether the LLM is consulted before the local pipeline
    pub llm_enabled: bool,

    /// Default LLM provider to use
    pub default_provider: String,

    /// Training data store settings
    pub storage: StorageConfig,

    /// Classifier settings
    pub model: ModelConfig,

    /// Fallback matching settings
    pub matching: MatchingConfig,

    /// LLM provider configurations
    pub providers: HashMap<String, ProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API endpoint URL
    pub endpoint: String,

    /// API key (can be env var reference like $GEMINI_API_KEY)
    pub api_key: String,

    /// Model to use
    pub model: String,

    /// Whether this provider is enabled
    pub enabled: bool,

    /// Max tokens for responses
    pub max_tokens: Option<u32>,

    /// Temperature setting
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Use the MySQL backend instead of PostgreSQL
    pub use_mysql: bool,

    /// PostgreSQL connection URL
    pub database_url: Option<String>,

    pub host: String,
    pub name: String,
    pub user: String,
    pub password: String,
    pub port: u16,

    /// Upper bound on acquiring a connection
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Where the trained classifier is persisted
    pub artifact_path: PathBuf,

    /// Vocabulary cap for the feature extractor
    pub max_features: usize,

    /// Additive smoothing for the naive Bayes classifier
    pub alpha: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum word-overlap score (exclusive) for the overlap fallback
    pub overlap_threshold: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            use_mysql: false,
            database_url: None,
            host: "localhost".to_string(),
            name: "chatbot".to_string(),
            user: "root".to_string(),
            password: String::new(),
            port: 3306,
            connect_timeout_secs: 5,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("parley")
                .join("chatbot_model.json"),
            max_features: 5000,
            alpha: 1.0,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut providers = HashMap::new();

        providers.insert(
            "gemini".to_string(),
            ProviderConfig {
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key: "$GEMINI_API_KEY".to_string(),
                model: "gemini-1.5-pro".to_string(),
                enabled: true,
                max_tokens: Some(512),
                temperature: Some(0.9),
            },
        );

        providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                endpoint: "http://localhost:11434".to_string(),
                api_key: String::new(),
                model: "llama3.2".to_string(),
                enabled: false,
                max_tokens: Some(512),
                temperature: Some(0.7),
            },
        );

        Self {
            llm_enabled: false,
            default_provider: "gemini".to_string(),
            storage: StorageConfig::default(),
            model: ModelConfig::default(),
            matching: MatchingConfig::default(),
            providers,
        }
    }
}

impl Config {
    /// Load config from file or create default, then apply environment overrides
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_path(),
        };

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save(&config_path)?;
            config
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parley")
            .join("config.toml")
    }

    /// Apply `USE_MYSQL`, `DATABASE_URL` and `DB_*` overrides from a lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = &mut self.storage;

        if let Some(flag) = lookup("USE_MYSQL") {
            storage.use_mysql = flag.eq_ignore_ascii_case("true");
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            storage.database_url = Some(url);
        }
        if let Some(host) = lookup("DB_HOST") {
            storage.host = host;
        }
        if let Some(name) = lookup("DB_NAME") {
            storage.name = name;
        }
        if let Some(user) = lookup("DB_USER") {
            storage.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            storage.password = password;
        }
        if let Some(port) = lookup("DB_PORT") {
            match port.parse() {
                Ok(port) => storage.port = port,
                Err(_) => tracing::warn!("Ignoring invalid DB_PORT value: {}", port),
            }
        }
    }

    /// Resolve API key from config (handles env var references)
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        self.providers.get(provider).and_then(|p| {
            if let Some(var) = p.api_key.strip_prefix('$') {
                std::env::var(var).ok().filter(|k| !k.is_empty())
            } else if p.api_key.is_empty() {
                None
            } else {
                Some(p.api_key.clone())
            }
        })
    }
}
