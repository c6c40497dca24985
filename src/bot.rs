//! Chatbot assembly: wires config, training source, classifier, orchestrator
//! and the optional LLM into one handle

use std::sync::Arc;
use tracing::{info, warn};

use crate::classifier::{Classifier, ModelTrainer, UpdateOutcome};
use crate::config::Config;
use crate::conversation::Conversation;
use crate::llm::LlmProxy;
use crate::orchestrator::{Orchestrator, Provenance, ResponseCandidate};
use crate::store::{create_source, TrainingSource};

/// Shared chatbot state; cheap to put behind an `Arc` and use from many tasks
pub struct ChatBot {
    orchestrator: Orchestrator,
    llm: Option<LlmProxy>,
}

impl ChatBot {
    /// Build from configuration. Must be called inside a tokio runtime.
    ///
    /// An unusable store configuration is logged and the built-in corpus is
    /// used instead; a stored model artifact is loaded if present.
    pub fn from_config(config: &Config) -> Self {
        let source: Option<Box<dyn TrainingSource>> = match create_source(&config.storage) {
            Ok(source) => {
                info!("Training data source: {}", source.name());
                Some(source)
            }
            Err(e) => {
                warn!("Training data store unavailable: {}", e);
                None
            }
        };

        let classifier = Arc::new(Classifier::load(&config.model));
        let trainer = Arc::new(ModelTrainer::new(classifier, source));
        let orchestrator = Orchestrator::new(trainer, config.matching.overlap_threshold);

        let llm = LlmProxy::from_config(config);
        if let Some(proxy) = &llm {
            info!("LLM enrichment enabled via {}", proxy.name());
        }

        Self::new(orchestrator, llm)
    }

    pub fn new(orchestrator: Orchestrator, llm: Option<LlmProxy>) -> Self {
        Self { orchestrator, llm }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_some()
    }

    /// Local pipeline only
    pub async fn respond(&self, utterance: &str) -> String {
        self.orchestrator.respond(utterance).await
    }

    /// Respond within a conversation: the LLM (when enabled) sees the prior
    /// turns; any LLM failure falls back to the local pipeline. Both turns
    /// are recorded.
    pub async fn respond_in(
        &self,
        conversation: &mut Conversation,
        utterance: &str,
    ) -> ResponseCandidate {
        let candidate = match self.ask_llm(conversation, utterance).await {
            Some(text) => ResponseCandidate {
                text,
                provenance: Provenance::Llm,
            },
            None => self.orchestrator.respond_with_provenance(utterance).await,
        };

        conversation.push_user(utterance);
        conversation.push_bot(candidate.text.clone());
        candidate
    }

    async fn ask_llm(&self, conversation: &Conversation, utterance: &str) -> Option<String> {
        let proxy = self.llm.as_ref()?;
        proxy.ask(utterance, &conversation.history()).await
    }

    /// Retrain from the best available data and persist the model
    pub async fn update_model(&self) -> UpdateOutcome {
        self.orchestrator.trainer().update().await
    }
}
