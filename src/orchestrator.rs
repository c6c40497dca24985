//! Response orchestrator
//!
//! Tries each tier in order and returns the first answer:
//! canned intent response, trained classifier, substring match against the
//! built-in corpus, word-overlap match, random fallback. Tier failures are
//! logged and treated as "no answer"; the random fallback always answers.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error};

use crate::classifier::ModelTrainer;
use crate::corpus::{builtin_corpus, TrainingExample};
use crate::error::Result;
use crate::intent::{self, IntentCategory};
use crate::nlp::Normalizer;
use crate::responses::{self, CannedCategory};

/// Which tier produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    IntentBank,
    Classifier,
    SubstringMatch,
    WordOverlap,
    RandomFallback,
    Llm,
}

/// A chosen response and the tier it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseCandidate {
    pub text: String,
    pub provenance: Provenance,
}

/// Outcome of one tier: `Ok(Some)` answers, `Ok(None)` passes, `Err` fails
pub type TierResult = Result<Option<String>>;

pub struct Orchestrator {
    normalizer: Normalizer,
    trainer: Arc<ModelTrainer>,
    corpus: Vec<TrainingExample>,
    overlap_threshold: f64,
}

impl Orchestrator {
    /// Orchestrator matching against the built-in corpus
    pub fn new(trainer: Arc<ModelTrainer>, overlap_threshold: f64) -> Self {
        Self::with_corpus(trainer, builtin_corpus(), overlap_threshold)
    }

    /// Orchestrator with a custom fallback corpus, in match-priority order
    pub fn with_corpus(
        trainer: Arc<ModelTrainer>,
        corpus: Vec<TrainingExample>,
        overlap_threshold: f64,
    ) -> Self {
        Self {
            normalizer: Normalizer::default(),
            trainer,
            corpus,
            overlap_threshold,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn trainer(&self) -> &Arc<ModelTrainer> {
        &self.trainer
    }

    /// Respond to an utterance. Never fails and never returns an empty string.
    pub async fn respond(&self, utterance: &str) -> String {
        self.respond_with_provenance(utterance).await.text
    }

    pub async fn respond_with_provenance(&self, utterance: &str) -> ResponseCandidate {
        let candidate = self.select(utterance).await;
        debug!(
            provenance = ?candidate.provenance,
            "Responding to {:?}",
            utterance
        );
        candidate
    }

    async fn select(&self, utterance: &str) -> ResponseCandidate {
        let signals = intent::extract_signals(utterance);
        debug!(?signals, "Intent signals");

        if let Some(text) = settle("intent", self.intent_tier(utterance)) {
            return ResponseCandidate {
                text,
                provenance: Provenance::IntentBank,
            };
        }

        if let Some(text) = settle("classifier", self.classifier_tier(utterance).await) {
            return ResponseCandidate {
                text,
                provenance: Provenance::Classifier,
            };
        }

        if let Some(text) = settle("substring", self.substring_tier(utterance)) {
            return ResponseCandidate {
                text,
                provenance: Provenance::SubstringMatch,
            };
        }

        if let Some(text) = settle("overlap", self.overlap_tier(utterance)) {
            return ResponseCandidate {
                text,
                provenance: Provenance::WordOverlap,
            };
        }

        ResponseCandidate {
            text: responses::sample(CannedCategory::Fallback).to_string(),
            provenance: Provenance::RandomFallback,
        }
    }

    /// Canned response for a greeting, farewell or gratitude
    pub fn intent_tier(&self, utterance: &str) -> TierResult {
        let category = intent::detect(utterance);
        if category == IntentCategory::None {
            return Ok(None);
        }
        debug!("Detected {} intent", category.as_str());

        Ok(CannedCategory::for_intent(category).map(|c| responses::sample(c).to_string()))
    }

    /// Classifier prediction on the normalized utterance; trains lazily
    pub async fn classifier_tier(&self, utterance: &str) -> TierResult {
        let query = self.normalizer.normalize(utterance);
        if query.trim().is_empty() {
            return Ok(None);
        }

        self.trainer.ensure_trained().await?;
        let prediction = self.trainer.classifier().predict(&query)?;

        Ok(prediction.filter(|answer| !answer.trim().is_empty()))
    }

    /// First corpus question that contains, or is contained in, the utterance
    pub fn substring_tier(&self, utterance: &str) -> TierResult {
        let text = utterance.to_lowercase();
        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(self
            .corpus
            .iter()
            .find(|example| {
                let question = example.question.to_lowercase();
                text.contains(&question) || question.contains(&text)
            })
            .map(|example| example.answer.clone()))
    }

    /// Corpus question with the highest share of its words present in the
    /// utterance, if that share exceeds the threshold. Earlier questions win ties.
    pub fn overlap_tier(&self, utterance: &str) -> TierResult {
        let lowered = utterance.to_lowercase();
        let words: HashSet<&str> = lowered.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }

        let mut best: Option<(&TrainingExample, f64)> = None;
        for example in &self.corpus {
            let score = overlap_score(&words, &example.question);
            let best_score = best.map(|(_, s)| s).unwrap_or(0.0);
            if score > best_score {
                best = Some((example, score));
            }
        }

        Ok(best
            .filter(|(_, score)| *score > self.overlap_threshold)
            .map(|(example, score)| {
                debug!("Word overlap match (score: {:.2})", score);
                example.answer.clone()
            }))
    }
}

/// Share of the question's distinct words found in `words`
fn overlap_score(words: &HashSet<&str>, question: &str) -> f64 {
    let lowered = question.to_lowercase();
    let question_words: HashSet<&str> = lowered.split_whitespace().collect();
    if question_words.is_empty() {
        return 0.0;
    }

    let common = question_words.intersection(words).count();
    common as f64 / question_words.len() as f64
}

/// Collapse a tier result, logging failures
fn settle(tier: &str, result: TierResult) -> Option<String> {
    match result {
        Ok(answer) => answer,
        Err(e) => {
            error!("{} tier failed: {}", tier, e);
            None
        }
    }
}
