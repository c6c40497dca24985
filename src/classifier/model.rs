//! Fitted classifier: tf-idf features feeding naive Bayes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::naive_bayes::MultinomialNb;
use super::vectorizer::{SparseRow, TfidfVectorizer};
use crate::corpus::{DataOrigin, TrainingExample};
use crate::error::{BotError, Result};

/// Immutable fitted model. Each answer string is a class label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub version: u64,
    pub trained_at: DateTime<Utc>,
    pub origin: DataOrigin,
    pub examples: usize,
    vectorizer: TfidfVectorizer,
    classifier: MultinomialNb,
}

impl TrainedModel {
    pub fn fit(
        examples: &[TrainingExample],
        max_features: usize,
        alpha: f64,
        version: u64,
        origin: DataOrigin,
    ) -> Result<Self> {
        if examples.is_empty() {
            return Err(BotError::EmptyTrainingSet);
        }

        let questions: Vec<&str> = examples.iter().map(|e| e.question.as_str()).collect();
        let answers: Vec<&str> = examples.iter().map(|e| e.answer.as_str()).collect();

        let vectorizer = TfidfVectorizer::fit(&questions, max_features)?;
        let rows: Vec<SparseRow> = questions.iter().map(|q| vectorizer.transform(q)).collect();
        let classifier = MultinomialNb::fit(&rows, &answers, vectorizer.len(), alpha)?;

        Ok(Self {
            version,
            trained_at: Utc::now(),
            origin,
            examples: examples.len(),
            vectorizer,
            classifier,
        })
    }

    /// Most probable answer, or `None` when the query shares no term with
    /// the training vocabulary.
    pub fn predict(&self, query: &str) -> Option<String> {
        let row = self.vectorizer.transform(query);
        if row.is_empty() {
            return None;
        }
        self.classifier.predict(&row).map(str::to_string)
    }

    /// Check internal consistency, e.g. after deserializing
    pub fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;
        self.classifier.validate(self.vectorizer.len())
    }

    pub fn classes(&self) -> usize {
        self.classifier.classes().len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.len()
    }
}
