//! Training orchestration: data source selection, lazy first training, updates

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};

use super::{Classifier, TrainReport};
use crate::corpus::{DataOrigin, TrainingExample};
use crate::error::Result;
use crate::store::{load_training_data, TrainingSource};

/// Result of an explicit model update
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: String,
    pub report: Option<TrainReport>,
}

/// Serializes training passes over a shared [`Classifier`]
pub struct ModelTrainer {
    classifier: Arc<Classifier>,
    source: Option<Box<dyn TrainingSource>>,
    training: Mutex<()>,
}

impl ModelTrainer {
    pub fn new(classifier: Arc<Classifier>, source: Option<Box<dyn TrainingSource>>) -> Self {
        Self {
            classifier,
            source,
            training: Mutex::new(()),
        }
    }

    pub fn classifier(&self) -> &Arc<Classifier> {
        &self.classifier
    }

    /// Retrain from the best available data (store first, then built-in corpus)
    pub async fn train(&self) -> Result<TrainReport> {
        let _guard = self.training.lock().await;
        self.train_locked().await
    }

    /// Retrain from caller-supplied examples
    pub async fn train_with(&self, examples: &[TrainingExample]) -> Result<TrainReport> {
        let _guard = self.training.lock().await;
        self.classifier.train(examples, DataOrigin::Supplied)
    }

    /// Train once if no model exists yet. Concurrent callers wait for the
    /// first pass instead of starting their own.
    pub async fn ensure_trained(&self) -> Result<()> {
        if self.classifier.is_trained() {
            return Ok(());
        }

        let _guard = self.training.lock().await;
        if self.classifier.is_trained() {
            debug!("Model trained by a concurrent request");
            return Ok(());
        }

        self.train_locked().await.map(|_| ())
    }

    /// Retrain and report the outcome without failing
    pub async fn update(&self) -> UpdateOutcome {
        match self.train().await {
            Ok(report) => UpdateOutcome {
                success: true,
                message: format!(
                    "Model updated successfully (v{}, {} examples from {})",
                    report.version, report.examples, report.origin
                ),
                report: Some(report),
            },
            Err(e) => {
                error!("Model update failed: {}", e);
                UpdateOutcome {
                    success: false,
                    message: format!("Model update failed: {}", e),
                    report: None,
                }
            }
        }
    }

    async fn train_locked(&self) -> Result<TrainReport> {
        let (examples, origin) = load_training_data(self.source.as_deref()).await;
        self.classifier.train(&examples, origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::store::StaticSource;

    fn classifier(dir: &std::path::Path) -> Arc<Classifier> {
        Arc::new(Classifier::new(&ModelConfig {
            artifact_path: dir.join("model.json"),
            ..ModelConfig::default()
        }))
    }

    #[tokio::test]
    async fn test_ensure_trained_uses_builtin_without_source() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(classifier(dir.path()), None);

        trainer.ensure_trained().await.unwrap();

        let model = trainer.classifier().snapshot().unwrap();
        assert_eq!(model.origin, DataOrigin::Builtin);
    }

    #[tokio::test]
    async fn test_ensure_trained_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(classifier(dir.path()), None);

        trainer.ensure_trained().await.unwrap();
        trainer.ensure_trained().await.unwrap();

        assert_eq!(trainer.classifier().version(), Some(1));
    }

    #[tokio::test]
    async fn test_concurrent_ensure_trained_trains_once() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = Arc::new(ModelTrainer::new(classifier(dir.path()), None));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let trainer = Arc::clone(&trainer);
                tokio::spawn(async move { trainer.ensure_trained().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(trainer.classifier().version(), Some(1));
    }

    #[tokio::test]
    async fn test_store_rows_win() {
        let dir = tempfile::tempdir().unwrap();
        let source = StaticSource::new(vec![TrainingExample::new("what is rust", "A language.")]);
        let trainer = ModelTrainer::new(classifier(dir.path()), Some(Box::new(source)));

        let report = trainer.train().await.unwrap();

        assert_eq!(report.origin, DataOrigin::Store("static".to_string()));
        assert_eq!(
            trainer.classifier().predict("rust").unwrap().as_deref(),
            Some("A language.")
        );
    }

    #[tokio::test]
    async fn test_update_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(classifier(dir.path()), None);

        let outcome = trainer.update().await;

        assert!(outcome.success);
        assert!(outcome.message.contains("updated successfully"));
        assert_eq!(outcome.report.unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_train_with_empty_examples_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(classifier(dir.path()), None);
        trainer.ensure_trained().await.unwrap();

        assert!(trainer.train_with(&[]).await.is_err());
        assert_eq!(trainer.classifier().version(), Some(1));
    }
}
