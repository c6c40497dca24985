//! Trained answer classifier
//!
//! [`Classifier`] is a shared handle around an immutable [`TrainedModel`]
//! snapshot. Lookups clone the current `Arc` and predict without holding the
//! snapshot lock. Training passes run one at a time: each takes the next
//! version, fits, persists, then swaps the snapshot in, so the artifact on
//! disk and the snapshot in memory always carry the newest version.
//! A failed fit or save leaves the previous snapshot in place.

mod artifact;
mod model;
mod naive_bayes;
mod trainer;
mod vectorizer;

pub use artifact::*;
pub use model::*;
pub use naive_bayes::*;
pub use trainer::*;
pub use vectorizer::*;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::ModelConfig;
use crate::corpus::{active_only, DataOrigin, TrainingExample};
use crate::error::{BotError, Result};

/// Summary of a successful training pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainReport {
    pub version: u64,
    pub examples: usize,
    pub classes: usize,
    pub vocabulary: usize,
    pub origin: DataOrigin,
}

pub struct Classifier {
    current: RwLock<Option<Arc<TrainedModel>>>,
    next_version: AtomicU64,
    training: Mutex<()>,
    artifacts: ArtifactStore,
    max_features: usize,
    alpha: f64,
}

impl Classifier {
    /// Untrained classifier persisting to `settings.artifact_path`
    pub fn new(settings: &ModelConfig) -> Self {
        Self {
            current: RwLock::new(None),
            next_version: AtomicU64::new(1),
            training: Mutex::new(()),
            artifacts: ArtifactStore::new(settings.artifact_path.clone()),
            max_features: settings.max_features,
            alpha: settings.alpha,
        }
    }

    /// Classifier seeded from the stored artifact. A missing or corrupt
    /// artifact leaves it untrained.
    pub fn load(settings: &ModelConfig) -> Self {
        let classifier = Self::new(settings);

        match classifier.artifacts.load() {
            Ok(Some(model)) => {
                info!(
                    "Loaded trained model v{} from {}",
                    model.version,
                    classifier.artifacts.path().display()
                );
                classifier.install(model);
            }
            Ok(None) => info!("No trained model at {}", classifier.artifacts.path().display()),
            Err(e) => warn!(
                "Ignoring unreadable model artifact {}: {}",
                classifier.artifacts.path().display(),
                e
            ),
        }

        classifier
    }

    fn install(&self, model: TrainedModel) {
        self.next_version
            .fetch_max(model.version.saturating_add(1), Ordering::SeqCst);
        *self.current.write() = Some(Arc::new(model));
    }

    pub fn is_trained(&self) -> bool {
        self.current.read().is_some()
    }

    /// Current model snapshot, if any
    pub fn snapshot(&self) -> Option<Arc<TrainedModel>> {
        self.current.read().clone()
    }

    pub fn version(&self) -> Option<u64> {
        self.current.read().as_ref().map(|m| m.version)
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Fit a new model on the active examples, persist it, and make it current.
    pub fn train(&self, examples: &[TrainingExample], origin: DataOrigin) -> Result<TrainReport> {
        let examples = active_only(examples.to_vec());
        if examples.is_empty() {
            warn!("No training data available; keeping current model");
            return Err(BotError::EmptyTrainingSet);
        }

        let _guard = self.training.lock();
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let model = TrainedModel::fit(&examples, self.max_features, self.alpha, version, origin)
            .map_err(|e| {
                error!("Error training model: {}", e);
                e
            })?;

        if let Err(e) = self.artifacts.save(&model) {
            error!(
                "Error saving model to {}: {}",
                self.artifacts.path().display(),
                e
            );
            return Err(e);
        }

        let report = TrainReport {
            version: model.version,
            examples: model.examples,
            classes: model.classes(),
            vocabulary: model.vocabulary_size(),
            origin: model.origin.clone(),
        };

        *self.current.write() = Some(Arc::new(model));
        info!(
            "Model v{} trained on {} examples from {} and saved",
            report.version, report.examples, report.origin
        );

        Ok(report)
    }

    /// Most probable answer for `query`.
    ///
    /// `Err(NotTrained)` before the first training; `Ok(None)` for blank
    /// queries or queries outside the vocabulary.
    pub fn predict(&self, query: &str) -> Result<Option<String>> {
        let model = self.snapshot().ok_or(BotError::NotTrained)?;

        if query.trim().is_empty() {
            return Ok(None);
        }

        Ok(model.predict(query))
    }
}
