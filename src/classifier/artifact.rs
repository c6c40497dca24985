//! Durable storage for the trained model
//!
//! Simple file-based JSON artifact, replaced atomically on every save.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::model::TrainedModel;
use crate::error::{BotError, Result};

const FORMAT_VERSION: u32 = 1;

/// On-disk wrapper with a format tag
#[derive(Serialize, Deserialize)]
struct Artifact {
    format: u32,
    model: TrainedModel,
}

#[derive(Serialize)]
struct ArtifactRef<'a> {
    format: u32,
    model: &'a TrainedModel,
}

pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the stored model. A missing file is `Ok(None)`; an unreadable,
    /// corrupt or internally inconsistent one is an error.
    pub fn load(&self) -> Result<Option<TrainedModel>> {
        if !self.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let artifact: Artifact = serde_json::from_str(&content)?;

        if artifact.format != FORMAT_VERSION {
            return Err(BotError::Model(format!(
                "unsupported artifact format {} (expected {})",
                artifact.format, FORMAT_VERSION
            )));
        }

        artifact.model.validate()?;
        Ok(Some(artifact.model))
    }

    /// Write the model, replacing any previous artifact
    pub fn save(&self, model: &TrainedModel) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string(&ArtifactRef {
            format: FORMAT_VERSION,
            model,
        })?;

        let tmp = self.tmp_path(model.version);
        fs::write(&tmp, content)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        Ok(())
    }

    fn tmp_path(&self, version: u64) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        self.path.with_file_name(format!(".{}.{}.tmp", name, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{builtin_corpus, DataOrigin};

    fn model(version: u64) -> TrainedModel {
        TrainedModel::fit(&builtin_corpus(), 5000, 1.0, version, DataOrigin::Builtin).unwrap()
    }

    #[test]
    fn test_missing_artifact_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.json"));

        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested").join("model.json"));

        store.save(&model(3)).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded.version, 3);
        assert_eq!(loaded.origin, DataOrigin::Builtin);
        assert_eq!(loaded.predict("water"), model(3).predict("water"));
    }

    #[test]
    fn test_save_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.json"));

        store.save(&model(1)).unwrap();
        store.save(&model(2)).unwrap();

        assert_eq!(store.load().unwrap().unwrap().version, 2);
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_corrupt_artifact_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(ArtifactStore::new(&path).load().is_err());
    }

    #[test]
    fn test_inconsistent_model_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut value = serde_json::to_value(ArtifactRef {
            format: FORMAT_VERSION,
            model: &model(1),
        })
        .unwrap();
        value["model"]["classifier"]["feature_log_prob"] = serde_json::json!([[0.0]]);
        fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(ArtifactStore::new(&path).load(), Err(BotError::Model(_))));
    }

    #[test]
    fn test_unknown_format_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut value = serde_json::to_value(ArtifactRef {
            format: FORMAT_VERSION,
            model: &model(1),
        })
        .unwrap();
        value["format"] = serde_json::json!(99);
        fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(ArtifactStore::new(&path).load(), Err(BotError::Model(_))));
    }
}
