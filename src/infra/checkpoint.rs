// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the trained classifier using Burn's
// CompactRecorder.
//
// Only the best epoch (lowest monitored loss) is kept: every
// improvement overwrites the previous best.
//
// File layout:
//   checkpoints/
//     model_best.mpk       ← weights of the best epoch
//     optimizer_best.mpk   ← Adam state at that epoch
//     best_epoch.json      ← which epoch that was
//     train_config.json    ← hyperparameters + resolved seq length
//     tokenizer.json       ← frozen vocabulary (see tokenizer_store)
//
// The config is what lets `predict` and `explain` rebuild the
// exact architecture before loading the weights into it.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    module::AutodiffModule,
    optim::Optimizer,
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::SentimentClassifier;

const MODEL_FILE:      &str = "model_best";
const OPTIMIZER_FILE:  &str = "optimizer_best";
const BEST_EPOCH_FILE: &str = "best_epoch.json";
const CONFIG_FILE:     &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist; a failure
    /// here resurfaces as a write error on the first save.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Overwrite the best checkpoint with this model and its
    /// optimizer state.
    pub fn save_best<B, O>(
        &self,
        model: &SentimentClassifier<B>,
        optim: &O,
        epoch: usize,
    ) -> Result<()>
    where
        B: AutodiffBackend,
        O: Optimizer<SentimentClassifier<B>, B>,
        SentimentClassifier<B>: AutodiffModule<B>,
    {
        let path = self.dir.join(MODEL_FILE);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let optim_path = self.dir.join(OPTIMIZER_FILE);
        CompactRecorder::new()
            .record(optim.to_record(), optim_path.clone())
            .with_context(|| format!("Failed to save optimizer state to '{}'", optim_path.display()))?;

        fs::write(self.dir.join(BEST_EPOCH_FILE), serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write {BEST_EPOCH_FILE}"))?;

        tracing::debug!("Saved best checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load the best weights into a freshly initialised model with
    /// the same architecture.
    pub fn load_model<B: Backend>(
        &self,
        model:  SentimentClassifier<B>,
        device: &B::Device,
    ) -> Result<SentimentClassifier<B>> {
        let epoch = self.best_epoch()?;
        let path  = self.dir.join(MODEL_FILE);

        tracing::info!("Loading best checkpoint (epoch {})", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        Ok(model.load_record(record))
    }

    /// True once at least one epoch has been checkpointed
    pub fn has_model(&self) -> bool {
        self.dir.join(BEST_EPOCH_FILE).exists()
    }

    /// Save the training configuration to JSON.
    ///
    /// Called after the sequence length has been resolved from the
    /// corpus, before training starts.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' first.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", path.display()))
    }

    /// Epoch number of the saved best checkpoint
    pub fn best_epoch(&self) -> Result<usize> {
        let path = self.dir.join(BEST_EPOCH_FILE);

        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{BEST_EPOCH_FILE}'. Have you run 'train' first?"))?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::optim::AdamConfig;

    type TestBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    fn manager() -> (tempfile::TempDir, CheckpointManager) {
        let dir = tempfile::tempdir().unwrap();
        let mgr = CheckpointManager::new(dir.path().to_string_lossy().into_owned());
        (dir, mgr)
    }

    #[test]
    fn test_config_round_trip() {
        let (_dir, mgr) = manager();
        let cfg = TrainConfig { max_seq_len: Some(31), ..TrainConfig::default() };
        mgr.save_config(&cfg).unwrap();

        let loaded = mgr.load_config().unwrap();
        assert_eq!(loaded.max_seq_len, Some(31));
        assert_eq!(loaded.vocab_size, cfg.vocab_size);
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let (_dir, mgr) = manager();
        assert!(!mgr.has_model());
        assert!(mgr.load_config().is_err());
        assert!(mgr.best_epoch().is_err());
    }

    #[test]
    fn test_model_round_trip() {
        let (_dir, mgr) = manager();
        let device = Default::default();
        let cfg    = TrainConfig { vocab_size: 9, embedding_dim: 4, hidden_size: 2, ..TrainConfig::default() };

        let model: SentimentClassifier<TestBackend> = cfg.model_config().init(&device);
        let optim = AdamConfig::new().init::<TestBackend, SentimentClassifier<TestBackend>>();
        mgr.save_best(&model, &optim, 3).unwrap();
        assert_eq!(mgr.best_epoch().unwrap(), 3);

        let fresh: SentimentClassifier<burn::backend::NdArray> = cfg.model_config().init(&device);
        let loaded = mgr.load_model(fresh, &device).unwrap();

        let ids = Tensor::<burn::backend::NdArray, 1, Int>::from_ints([0, 1, 2].as_slice(), &device)
            .reshape([1, 3]);
        let expected: Vec<f32> = model.valid().forward(ids.clone()).into_data().to_vec().unwrap();
        let actual:   Vec<f32> = loaded.forward(ids).into_data().to_vec().unwrap();
        for (e, a) in expected.iter().zip(&actual) {
            // CompactRecorder stores half precision
            assert!((e - a).abs() < 1e-2);
        }
    }
}
