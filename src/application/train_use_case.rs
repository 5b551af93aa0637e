// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the labelled CSV        (Layer 4 - data)
//   Step 2: Normalise tweet text         (Layer 4 - data)
//   Step 3: Report class balance         (Layer 3 - domain)
//   Step 4: Fit + persist vocabulary     (Layer 3 / Layer 6)
//   Step 5: Encode and pad sequences     (Layer 4 - data)
//   Step 6: Balanced class weights       (Layer 4 - data)
//   Step 7: Save config                  (Layer 6 - infra)
//   Step 8: Split train/validation       (Layer 4 - data)
//   Step 9: Run training loop            (Layer 5 - ml)
//   Step 10: Predict + explain, optional (Layer 2)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::application::{
    explain_use_case::ExplainUseCase,
    predict_use_case::PredictUseCase,
};
use crate::data::{
    class_weight::balanced_class_weights,
    dataset::{SentimentDataset, SentimentItem},
    encoder::{encode_unpadded, longest, pad_sequence},
    loader::CsvSampleLoader,
    normalizer::Normalizer,
    splitter::hold_out,
};
use crate::domain::{
    sample::{baseline_accuracy, class_counts},
    traits::SampleSource,
    vocabulary::Vocabulary,
};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    tokenizer_store::TokenizerStore,
};
use crate::ml::{
    attribution::WordScore,
    model::SentimentClassifierConfig,
    trainer::{run_training, TrainingSummary},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved next to the checkpoint and
// reloaded by `predict` and `explain` to rebuild the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_csv:        String,
    pub test_csv:         String,
    pub output_csv:       String,
    pub checkpoint_dir:   String,
    pub vocab_size:       usize,
    /// `None` until resolved from the longest training sequence
    pub max_seq_len:      Option<usize>,
    pub embedding_dim:    usize,
    pub hidden_size:      usize,
    pub dropout:          f64,
    pub batch_size:       usize,
    pub epochs:           usize,
    pub lr:               f64,
    pub patience:         usize,
    pub validation_split: f64,
    pub seed:             u64,
    pub top_words:        usize,
    pub run_predict:      bool,
    pub run_explain:      bool,
    /// Discard training rows whose text normalises to ""
    #[serde(default)]
    pub drop_empty:       bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_csv:        "data/train.csv".to_string(),
            test_csv:         "data/test.csv".to_string(),
            output_csv:       "data/test_predicted.csv".to_string(),
            checkpoint_dir:   "checkpoints".to_string(),
            vocab_size:       10_000,
            max_seq_len:      None,
            embedding_dim:    300,
            hidden_size:      200,
            dropout:          0.5,
            batch_size:       64,
            epochs:           50,
            lr:               1e-3,
            patience:         2,
            validation_split: 0.25,
            seed:             42,
            top_words:        100,
            run_predict:      true,
            run_explain:      true,
            drop_empty:       false,
        }
    }
}

impl TrainConfig {
    /// Architecture hyperparameters for the classifier
    pub fn model_config(&self) -> SentimentClassifierConfig {
        SentimentClassifierConfig::new(
            self.vocab_size,
            self.embedding_dim,
            self.hidden_size,
            self.dropout,
        )
    }

    /// Sequence length the model was trained with.
    /// Only set once training has resolved it from the corpus.
    pub fn resolved_seq_len(&self) -> Result<usize> {
        match self.max_seq_len {
            Some(0) => Err(anyhow!("max_seq_len must be at least 1")),
            Some(n) => Ok(n),
            None => Err(anyhow!(
                "Sequence length not resolved. Was this config saved by 'train'?"
            )),
        }
    }
}

// ─── Prepared data ───────────────────────────────────────────────────────────
/// Everything the training loop needs, after Steps 1–8.
#[derive(Debug)]
pub struct PreparedData {
    pub config:        TrainConfig,
    pub train:         SentimentDataset,
    pub validation:    SentimentDataset,
    pub class_weights: Vec<f32>,
}

/// What a full `train` run produced
#[derive(Debug)]
pub struct TrainReport {
    pub summary:     TrainingSummary,
    /// Number of test rows labelled, if prediction ran
    pub predicted:   Option<usize>,
    pub top_words:   Option<Vec<WordScore>>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let prepared     = self.prepare()?;
        let cfg          = &prepared.config;
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        let metrics      = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 9: Run training loop (Layer 5) ───────────────────────────────
        let summary = run_training(
            cfg,
            prepared.train,
            prepared.validation,
            prepared.class_weights,
            &ckpt_manager,
            &metrics,
        )?;

        // ── Step 10: Downstream runs on the best checkpoint ──────────────────
        let predicted = if cfg.run_predict {
            let labels = PredictUseCase::new(&cfg.checkpoint_dir)?
                .execute(&cfg.test_csv, &cfg.output_csv)?;
            Some(labels.len())
        } else {
            None
        };

        let top_words = if cfg.run_explain {
            Some(ExplainUseCase::new(&cfg.checkpoint_dir)?.execute(&cfg.train_csv, cfg.top_words)?)
        } else {
            None
        };

        Ok(TrainReport { summary, predicted, top_words })
    }

    /// Steps 1–8: load, normalise, build the vocabulary, encode,
    /// weight the classes and split. Persists the tokenizer and the resolved config.
    pub fn prepare(&self) -> Result<PreparedData> {
        let cfg = &self.config;
        if cfg.batch_size == 0 {
            return Err(anyhow!("batch size must be at least 1"));
        }

        // ── Step 1: Load the labelled CSV ────────────────────────────────────
        tracing::info!("Loading training data from '{}'", cfg.train_csv);
        let raw = CsvSampleLoader::labelled(&cfg.train_csv).load_all()?;
        if raw.is_empty() {
            return Err(anyhow!("'{}' contains no rows", cfg.train_csv));
        }

        // ── Step 2: Normalise text ───────────────────────────────────────────
        // Rows that normalise to "" encode to all padding unless dropped
        let normalizer = Normalizer::new()?;
        let mut samples = normalizer.normalize_samples(&raw);
        if cfg.drop_empty {
            let before = samples.len();
            samples = Normalizer::drop_empty(samples);
            tracing::info!("Dropped {} rows with no text left", before - samples.len());
        }

        // ── Step 3: Class balance ────────────────────────────────────────────
        let (negatives, positives) = class_counts(&samples);
        if negatives == 0 || positives == 0 {
            return Err(anyhow!(
                "'{}' needs both classes, found {} negative and {} positive rows",
                cfg.train_csv, negatives, positives
            ));
        }
        tracing::info!(
            "Negatives: {}, positives: {}, baseline accuracy: {:.3}",
            negatives,
            positives,
            baseline_accuracy(negatives, positives),
        );

        // ── Step 4: Fit vocabulary and persist it as a tokenizer ─────────────
        let texts: Vec<&str> = samples.iter().map(|s| s.text.as_str()).collect();
        let vocab     = Vocabulary::fit(&texts, cfg.vocab_size);
        let tokenizer = TokenizerStore::new(&cfg.checkpoint_dir).save(&vocab)?;
        tracing::info!("Vocabulary: {} words (limit {})", vocab.len(), cfg.vocab_size);

        // ── Step 5: Encode, then pad to the resolved length ──────────────────
        let unpadded = texts
            .iter()
            .map(|t| encode_unpadded(&tokenizer, t))
            .collect::<Result<Vec<_>>>()?;
        let max_len = cfg.max_seq_len.unwrap_or_else(|| longest(&unpadded)).max(1);
        tracing::info!("Sequence length: {}", max_len);

        let mut items = Vec::with_capacity(samples.len());
        for (sample, ids) in samples.iter().zip(&unpadded) {
            let label = sample
                .label
                .ok_or_else(|| anyhow!("row '{}' has no label", sample.id))?;
            items.push(SentimentItem::new(pad_sequence(ids, max_len), label));
        }

        // ── Step 6: Class weights over every row, before the hold-out ────────
        let labels: Vec<_> = items.iter().map(|i| i.label).collect();
        let class_weights = balanced_class_weights(&labels)?;
        tracing::info!("Class weights: {:?}", class_weights);

        // ── Step 7: Save config for inference ────────────────────────────────
        let config = TrainConfig { max_seq_len: Some(max_len), ..cfg.clone() };
        CheckpointManager::new(&config.checkpoint_dir).save_config(&config)?;

        // ── Step 8: Train / validation split ─────────────────────────────────
        let (train_items, val_items) = hold_out(items, config.validation_split, config.seed)?;
        tracing::info!(
            "Split: {} train, {} validation",
            train_items.len(),
            val_items.len()
        );

        let train      = SentimentDataset::new(train_items);
        let validation = SentimentDataset::new(val_items);

        Ok(PreparedData { config, train, validation, class_weights })
    }
}
