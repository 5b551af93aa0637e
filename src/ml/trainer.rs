// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and Adam,
// with early stopping and save-best-only checkpointing.
//
// Per epoch:
//   1. weighted cross-entropy on the training batches
//   2. unweighted loss, accuracy, precision, recall and F1 on
//      the validation batches (model.valid(), dropout off)
//   3. one metrics.csv row
//   4. if validation loss improved → overwrite the best
//      checkpoint; otherwise count towards `patience`
//
// Key Burn insight:
//   - Training uses B (Autodiff<..>) for gradients
//   - model.valid() returns the model on B::InnerBackend
//   - Validation batcher must also use B::InnerBackend
//   - argmax(1) returns [batch,1] so we flatten before comparing
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{anyhow, Result};
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::SentimentBatcher, dataset::SentimentDataset};
use crate::domain::sample::Label;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{BinaryMetrics, EpochMetrics, MetricsLogger};
use crate::ml::model::SentimentClassifier;

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// What a finished training run reports back
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs_run:    usize,
    pub best_epoch:    usize,
    pub best_val_loss: f64,
    pub stopped_early: bool,
}

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: SentimentDataset,
    val_dataset:   SentimentDataset,
    class_weights: Vec<f32>,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<TrainingSummary> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop::<MyBackend>(cfg, train_dataset, val_dataset, class_weights, ckpt_manager, metrics, device)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: SentimentDataset,
    val_dataset:   SentimentDataset,
    class_weights: Vec<f32>,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<TrainingSummary> {
    if train_dataset.is_empty() {
        return Err(anyhow!("Training set is empty"));
    }
    if cfg.batch_size == 0 {
        return Err(anyhow!("Batch size must be at least 1"));
    }
    // the weighted cross-entropy panics on a zero or negative weight
    if class_weights.len() != Label::COUNT
        || class_weights.iter().any(|&w| w.is_nan() || w <= 0.0)
    {
        return Err(anyhow!(
            "Class weights must be {} positive values, got {:?}",
            Label::COUNT, class_weights
        ));
    }
    if val_dataset.is_empty() {
        tracing::warn!("Validation set is empty, monitoring training loss instead");
    }

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: SentimentClassifier<B> = cfg.model_config().init(&device);
    tracing::info!(
        "Model ready: vocab={} embedding={} hidden={}",
        cfg.vocab_size, cfg.embedding_dim, cfg.hidden_size,
    );

    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = SentimentBatcher::<B>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = SentimentBatcher::<B::InnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut stopper    = EarlyStopping::new(cfg.patience);
    let mut epochs_run = 0usize;

    for epoch in 1..=cfg.epochs {
        epochs_run = epoch;

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_classification(
                batch.token_ids,
                batch.targets,
                Some(class_weights.as_slice()),
            );

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = train_loss_sum / train_batches.max(1) as f64;

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;
        let mut predicted    = Vec::new();
        let mut actual       = Vec::new();

        for batch in val_loader.iter() {
            let (loss, logits) = model_valid.forward_classification(
                batch.token_ids,
                batch.targets.clone(),
                None,
            );
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;

            let preds = logits.argmax(1).flatten::<1>(0, 1);
            predicted.extend(int_labels(preds)?);
            actual.extend(int_labels(batch.targets)?);
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else {
            f64::NAN
        };
        let binary = BinaryMetrics::compute(&predicted, &actual);
        let row    = EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, binary);

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.3} | val_f1={:.3} | val_recall={:.3} | val_precision={:.3}",
            epoch, cfg.epochs, avg_train_loss, avg_val_loss,
            binary.accuracy, binary.f1, binary.recall, binary.precision,
        );
        metrics.log(&row)?;

        // ── Checkpoint + early stopping ───────────────────────────────────────
        let monitored = if val_batches > 0 { avg_val_loss } else { avg_train_loss };
        if stopper.update(monitored) {
            ckpt_manager.save_best(&model, &optim, epoch)?;
            tracing::info!("Epoch {}: monitored loss improved to {:.4}, checkpoint saved", epoch, monitored);
        } else {
            tracing::info!(
                "Epoch {}: no improvement over {:.4} ({}/{})",
                epoch, stopper.best(), stopper.wait(), cfg.patience,
            );
        }

        if stopper.should_stop() {
            tracing::info!("Early stopping after epoch {}", epoch);
            break;
        }
    }

    let summary = TrainingSummary {
        epochs_run,
        best_epoch:    stopper.best_epoch(),
        best_val_loss: stopper.best(),
        stopped_early: stopper.should_stop(),
    };
    tracing::info!("Training complete: {:?}", summary);
    Ok(summary)
}

fn int_labels<B: Backend>(tensor: Tensor<B, 1, Int>) -> Result<Vec<Label>> {
    let values: Vec<i64> = tensor
        .into_data()
        .convert::<i64>()
        .to_vec()
        .map_err(|e| anyhow!("Cannot read predictions: {e:?}"))?;
    Ok(values.into_iter().map(|v| Label::from_index(v as usize)).collect())
}

// ─── Early stopping ───────────────────────────────────────────────────────────
/// Tracks the best monitored loss. Stops once `patience`
/// consecutive epochs fail to improve on it.
#[derive(Debug, Clone)]
struct EarlyStopping {
    patience:   usize,
    best:       f64,
    best_epoch: usize,
    epoch:      usize,
    wait:       usize,
}

impl EarlyStopping {
    fn new(patience: usize) -> Self {
        Self { patience, best: f64::INFINITY, best_epoch: 0, epoch: 0, wait: 0 }
    }

    /// Record one epoch's loss. Returns true when it is a new best.
    fn update(&mut self, loss: f64) -> bool {
        self.epoch += 1;
        if loss < self.best {
            self.best       = loss;
            self.best_epoch = self.epoch;
            self.wait       = 0;
            true
        } else {
            self.wait += 1;
            false
        }
    }

    fn should_stop(&self) -> bool {
        self.wait >= self.patience
    }

    fn best(&self) -> f64 { self.best }

    fn best_epoch(&self) -> usize { self.best_epoch }

    fn wait(&self) -> usize { self.wait }
}
