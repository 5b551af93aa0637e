// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::data::batcher::token_tensor;
use crate::domain::sample::Label;
use crate::domain::traits::{ActivationSource, Activations};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{SentimentClassifier, NUM_CLASSES};

pub type InferBackend = burn::backend::Wgpu;

pub struct Inferencer<B: Backend> {
    model:   SentimentClassifier<B>,
    seq_len: usize,
    device:  B::Device,
}

impl Inferencer<InferBackend> {
    /// Rebuild the architecture from the saved config and load the
    /// best checkpoint into it.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        Inferencer::load(ckpt_manager, device)
    }
}

impl<B: Backend> Inferencer<B> {
    pub fn load(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let cfg     = ckpt_manager.load_config()?;
        let seq_len = cfg.resolved_seq_len()?;
        let model: SentimentClassifier<B> = cfg.model_config().init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint (seq_len={})", seq_len);
        Ok(Self { model, seq_len, device })
    }

    pub fn from_model(model: SentimentClassifier<B>, seq_len: usize, device: B::Device) -> Self {
        Self { model, seq_len, device }
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Class probabilities for each padded sequence, `batch_size` rows
    /// per forward pass.
    pub fn predict_proba(&self, sequences: &[Vec<u32>], batch_size: usize) -> Result<Vec<[f32; 2]>> {
        let mut out = Vec::with_capacity(sequences.len());
        for chunk in sequences.chunks(batch_size.max(1)) {
            let probs = self.model.forward_probabilities(self.to_tensor(chunk)?);
            let flat  = float_values(probs)?;
            out.extend(flat.chunks_exact(NUM_CLASSES).map(|p| [p[0], p[1]]));
        }
        Ok(out)
    }

    /// Most probable label per sequence, in input order
    pub fn predict(&self, sequences: &[Vec<u32>], batch_size: usize) -> Result<Vec<Label>> {
        let probs = self.predict_proba(sequences, batch_size)?;
        Ok(probs
            .iter()
            .map(|p| if p[1] > p[0] { Label::Positive } else { Label::Negative })
            .collect())
    }

    fn to_tensor(&self, sequences: &[Vec<u32>]) -> Result<Tensor<B, 2, Int>> {
        if let Some(bad) = sequences.iter().find(|s| s.len() != self.seq_len) {
            return Err(anyhow!(
                "sequence length {} does not match model length {}",
                bad.len(),
                self.seq_len
            ));
        }
        let flat: Vec<i32> = sequences.iter().flatten().map(|&x| x as i32).collect();
        Ok(token_tensor::<B>(&flat, sequences.len(), self.seq_len, &self.device))
    }
}

impl<B: Backend> ActivationSource for Inferencer<B> {
    fn activations(&self, sequences: &[Vec<u32>]) -> Result<Activations> {
        if sequences.is_empty() {
            return Ok(Vec::new());
        }
        let acts = self.model.forward_activations(self.to_tensor(sequences)?);
        let flat = float_values(acts)?;

        // [batch, seq_len, 2] row-major → nested rows
        Ok(flat
            .chunks_exact(self.seq_len * NUM_CLASSES)
            .map(|row| {
                row.chunks_exact(NUM_CLASSES)
                    .map(|c| [c[0], c[1]])
                    .collect()
            })
            .collect())
    }
}

fn float_values<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read model output: {e:?}"))
}
