// ============================================================
// Layer 2 — Trained Artifacts
// ============================================================
// Everything `predict` and `explain` need from a checkpoint
// directory, loaded once:
//
//   train_config.json → architecture + sequence length
//   tokenizer.json    → frozen vocabulary
//   model_best.mpk    → weights
//
// plus a fresh Normalizer, so new text is cleaned exactly the
// way the training text was.

use anyhow::{anyhow, Result};
use burn::prelude::Backend;
use tokenizers::Tokenizer;

use crate::application::train_use_case::TrainConfig;
use crate::data::{encoder::SequenceEncoder, normalizer::Normalizer};
use crate::domain::sample::Sample;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::inferencer::Inferencer;

pub struct Artifacts<B: Backend> {
    pub config:     TrainConfig,
    pub tokenizer:  Tokenizer,
    pub normalizer: Normalizer,
    pub inferencer: Inferencer<B>,
}

impl<B: Backend> Artifacts<B> {
    pub fn load(checkpoint_dir: &str, device: B::Device) -> Result<Self> {
        let ckpt = CheckpointManager::new(checkpoint_dir);
        if !ckpt.has_model() {
            return Err(anyhow!(
                "No trained model in '{checkpoint_dir}'. Run 'train' first."
            ));
        }

        let config     = ckpt.load_config()?;
        let tokenizer  = TokenizerStore::new(checkpoint_dir).load()?;
        let inferencer = Inferencer::load(&ckpt, device)?;
        let normalizer = Normalizer::new()?;
        Ok(Self { config, tokenizer, normalizer, inferencer })
    }

    /// Normalise and encode samples to the model's sequence length,
    /// one row per sample in input order.
    pub fn encode(&self, samples: &[Sample]) -> Result<Vec<Vec<u32>>> {
        let encoder = SequenceEncoder::new(&self.tokenizer, self.inferencer.seq_len());
        let texts: Vec<String> = samples
            .iter()
            .map(|s| self.normalizer.normalize(&s.text))
            .collect();
        encoder.encode_batch(&texts)
    }
}
