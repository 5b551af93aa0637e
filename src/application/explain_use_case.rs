// ============================================================
// Layer 2 — Explain Use Case
// ============================================================
// Finds the words the trained model leans on most for the
// positive class:
//
//   1. Load config, tokenizer and weights
//   2. Load a CSV (normally the training file)
//   3. Normalise + encode with the trained sequence length
//   4. Word Attribution Scorer with the model as the
//      activation source
//
// Result: top-K words, ascending by mean contribution score.

use anyhow::Result;
use burn::prelude::Backend;

use crate::application::artifacts::Artifacts;
use crate::data::loader::CsvSampleLoader;
use crate::domain::traits::SampleSource;
use crate::infra::tokenizer_store::vocabulary_of;
use crate::ml::{
    attribution::{significant_words, WordScore},
    inferencer::InferBackend,
};

pub struct ExplainUseCase<B: Backend = InferBackend> {
    artifacts: Artifacts<B>,
}

impl ExplainUseCase<InferBackend> {
    pub fn new(checkpoint_dir: &str) -> Result<Self> {
        Self::with_device(checkpoint_dir, Default::default())
    }
}

impl<B: Backend> ExplainUseCase<B> {
    pub fn with_device(checkpoint_dir: &str, device: B::Device) -> Result<Self> {
        Ok(Self { artifacts: Artifacts::load(checkpoint_dir, device)? })
    }

    pub fn execute(&self, csv: &str, top_k: usize) -> Result<Vec<WordScore>> {
        // Labels are not needed here, so any id,text file works
        let samples       = CsvSampleLoader::unlabelled(csv).load_all()?;
        let sequences     = self.artifacts.encode(&samples)?;
        let index_to_word = vocabulary_of(&self.artifacts.tokenizer).index_to_word();

        tracing::info!(
            "Scoring {} sequences against {} vocabulary words",
            sequences.len(),
            index_to_word.len() - 1,
        );

        significant_words(
            &self.artifacts.inferencer,
            &sequences,
            &index_to_word,
            self.artifacts.config.batch_size,
            top_k,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{train_csv, trained_checkpoint};

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_top_words_ranked_ascending() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = trained_checkpoint(dir.path());
        let csv  = train_csv(dir.path());

        let use_case = ExplainUseCase::<TestBackend>::with_device(&ckpt, Default::default()).unwrap();
        let words    = use_case.execute(&csv, 3).unwrap();

        assert_eq!(words.len(), 3);
        assert!(words.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn test_large_k_returns_every_observed_word() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = trained_checkpoint(dir.path());
        let csv  = train_csv(dir.path());

        let use_case = ExplainUseCase::<TestBackend>::with_device(&ckpt, Default::default()).unwrap();
        let words    = use_case.execute(&csv, 100).unwrap();

        // good, day, bad, awful, so + padding
        assert_eq!(words.len(), 6);
        assert_eq!(words.iter().filter(|w| w.is_sentinel()).count(), 1);
    }
}
