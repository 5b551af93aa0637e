// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Labels an unlabelled CSV with the best checkpoint:
//
//   1. Load config, tokenizer and weights
//   2. Load test rows (id, text, ...)
//   3. Normalise + encode with the trained sequence length
//   4. argmax over the two class probabilities
//   5. Write the input CSV back out with a `label` column
//
// Every input row gets a label, including rows whose text
// normalises to nothing (they are all padding).

use anyhow::Result;
use burn::prelude::Backend;

use crate::application::artifacts::Artifacts;
use crate::data::loader::{write_with_labels, CsvSampleLoader};
use crate::domain::sample::Label;
use crate::domain::traits::SampleSource;
use crate::ml::inferencer::InferBackend;

pub struct PredictUseCase<B: Backend = InferBackend> {
    artifacts: Artifacts<B>,
}

impl PredictUseCase<InferBackend> {
    pub fn new(checkpoint_dir: &str) -> Result<Self> {
        Self::with_device(checkpoint_dir, Default::default())
    }
}

impl<B: Backend> PredictUseCase<B> {
    pub fn with_device(checkpoint_dir: &str, device: B::Device) -> Result<Self> {
        Ok(Self { artifacts: Artifacts::load(checkpoint_dir, device)? })
    }

    /// Predict every row of `input_csv` and write the labelled copy
    /// to `output_csv`. Returns the labels in row order.
    pub fn execute(&self, input_csv: &str, output_csv: &str) -> Result<Vec<Label>> {
        let samples   = CsvSampleLoader::unlabelled(input_csv).load_all()?;
        let sequences = self.artifacts.encode(&samples)?;
        let labels    = self
            .artifacts
            .inferencer
            .predict(&sequences, self.artifacts.config.batch_size)?;

        let positives = labels.iter().filter(|l| **l == Label::Positive).count();
        tracing::info!(
            "Predicted {} rows: {} positive, {} negative",
            labels.len(),
            positives,
            labels.len() - positives,
        );

        write_with_labels(input_csv, output_csv, &labels)?;
        Ok(labels)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::trained_checkpoint;
    use std::fs;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_predict_writes_label_column_in_row_order() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = trained_checkpoint(dir.path());

        let input  = dir.path().join("test.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "id,text\n10,good day\n11,!!!\n12,@someone Awful\n").unwrap();

        let use_case = PredictUseCase::<TestBackend>::with_device(&ckpt, Default::default()).unwrap();
        let labels   = use_case
            .execute(&input.to_string_lossy(), &output.to_string_lossy())
            .unwrap();
        assert_eq!(labels.len(), 3);

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "id,text,label");
        assert!(lines[1].starts_with("10,good day,"));
        assert!(lines[2].starts_with("11,!!!,"));
        assert!(lines[3].starts_with("12,@someone Awful,"));
        for (line, label) in lines[1..].iter().zip(&labels) {
            assert!(line.ends_with(&u8::from(*label).to_string()));
        }
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PredictUseCase::<TestBackend>::with_device(
            &dir.path().to_string_lossy(),
            Default::default(),
        );
        assert!(result.is_err());
    }
}
