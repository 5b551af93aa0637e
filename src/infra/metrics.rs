// ============================================================
// Layer 6 — Metrics
// ============================================================
// Binary classification metrics for the validation set and a
// CSV log with one row per epoch.
//
// The positive class (label 1) is the class of interest:
//
//   precision = tp / (tp + fp)
//   recall    = tp / (tp + fn)
//   f1        = 2 * precision * recall / (precision + recall)
//
// A zero denominator yields 0.0 rather than NaN.
//
// Output file: checkpoints/metrics.csv
//
//   epoch,train_loss,val_loss,val_acc,precision,recall,f1
//   1,0.612300,0.574100,0.781000,0.402000,0.655000,0.498000
//   ...
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

use crate::domain::sample::Label;

/// Validation-set scores for one epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BinaryMetrics {
    pub accuracy:  f64,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
}

impl BinaryMetrics {
    /// Compare predictions with ground truth, pairwise.
    pub fn compute(predicted: &[Label], actual: &[Label]) -> Self {
        let (mut tp, mut fp, mut fn_, mut correct) = (0usize, 0usize, 0usize, 0usize);
        for (p, a) in predicted.iter().zip(actual) {
            match (p, a) {
                (Label::Positive, Label::Positive) => tp += 1,
                (Label::Positive, Label::Negative) => fp += 1,
                (Label::Negative, Label::Positive) => fn_ += 1,
                (Label::Negative, Label::Negative) => {}
            }
            if p == a {
                correct += 1;
            }
        }

        let total     = predicted.len().min(actual.len());
        let precision = ratio(tp, tp + fp);
        let recall    = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self { accuracy: ratio(correct, total), precision, recall, f1 }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:      usize,
    pub train_loss: f64,
    pub val_loss:   f64,
    pub validation: BinaryMetrics,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, validation: BinaryMetrics) -> Self {
        Self { epoch, train_loss, val_loss, validation }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Starts a fresh CSV with a header row; a previous run's log in
    /// the same directory is replaced.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)?;
        writeln!(f, "epoch,train_loss,val_loss,val_acc,precision,recall,f1")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.validation.accuracy,
            m.validation.precision,
            m.validation.recall,
            m.validation.f1,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use Label::{Negative as N, Positive as P};

    #[test]
    fn test_precision_recall_f1() {
        // tp=2, fp=1, fn=1, tn=1
        let predicted = [P, P, P, N, N];
        let actual    = [P, P, N, P, N];
        let m = BinaryMetrics::compute(&predicted, &actual);
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((m.recall    - 2.0 / 3.0).abs() < 1e-9);
        assert!((m.f1        - 2.0 / 3.0).abs() < 1e-9);
        assert!((m.accuracy  - 3.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_positive_predictions() {
        let m = BinaryMetrics::compute(&[N, N], &[P, N]);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1, 0.0);
        assert_eq!(m.accuracy, 0.5);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(BinaryMetrics::compute(&[], &[]), BinaryMetrics::default());
    }

    #[test]
    fn test_logger_writes_header_and_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_string_lossy().into_owned()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.25, BinaryMetrics::default())).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,val_loss,val_acc,precision,recall,f1");
        assert_eq!(lines[1], "1,0.500000,0.250000,0.000000,0.000000,0.000000,0.000000");
    }
}
