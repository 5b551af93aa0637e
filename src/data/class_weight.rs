// ============================================================
// Layer 4 — Class Weights
// ============================================================
// The tweet dataset is imbalanced (far more negatives than
// positives). Weighting the loss per class balances type I and
// type II errors:
//
//   w_c = n_samples / (n_classes * count_c)
//
// A class that makes up half the data gets weight 1.0; a rarer
// class gets proportionally more. Every class must be present:
// the weighted cross-entropy only accepts positive weights.

use anyhow::{bail, Result};

use crate::domain::sample::Label;

/// Balanced weights indexed by `Label::index()`.
/// Fails when a class has no samples.
pub fn balanced_class_weights(labels: &[Label]) -> Result<Vec<f32>> {
    let mut counts = [0usize; Label::COUNT];
    for label in labels {
        counts[label.index()] += 1;
    }

    if let Some(missing) = counts.iter().position(|&c| c == 0) {
        bail!(
            "cannot weight classes: no samples labelled {:?}",
            Label::from_index(missing)
        );
    }

    let total = labels.len() as f32;
    Ok(counts
        .iter()
        .map(|&c| total / (Label::COUNT as f32 * c as f32))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_data_gets_unit_weights() {
        let labels = [Label::Negative, Label::Positive];
        assert_eq!(balanced_class_weights(&labels).unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_rare_class_weighted_up() {
        let labels = [
            Label::Negative, Label::Negative, Label::Negative, Label::Positive,
        ];
        let w = balanced_class_weights(&labels).unwrap();
        assert!((w[0] - 4.0 / 6.0).abs() < 1e-6);
        assert!((w[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_class_is_an_error() {
        let err = balanced_class_weights(&[Label::Negative]).unwrap_err();
        assert!(err.to_string().contains("Positive"));
        assert!(balanced_class_weights(&[]).is_err());
    }

    #[test]
    fn test_weights_are_always_positive() {
        let labels = [Label::Positive; 9]
            .into_iter()
            .chain([Label::Negative])
            .collect::<Vec<_>>();
        let w = balanced_class_weights(&labels).unwrap();
        assert!(w.iter().all(|&x| x > 0.0));
    }
}
