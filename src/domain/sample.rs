// ============================================================
// Layer 3 — Sample Domain Type
// ============================================================
// One row of the tweet dataset.
//
// Training rows carry a label and test rows don't; the label
// for a test row is what the pipeline produces.
//
//   id   text                                  label
//   17   "#MachineLearning rocks! http://t.co"  1
//   18   "@johnSmith said 'hi'"                 (none)
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Binary sentiment class.
/// The discriminants are the values written to and read from CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Label {
    Negative = 0,
    Positive = 1,
}

impl Label {
    /// Number of classes the classifier predicts
    pub const COUNT: usize = 2;

    /// Class index used for tensors and one-hot positions
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of `index()`. Anything other than 1 is negative,
    /// which is what argmax over two logits produces.
    pub fn from_index(index: usize) -> Self {
        if index == 1 { Label::Positive } else { Label::Negative }
    }
}

impl TryFrom<u8> for Label {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => bail!("label must be 0 or 1, got {other}"),
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> u8 {
        label as u8
    }
}

/// A single tweet as it appears in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Row identifier, kept as text so any id format survives
    pub id: String,

    /// The text exactly as read from the CSV (or after normalisation,
    /// see `with_text`)
    pub text: String,

    /// Present for training rows, absent for test rows
    pub label: Option<Label>,
}

impl Sample {
    pub fn new(id: impl Into<String>, text: impl Into<String>, label: Option<Label>) -> Self {
        Self {
            id:    id.into(),
            text:  text.into(),
            label,
        }
    }

    /// Returns a copy of this sample carrying different text.
    /// Rewrites never mutate a sample in place.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            id:    self.id.clone(),
            text:  text.into(),
            label: self.label,
        }
    }
}

/// Count (negatives, positives) among labelled samples.
pub fn class_counts(samples: &[Sample]) -> (usize, usize) {
    samples.iter().fold((0, 0), |(neg, pos), s| match s.label {
        Some(Label::Negative) => (neg + 1, pos),
        Some(Label::Positive) => (neg, pos + 1),
        None                  => (neg, pos),
    })
}

/// Accuracy of always answering "negative", the majority class
/// in the tweet data. 0.0 when there are no labelled samples.
pub fn baseline_accuracy(negatives: usize, positives: usize) -> f64 {
    let total = negatives + positives;
    if total == 0 {
        return 0.0;
    }
    negatives as f64 / total as f64
}
