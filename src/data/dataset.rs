use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::sample::Label;

/// One encoded, padded tweet ready for the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentItem {
    pub token_ids: Vec<u32>,
    pub label:     Label,
}

impl SentimentItem {
    pub fn new(token_ids: Vec<u32>, label: Label) -> Self {
        Self { token_ids, label }
    }

    pub fn seq_len(&self) -> usize {
        self.token_ids.len()
    }
}

#[derive(Debug)]
pub struct SentimentDataset {
    items: Vec<SentimentItem>,
}

impl SentimentDataset {
    pub fn new(items: Vec<SentimentItem>) -> Self { Self { items } }
}

impl Dataset<SentimentItem> for SentimentDataset {
    fn get(&self, index: usize) -> Option<SentimentItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_get_and_len() {
        let ds = SentimentDataset::new(vec![
            SentimentItem::new(vec![0, 1], Label::Negative),
            SentimentItem::new(vec![2, 3], Label::Positive),
        ]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).unwrap().label, Label::Positive);
        assert!(ds.get(2).is_none());
    }
}
