// ============================================================
// Layer 4 — Sentiment Batcher
// ============================================================
// Implements Burn's Batcher trait to stack SentimentItems into
// tensors.
//
//   Input:  Vec of N items, each with a token row of length S
//   Output: SentimentBatch with
//             token_ids [N, S]  (Int)
//             targets   [N]     (Int, class index)
//
// All rows were padded to the same length by the encoder, so
// batching is a flatten + reshape.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SentimentItem;

#[derive(Debug, Clone)]
pub struct SentimentBatch<B: Backend> {
    /// Token id rows, shape [batch_size, seq_len]
    pub token_ids: Tensor<B, 2, Int>,

    /// Class index per row, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct SentimentBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SentimentBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SentimentItem, SentimentBatch<B>> for SentimentBatcher<B> {
    fn batch(&self, items: Vec<SentimentItem>) -> SentimentBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map(SentimentItem::seq_len).unwrap_or(0);

        let ids_flat: Vec<i32> = items
            .iter()
            .flat_map(|item| item.token_ids.iter().map(|&x| x as i32))
            .collect();

        let targets: Vec<i32> = items
            .iter()
            .map(|item| item.label.index() as i32)
            .collect();

        SentimentBatch {
            token_ids: token_tensor(&ids_flat, batch_size, seq_len, &self.device),
            targets:   Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device),
        }
    }
}

/// Build a [batch_size, seq_len] Int tensor from row-major ids.
/// Shared with the inferencer, which batches raw sequences.
pub fn token_tensor<B: Backend>(
    ids_flat:   &[i32],
    batch_size: usize,
    seq_len:    usize,
    device:     &B::Device,
) -> Tensor<B, 2, Int> {
    Tensor::<B, 1, Int>::from_ints(ids_flat, device).reshape([batch_size, seq_len])
}
