// ============================================================
// Layer 4 — Sequence Encoder
// ============================================================
// Turns normalised text into fixed-length rows of token ids.
//
//   "machine learning rocks"
//       │  tokenizer (WordLevel, frozen vocabulary)
//       ▼
//   [412, 87, 2093]
//       │  pad_sequence(max_len = 6)
//       ▼
//   [0, 0, 0, 412, 87, 2093]
//
// Padding goes in FRONT of the sequence and truncation keeps
// the LAST tokens, so the recurrent layers always end on real
// words. Unknown words come out of the tokenizer as id 0.
//
// Reference: tokenizers crate documentation
//            Rust Book §8 (Vectors)

use anyhow::Result;
use tokenizers::Tokenizer;

use crate::domain::vocabulary::PAD_INDEX;

pub struct SequenceEncoder<'t> {
    tokenizer: &'t Tokenizer,
    max_len:   usize,
}

impl<'t> SequenceEncoder<'t> {
    pub fn new(tokenizer: &'t Tokenizer, max_len: usize) -> Self {
        Self { tokenizer, max_len }
    }

    /// Unpadded token ids for one normalised text
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        encode_unpadded(self.tokenizer, text)
    }

    /// Token ids padded/truncated to `max_len`
    pub fn encode_padded(&self, text: &str) -> Result<Vec<u32>> {
        Ok(pad_sequence(&self.encode(text)?, self.max_len))
    }

    /// Encode and pad a batch of texts, preserving order
    pub fn encode_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vec<u32>>> {
        texts.iter().map(|t| self.encode_padded(t.as_ref())).collect()
    }
}

/// Tokenise without padding. Used to find the corpus-wide
/// maximum length before a SequenceEncoder exists.
pub fn encode_unpadded(tokenizer: &Tokenizer, text: &str) -> Result<Vec<u32>> {
    let enc = tokenizer
        .encode(text, false)
        .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
    Ok(enc.get_ids().to_vec())
}

/// Length of the longest sequence, i.e. the default `max_len`
pub fn longest(sequences: &[Vec<u32>]) -> usize {
    sequences.iter().map(Vec::len).max().unwrap_or(0)
}

/// Left-pad with `PAD_INDEX`, or keep only the last `max_len` ids.
pub fn pad_sequence(ids: &[u32], max_len: usize) -> Vec<u32> {
    if ids.len() >= max_len {
        return ids[ids.len() - max_len..].to_vec();
    }
    let mut out = vec![PAD_INDEX; max_len - ids.len()];
    out.extend_from_slice(ids);
    out
}
