// ============================================================
// Layer 3 — Vocabulary Domain Type
// ============================================================
// Maps each surface word to a unique positive integer.
//
// Index layout:
//   0            padding AND out-of-vocabulary words
//   1            most frequent word in the training corpus
//   2            second most frequent word
//   ...
//   vocab_size-1 last word kept
//
// The vocabulary is built once from the training corpus and
// then frozen. It is persisted next to the model (see
// infra::tokenizer_store) so that prediction and analysis
// encode text exactly like training did.
//
// Reference: Rust Book §8 (Hash Maps)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved index for padding and unknown words
pub const PAD_INDEX: u32 = 0;

/// Label shown for index 0 when mapping indices back to words
pub const SENTINEL_WORD: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// word → index, iteration order is index order
    word_index: IndexMap<String, u32>,
}

impl Vocabulary {
    /// Build the vocabulary from already-normalised texts.
    ///
    /// Words are ranked by frequency (descending). Ties keep the
    /// order in which the words were first seen. Only indices
    /// strictly below `vocab_size` are kept.
    pub fn fit<S: AsRef<str>>(texts: &[S], vocab_size: usize) -> Self {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for text in texts {
            for word in words(text.as_ref()) {
                *counts.entry(word).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        // sort_by is stable, which gives first-seen order on ties
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(vocab_size.saturating_sub(1));

        let word_index = ranked
            .into_iter()
            .enumerate()
            .map(|(i, (word, _))| (word.to_string(), i as u32 + 1))
            .collect();

        Self { word_index }
    }

    /// Rebuild a vocabulary from (word, index) pairs, e.g. read back
    /// from a persisted tokenizer. Index 0 entries are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        let mut pairs: Vec<(String, u32)> = pairs
            .into_iter()
            .filter(|(_, idx)| *idx != PAD_INDEX)
            .collect();
        pairs.sort_by_key(|(_, idx)| *idx);
        Self { word_index: pairs.into_iter().collect() }
    }

    /// Look up a word, returning `PAD_INDEX` when it is unknown
    pub fn index_of(&self, word: &str) -> u32 {
        self.word_index.get(word).copied().unwrap_or(PAD_INDEX)
    }

    /// Encode a normalised text into unpadded indices
    pub fn encode(&self, text: &str) -> Vec<u32> {
        words(text).map(|w| self.index_of(w)).collect()
    }

    /// Inverse mapping. Index 0 maps to the sentinel word.
    pub fn index_to_word(&self) -> IndexMap<u32, String> {
        let mut inverse = IndexMap::with_capacity(self.word_index.len() + 1);
        inverse.insert(PAD_INDEX, SENTINEL_WORD.to_string());
        for (word, idx) in &self.word_index {
            inverse.insert(*idx, word.clone());
        }
        inverse
    }

    /// Iterate (word, index) in index order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, u32)> + '_ {
        self.word_index.iter().map(|(w, i)| (w.as_str(), *i))
    }

    /// Number of real words (the padding slot is not counted)
    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }
}

/// Split a normalised text into words.
/// Normalised text only ever contains single spaces between words.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|w| !w.is_empty())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_by_frequency() {
        let vocab = Vocabulary::fit(&["b a a", "a c b"], 100);
        assert_eq!(vocab.index_of("a"), 1);
        assert_eq!(vocab.index_of("b"), 2);
        assert_eq!(vocab.index_of("c"), 3);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let vocab = Vocabulary::fit(&["zebra apple", "mango"], 100);
        assert_eq!(vocab.index_of("zebra"), 1);
        assert_eq!(vocab.index_of("apple"), 2);
        assert_eq!(vocab.index_of("mango"), 3);
    }

    #[test]
    fn test_vocab_size_limits_indices() {
        // vocab_size = 3 keeps indices 1 and 2 only
        let vocab = Vocabulary::fit(&["a a a b b c"], 3);
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.index_of("c"), PAD_INDEX);
    }

    #[test]
    fn test_unknown_words_encode_to_zero() {
        let vocab = Vocabulary::fit(&["good day"], 100);
        assert_eq!(vocab.encode("good bad day"), vec![1, 0, 2]);
    }

    #[test]
    fn test_index_to_word_has_sentinel() {
        let vocab = Vocabulary::fit(&["happy"], 100);
        let inverse = vocab.index_to_word();
        assert_eq!(inverse[&0], SENTINEL_WORD);
        assert_eq!(inverse[&1], "happy");
    }

    #[test]
    fn test_from_pairs_restores_order() {
        let vocab = Vocabulary::fit(&["x y y z z z"], 100);
        let pairs: Vec<(String, u32)> = vocab
            .iter()
            .map(|(w, i)| (w.to_string(), i))
            .rev()
            .chain(std::iter::once(("[UNK]".to_string(), 0)))
            .collect();
        assert_eq!(Vocabulary::from_pairs(pairs), vocab);
    }

    #[test]
    fn test_empty_texts() {
        let vocab = Vocabulary::fit(&["", "   "], 100);
        assert!(vocab.is_empty());
    }
}
