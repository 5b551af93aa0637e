// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Persists the frozen vocabulary next to the checkpoint as a
// HuggingFace tokenizer.json, so training, prediction and
// analysis all encode text with the same word → id mapping.
//
// The vocabulary is built by domain::vocabulary (frequency
// ranked) and written directly as a WordLevel model JSON:
//
//   [UNK]  → 0   (shared with padding)
//   word_1 → 1   (most frequent)
//   ...
//
// Text is normalised before it reaches the tokenizer, so the
// tokenizer has no normaliser and splits on whitespace only
// (apostrophes inside words like "don't" must survive).
//
// Reference: tokenizers crate documentation

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::domain::vocabulary::{Vocabulary, PAD_INDEX};

const TOKENIZER_FILE: &str = "tokenizer.json";
const UNK_TOKEN:      &str = "[UNK]";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Load a previously saved tokenizer from JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}. Have you run 'train' first?",
                path.display(), e
            ))
    }

    /// Write the vocabulary as tokenizer JSON, then load it back
    /// as a proper Tokenizer instance.
    pub fn save(&self, vocab: &Vocabulary) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let mut vocab_json = serde_json::Map::new();
        vocab_json.insert(UNK_TOKEN.to_string(), serde_json::json!(PAD_INDEX));
        for (word, idx) in vocab.iter() {
            vocab_json.insert(word.to_string(), serde_json::json!(idx));
        }

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": PAD_INDEX, "content": UNK_TOKEN, "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": null,
            "pre_tokenizer": {
                "type": "WhitespaceSplit"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab_json,
                "unk_token": UNK_TOKEN
            }
        });

        let path = self.path();
        std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON to '{}'", path.display()))?;

        tracing::info!(
            "Tokenizer saved with {} words to '{}'",
            vocab.len(),
            path.display()
        );

        self.load()
    }
}

/// Every (word, id) the tokenizer knows, minus the unknown token
pub fn vocabulary_of(tokenizer: &Tokenizer) -> Vocabulary {
    Vocabulary::from_pairs(tokenizer.get_vocab(false))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoder::encode_unpadded;

    fn store() -> (tempfile::TempDir, TokenizerStore) {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().to_string_lossy().into_owned());
        (dir, store)
    }

    #[test]
    fn test_vocabulary_round_trip() {
        let (_dir, store) = store();
        let vocab = Vocabulary::fit(&["i love it", "i don't love mondays"], 100);
        store.save(&vocab).unwrap();

        assert_eq!(vocabulary_of(&store.load().unwrap()), vocab);
    }

    #[test]
    fn test_tokenizer_matches_vocabulary_encoding() {
        let (_dir, store) = store();
        let vocab     = Vocabulary::fit(&["i love it", "i don't love mondays"], 100);
        let tokenizer = store.save(&vocab).unwrap();

        for text in ["i don't love it", "never seen before", "mondays i love", ""] {
            assert_eq!(encode_unpadded(&tokenizer, text).unwrap(), vocab.encode(text));
        }
    }

    #[test]
    fn test_load_without_save_fails() {
        let (_dir, store) = store();
        assert!(store.load().is_err());
    }
}
