// ============================================================
// Layer 5 — Word Attribution Scorer
// ============================================================
// Ranks vocabulary words by how strongly they push the trained
// model towards the positive class.
//
// For every position of every sequence the model's attribution
// layer emits two activations (negative, positive). A token's
// contribution score is
//
//   score = activation[positive] - activation[negative]
//
// Scores are averaged per word over the whole dataset and the
// K words with the highest mean are returned, lowest first.
//
// Batches cover [t*B, min((t+1)*B, N)), so the last partial
// batch is scored like any other.
//
// Padding positions (index 0) are attributed to the sentinel
// word "N/A". Callers that want real words only should filter
// entries with `is_sentinel()`.

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::traits::ActivationSource;
use crate::domain::vocabulary::SENTINEL_WORD;

/// One ranked word and its mean contribution score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordScore {
    pub word:  String,
    pub score: f64,
}

impl WordScore {
    pub fn is_sentinel(&self) -> bool {
        self.word == SENTINEL_WORD
    }
}

/// Running sum and count per word, in first-seen order.
#[derive(Debug, Default)]
struct ScoreAccumulator {
    totals: IndexMap<String, (f64, usize)>,
}

impl ScoreAccumulator {
    fn add(&mut self, word: &str, score: f64) {
        if let Some((sum, count)) = self.totals.get_mut(word) {
            *sum   += score;
            *count += 1;
        } else {
            self.totals.insert(word.to_string(), (score, 1));
        }
    }

    fn into_means(self) -> Vec<WordScore> {
        self.totals
            .into_iter()
            .map(|(word, (sum, count))| WordScore { word, score: sum / count as f64 })
            .collect()
    }
}

/// Score every token of `sequences` through `source` and return the
/// `top_k` words with the highest mean score, ascending.
///
/// Indices missing from `index_to_word` are counted under the
/// sentinel, like padding.
pub fn significant_words<A: ActivationSource>(
    source:        &A,
    sequences:     &[Vec<u32>],
    index_to_word: &IndexMap<u32, String>,
    batch_size:    usize,
    top_k:         usize,
) -> Result<Vec<WordScore>> {
    let mut acc = ScoreAccumulator::default();

    for (t, batch) in sequences.chunks(batch_size.max(1)).enumerate() {
        let activations = source.activations(batch)?;
        if activations.len() != batch.len() {
            return Err(anyhow!(
                "batch {t}: {} activation rows for {} sequences",
                activations.len(),
                batch.len()
            ));
        }

        for (seq, acts) in batch.iter().zip(&activations) {
            for (idx, act) in seq.iter().zip(acts) {
                let word = index_to_word
                    .get(idx)
                    .map(String::as_str)
                    .unwrap_or(SENTINEL_WORD);
                acc.add(word, f64::from(act[1]) - f64::from(act[0]));
            }
        }
        tracing::debug!("Scored batch {} ({} sequences)", t, batch.len());
    }

    let mut ranked = acc.into_means();
    // Stable: equal means keep first-seen order
    ranked.sort_by(|a, b| a.score.total_cmp(&b.score));

    let skip = ranked.len().saturating_sub(top_k);
    Ok(ranked.split_off(skip))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Activations;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Activation source whose positive channel is the token id
    /// scaled by `weight`, recording every batch size it sees.
    struct FakeSource {
        weight:  f32,
        batches: RefCell<Vec<usize>>,
    }

    impl FakeSource {
        fn new(weight: f32) -> Self {
            Self { weight, batches: RefCell::new(Vec::new()) }
        }
    }

    impl ActivationSource for FakeSource {
        fn activations(&self, sequences: &[Vec<u32>]) -> Result<Activations> {
            self.batches.borrow_mut().push(sequences.len());
            Ok(sequences
                .iter()
                .map(|s| s.iter().map(|&i| [0.0, i as f32 * self.weight]).collect())
                .collect())
        }
    }

    /// Returns a fixed score per call, in order
    struct ScriptedSource {
        scores: RefCell<Vec<f32>>,
    }

    impl ActivationSource for ScriptedSource {
        fn activations(&self, sequences: &[Vec<u32>]) -> Result<Activations> {
            Ok(sequences
                .iter()
                .map(|s| {
                    s.iter()
                        .map(|_| [1.0, 1.0 + self.scores.borrow_mut().remove(0)])
                        .collect()
                })
                .collect())
        }
    }

    fn words(n: u32) -> IndexMap<u32, String> {
        let mut map: IndexMap<u32, String> = (1..=n).map(|i| (i, format!("w{i}"))).collect();
        map.insert(0, SENTINEL_WORD.to_string());
        map
    }

    #[test]
    fn test_partial_last_batch_included_once() {
        let source = FakeSource::new(1.0);
        let seqs: Vec<Vec<u32>> = (1..=5).map(|i| vec![i]).collect();
        let ranked = significant_words(&source, &seqs, &words(5), 2, 100).unwrap();

        assert_eq!(*source.batches.borrow(), vec![2, 2, 1]);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked.last().unwrap().word, "w5");
    }

    #[test]
    fn test_even_batches() {
        let source = FakeSource::new(1.0);
        let seqs: Vec<Vec<u32>> = (1..=4).map(|i| vec![i]).collect();
        significant_words(&source, &seqs, &words(4), 2, 100).unwrap();
        assert_eq!(*source.batches.borrow(), vec![2, 2]);
    }

    #[test]
    fn test_mean_of_scores() {
        let source = ScriptedSource { scores: RefCell::new(vec![1.0, 3.0]) };
        let ranked = significant_words(&source, &[vec![1], vec![1]], &words(1), 1, 10).unwrap();
        assert_eq!(ranked, vec![WordScore { word: "w1".into(), score: 2.0 }]);
    }

    #[test]
    fn test_top_k_ascending_without_duplicates() {
        let source = FakeSource::new(-1.0);
        let seqs   = vec![vec![0, 1, 2], vec![3, 1, 0], vec![4, 4, 2]];
        let ranked = significant_words(&source, &seqs, &words(4), 2, 3).unwrap();

        assert_eq!(ranked.len(), 3);
        let names: Vec<&str> = ranked.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["w2", "w1", SENTINEL_WORD]);
        assert!(ranked.windows(2).all(|w| w[0].score <= w[1].score));
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_k_larger_than_observed_words() {
        let source = FakeSource::new(1.0);
        let ranked = significant_words(&source, &[vec![0, 1]], &words(50), 64, 100).unwrap();
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].is_sentinel());
    }

    #[test]
    fn test_unobserved_words_absent() {
        let source = FakeSource::new(1.0);
        let ranked = significant_words(&source, &[vec![2]], &words(3), 8, 10).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].word, "w2");
    }

    #[test]
    fn test_equal_scores_keep_first_seen_order() {
        let source = FakeSource::new(0.0);
        let ranked = significant_words(&source, &[vec![3, 1, 2]], &words(3), 8, 10).unwrap();
        let names: Vec<&str> = ranked.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["w3", "w1", "w2"]);
    }

    #[test]
    fn test_empty_input() {
        let source = FakeSource::new(1.0);
        assert!(significant_words(&source, &[], &words(3), 8, 10).unwrap().is_empty());
        assert!(source.batches.borrow().is_empty());
    }
}
