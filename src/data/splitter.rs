// ============================================================
// Layer 4 — Validation Hold-out
// ============================================================
// Sets aside a fraction of the labelled tweets for validation.
// That set drives early stopping and picks the checkpoint that
// is kept, so it must never be trained on.
//
// Rows are shuffled with a seeded StdRng first: a CSV sorted by
// label would otherwise put one class entirely in validation.
// The same seed always yields the same hold-out.
//
// Reference: rand crate documentation

use anyhow::{anyhow, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `items` and move `round(n * validation_split)` of them
/// into the second vector. Returns (train, validation).
pub fn hold_out<T>(mut items: Vec<T>, validation_split: f64, seed: u64) -> Result<(Vec<T>, Vec<T>)> {
    if !(0.0..1.0).contains(&validation_split) {
        return Err(anyhow!(
            "validation split must be in [0, 1), got {validation_split}"
        ));
    }

    items.shuffle(&mut StdRng::seed_from_u64(seed));

    let n_val      = ((items.len() as f64) * validation_split).round() as usize;
    let validation = items.split_off(items.len() - n_val.min(items.len()));

    tracing::debug!("Held out {} of {} rows", validation.len(), items.len() + validation.len());
    Ok((items, validation))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_held_out() {
        let (train, val) = hold_out((0..100).collect::<Vec<u32>>(), 0.25, 42).unwrap();
        assert_eq!((train.len(), val.len()), (75, 25));
    }

    #[test]
    fn test_rounding() {
        let (train, val) = hold_out((0..7).collect::<Vec<u32>>(), 0.25, 42).unwrap();
        assert_eq!((train.len(), val.len()), (5, 2));
    }

    #[test]
    fn test_no_row_lost_or_duplicated() {
        let (train, val) = hold_out((0..50).collect::<Vec<u32>>(), 0.3, 1).unwrap();
        let mut all: Vec<u32> = train.into_iter().chain(val).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = hold_out((0..30).collect::<Vec<u32>>(), 0.5, 7).unwrap();
        let b = hold_out((0..30).collect::<Vec<u32>>(), 0.5, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_split_keeps_everything_for_training() {
        let (train, val) = hold_out(vec!['a', 'b', 'c'], 0.0, 3).unwrap();
        assert_eq!(train.len(), 3);
        assert!(val.is_empty());
    }

    #[test]
    fn test_invalid_split() {
        assert!(hold_out(vec![1, 2], 1.0, 0).is_err());
        assert!(hold_out(vec![1, 2], -0.1, 0).is_err());
    }
}
