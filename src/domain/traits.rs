// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to these traits, not to the
// concrete CSV reader or the Burn model behind them:
//   - CsvSampleLoader   implements SampleSource
//   - Inferencer        implements ActivationSource
//
// This keeps the word attribution scorer testable with a
// hand-written activation source and no trained model.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::sample::Sample;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can load dataset rows.
pub trait SampleSource {
    /// Load every row in source order.
    fn load_all(&self) -> Result<Vec<Sample>>;
}

// ─── ActivationSource ─────────────────────────────────────────────────────────
/// Per-position two-channel activations for one batch.
/// Shape: `[batch][seq_len][2]`, channel 0 = negative, 1 = positive.
pub type Activations = Vec<Vec<[f32; 2]>>;

/// Anything that maps a batch of padded token sequences to the
/// intermediate activations the attribution scorer reads.
pub trait ActivationSource {
    fn activations(&self, sequences: &[Vec<u32>]) -> Result<Activations>;
}
