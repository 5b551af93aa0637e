// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles the concerns that don't belong in any specific
// business layer:
//
//   checkpoint.rs      — Saving and loading model weights
//                        Uses Burn's CompactRecorder for the
//                        best epoch's model and optimizer state.
//                        Also saves/loads TrainConfig as JSON
//                        so inference can rebuild the model.
//
//   tokenizer_store.rs — Vocabulary persistence
//                        Writes the frozen vocabulary as a
//                        WordLevel tokenizer.json and loads it
//                        back for prediction and explanation.
//
//   metrics.rs         — Training metrics
//                        Binary precision/recall/F1 and a CSV
//                        log with one row per epoch.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Vocabulary saving and loading as a tokenizer
pub mod tokenizer_store;

/// Validation metrics and the per-epoch CSV logger
pub mod metrics;
