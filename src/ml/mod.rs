// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn framework specific code.
//
//   model.rs       — The classifier architecture
//                    • Token embeddings + spatial dropout
//                    • Bidirectional LSTM
//                    • LSTM
//                    • Kernel-1 Conv1d + ReLU (attribution layer)
//                    • Global average pooling → 2 logits
//
//   trainer.rs     — The training loop
//                    Weighted loss, Adam, validation metrics,
//                    early stopping, save-best checkpointing
//
//   inferencer.rs  — Loads the best checkpoint, predicts labels
//                    and exposes attribution-layer activations
//
//   attribution.rs — Word attribution scorer: per-word mean
//                    contribution towards the positive class
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Recurrent/convolutional sentiment classifier
pub mod model;

/// Training loop with validation, early stopping and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint, predicts, exposes activations
pub mod inferencer;

/// Ranks words by mean contribution score
pub mod attribution;
