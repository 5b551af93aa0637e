// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a CSV file on disk and a tensor batch.
//
//   train.csv / test.csv
//       │
//       ▼
//   CsvSampleLoader   → reads rows (id, text, label?)
//       │
//       ▼
//   Normalizer        → ordered regex rewrite rules
//       │
//       ▼
//   SequenceEncoder   → frozen vocabulary ids, pre-padded
//       │
//       ▼
//   hold_out          → seeded shuffle, train / validation
//       │
//       ▼
//   SentimentDataset  → implements Burn's Dataset trait
//       │
//       ▼
//   SentimentBatcher  → stacks items into tensor batches
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads sample rows from CSV and writes predicted labels back
pub mod loader;

/// Ordered text rewrite rules applied to every tweet
pub mod normalizer;

/// Token ids and padding
pub mod encoder;

/// Implements Burn's Dataset trait for encoded tweets
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded validation hold-out
pub mod splitter;

/// Balanced per-class loss weights
pub mod class_weight;
