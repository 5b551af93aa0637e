// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of the sentiment pipeline.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - NO tokenizer library types
//   - Only plain Rust structs, enums, and traits
//
// Everything here can be unit tested without a GPU or a
// checkpoint directory.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A tweet row: id, raw text and an optional sentiment label
pub mod sample;

// Frozen word ↔ index mapping built from the training corpus
pub mod vocabulary;

// Core abstractions (traits) that other layers implement
pub mod traits;
