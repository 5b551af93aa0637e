// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (training, labelling a test file, or
// explaining what the model learned).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - No direct file format handling (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow and its configuration
pub mod train_use_case;

// Labels an unlabelled CSV with the best checkpoint
pub mod predict_use_case;

// Ranks vocabulary words by contribution to the positive class
pub mod explain_use_case;

// Checkpoint artifacts shared by predict and explain
pub mod artifacts;

#[cfg(test)]
pub(crate) mod test_support;
