// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers for one user-facing goal:
//
//   train    - build datasets and embeddings, fit, evaluate
//   evaluate - reload the latest checkpoint, score the test split
//   predict  - reload the latest checkpoint, score one review
//
// No tensor math here and no printing; only workflow coordination.
//
// Reference: Clean Architecture pattern

// The training workflow (also owns TrainConfig)
pub mod train_use_case;

// Test-split evaluation of a saved checkpoint
pub mod evaluate_use_case;

// Single-review sentiment prediction
pub mod predict_use_case;
