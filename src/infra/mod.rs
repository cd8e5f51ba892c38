// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by the training, evaluation
// and prediction workflows:
//
//   checkpoint.rs - Model weights through Burn's CompactRecorder,
//                   plus the training and model configs as JSON
//                   so a later run can rebuild the architecture.
//
//   tokenizer_store.rs - WordLevel tokenizer over the word index,
//                   saved as tokenizer.json beside the checkpoints.
//
//   metrics.rs    - Per-epoch loss and accuracy appended to a CSV
//                   file for plotting learning curves.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Review tokenizer build, save and load
pub mod tokenizer_store;
