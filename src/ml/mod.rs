// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All model and training code that touches Burn modules lives here:
//
//   model.rs      - Frozen GloVe embedding, two stacked LSTMs,
//                   dense/dropout/ReLU head, sigmoid output
//
//   trainer.rs    - RMSprop fit loop with per-epoch validation,
//                   checkpointing and the final test evaluation
//
//   inferencer.rs - Restores a checkpoint and scores padded
//                   review sequences
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Hochreiter & Schmidhuber (1997) LSTM
//            Pennington et al. (2014) GloVe

/// Sentiment classifier architecture
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Inference engine - loads a checkpoint and predicts
pub mod inferencer;
