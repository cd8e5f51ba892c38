// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer talks to data sources and classifiers
// through these traits only:
//   - ImdbLoader       implements ReviewSource
//   - PredictUseCase   implements SentimentClassifier
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::review::{Prediction, Review};

/// Which half of a labelled corpus to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// Directory name of the split inside the dataset root
    pub fn dir_name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

// ─── ReviewSource ─────────────────────────────────────────────────────────────
/// Any component that can produce labelled reviews for a split.
pub trait ReviewSource {
    fn load_split(&self, split: Split) -> Result<Vec<Review>>;
}

// ─── SentimentClassifier ──────────────────────────────────────────────────────
/// Any component that can score the sentiment of raw review text.
pub trait SentimentClassifier {
    fn classify(&self, text: &str) -> Result<Prediction>;
}
