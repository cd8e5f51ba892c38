// ============================================================
// Layer 3 - Review Domain Types
// ============================================================
// A movie review is free text with a binary sentiment label.
// The dataset encodes the label as 1 (positive) or 0 (negative),
// which is also the target the sigmoid output is trained on.

use serde::{Deserialize, Serialize};

/// Binary sentiment of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    /// The integer label used as the training target
    pub fn label(self) -> u8 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Positive => 1,
        }
    }

    /// Threshold a positive-class probability at 0.5
    pub fn from_probability(p: f32) -> Self {
        if p >= 0.5 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Positive => write!(f, "positive"),
        }
    }
}

/// A raw labelled review as read from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unprocessed review text (may still contain HTML line breaks)
    pub text: String,

    pub sentiment: Sentiment,
}

impl Review {
    pub fn new(text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self { text: text.into(), sentiment }
    }
}

/// Classifier output for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// p(positive | review)
    pub probability: f32,

    pub sentiment: Sentiment,
}

impl Prediction {
    pub fn from_probability(probability: f32) -> Self {
        Self { probability, sentiment: Sentiment::from_probability(probability) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Sentiment::Positive.label(), 1);
        assert_eq!(Sentiment::Negative.label(), 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(Sentiment::from_probability(0.5), Sentiment::Positive);
        assert_eq!(Sentiment::from_probability(0.4999), Sentiment::Negative);
    }

    #[test]
    fn test_prediction_display() {
        let p = Prediction::from_probability(0.91);
        assert_eq!(p.sentiment.to_string(), "positive");
    }
}
