use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use tokenizers::{Encoding, Tokenizer};

use crate::data::{
    padding::{pad_sequence, pad_sequences},
    vocabulary::{START_ID, UNK_ID},
};
use crate::domain::review::Review;

/// Turns raw review text into a fixed-length id sequence:
/// tokenize -> `[START, ids...]` -> pad/truncate to `max_len`.
///
/// Ids at or above `num_words` are replaced by `<UNK>`.
pub struct ReviewEncoder {
    tokenizer: Tokenizer,
    num_words: usize,
    max_len:   usize,
}

impl ReviewEncoder {
    pub fn new(tokenizer: Tokenizer, num_words: usize, max_len: usize) -> Self {
        Self { tokenizer, num_words, max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn capped_ids(&self, encoding: &Encoding) -> Vec<u32> {
        let mut ids = Vec::with_capacity(encoding.len() + 1);
        ids.push(START_ID);
        ids.extend(encoding.get_ids().iter().map(|&id| {
            if (id as usize) < self.num_words { id } else { UNK_ID }
        }));
        ids
    }

    /// Encoded ids before padding, one sequence per text.
    pub fn encode_unpadded(&self, texts: Vec<&str>) -> Result<Vec<Vec<u32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts, false)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {e}"))?;
        Ok(encodings.iter().map(|e| self.capped_ids(e)).collect())
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {e}"))?;
        Ok(pad_sequence(&self.capped_ids(&encoding), self.max_len))
    }
}

/// One padded review with its 0/1 label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSample {
    pub tokens: Vec<u32>,
    pub label:  u8,
}

pub struct ReviewDataset {
    samples: Vec<ReviewSample>,
}

impl ReviewDataset {
    pub fn new(samples: Vec<ReviewSample>) -> Self { Self { samples } }

    /// Encode and pad every review of a split.
    pub fn encode(reviews: &[Review], encoder: &ReviewEncoder) -> Result<Self> {
        let unpadded = encoder.encode_unpadded(reviews.iter().map(|r| r.text.as_str()).collect())?;
        if let Some(first) = unpadded.first() {
            tracing::info!(
                "{} reviews, first review has {} ids before padding",
                reviews.len(),
                first.len(),
            );
        }

        let samples = pad_sequences(&unpadded, encoder.max_len())
            .into_iter()
            .zip(reviews)
            .map(|(tokens, r)| ReviewSample { tokens, label: r.sentiment.label() })
            .collect();
        Ok(Self::new(samples))
    }

    /// Drop trailing samples so every batch is full.
    pub fn drop_remainder(mut self, batch_size: usize) -> Self {
        if batch_size > 0 {
            let keep = (self.samples.len() / batch_size) * batch_size;
            self.samples.truncate(keep);
        }
        self
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// `[samples, sequence length]`
    pub fn shape(&self) -> [usize; 2] {
        let seq_len = self.samples.first().map_or(0, |s| s.tokens.len());
        [self.samples.len(), seq_len]
    }

    /// (max, min) label, None when empty
    pub fn label_range(&self) -> Option<(u8, u8)> {
        let max = self.samples.iter().map(|s| s.label).max()?;
        let min = self.samples.iter().map(|s| s.label).min()?;
        Some((max, min))
    }
}

impl Dataset<ReviewSample> for ReviewDataset {
    fn get(&self, index: usize) -> Option<ReviewSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
