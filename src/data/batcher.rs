// ============================================================
// Layer 4 - Review Batcher
// ============================================================
// Implements Burn's Batcher trait to stack ReviewSamples into
// tensors for one forward pass.
//
//   Input:  Vec of N ReviewSamples, each with S token ids
//   Output: ReviewBatch { tokens: [N, S], labels: [N] }
//
// All samples are padded to the same length beforehand, so the
// ids can be flattened and reshaped without dynamic padding.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ReviewSample;

#[derive(Debug, Clone)]
pub struct ReviewBatch<B: Backend> {
    /// Padded token ids - shape: [batch_size, seq_len]
    pub tokens: Tensor<B, 2, Int>,

    /// 0/1 sentiment labels - shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct ReviewBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ReviewBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ReviewSample, ReviewBatch<B>> for ReviewBatcher<B> {
    fn batch(&self, items: Vec<ReviewSample>) -> ReviewBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map_or(0, |s| s.tokens.len());

        let token_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.tokens.iter().map(|&x| x as i32))
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let tokens = Tensor::<B, 1, Int>::from_ints(token_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        ReviewBatch { tokens, labels }
    }
}
