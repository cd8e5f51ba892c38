// ============================================================
// Layer 2 - PredictUseCase
// ============================================================
// Scores raw review text with a trained checkpoint. The text goes
// through the same tokenize → encode → pad pipeline as training,
// using the saved tokenizer and the lengths from the saved config.
// The dataset directory is not needed.

use anyhow::{Context, Result};
use burn::prelude::Backend;

use crate::data::dataset::ReviewEncoder;
use crate::domain::review::Prediction;
use crate::domain::traits::SentimentClassifier;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::inferencer::Inferencer;

type InferBackend = burn::backend::Wgpu;

pub struct PredictUseCase<B: Backend = InferBackend> {
    encoder:    ReviewEncoder,
    inferencer: Inferencer<B>,
}

impl PredictUseCase<InferBackend> {
    pub fn new(checkpoint_dir: &str) -> Result<Self> {
        let ckpt       = CheckpointManager::new(checkpoint_dir)?;
        let cfg        = ckpt.load_config()?;
        let encoder    = cfg.encoder(TokenizerStore::new(checkpoint_dir).load()?);
        let device     = burn::backend::wgpu::WgpuDevice::default();
        let inferencer = Inferencer::from_checkpoint(&ckpt, device)?;
        Ok(Self::with_parts(encoder, inferencer))
    }
}

impl<B: Backend> PredictUseCase<B> {
    pub fn with_parts(encoder: ReviewEncoder, inferencer: Inferencer<B>) -> Self {
        Self { encoder, inferencer }
    }
}

impl<B: Backend> SentimentClassifier for PredictUseCase<B> {
    fn classify(&self, text: &str) -> Result<Prediction> {
        let ids = self.encoder.encode(text)?;
        tracing::debug!("Encoded review: {:?}", ids);

        let probs = self.inferencer.predict(&[ids])?;
        let p = probs.first().copied().context("Model returned no prediction")?;
        Ok(Prediction::from_probability(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::infra::tokenizer_store::tokenizer_for;
    use crate::ml::model::{SentimentRnn, SentimentRnnConfig};
    use burn::backend::NdArray;

    #[test]
    fn test_classify_returns_probability() {
        let device  = Default::default();
        let model: SentimentRnn<NdArray> = SentimentRnnConfig::new(10, 3, 4).init(&device);
        let cfg     = TrainConfig { num_words: 10, max_review_len: 6, ..TrainConfig::default() };
        let encoder = cfg.encoder(tokenizer_for(&["good", "bad", "film"]));
        let usecase = PredictUseCase::with_parts(encoder, Inferencer::new(model, device));

        let p = usecase.classify("A good film, not bad at all.<br />").unwrap();
        assert!((0.0..=1.0).contains(&p.probability));
        assert_eq!(p.sentiment, crate::domain::review::Sentiment::from_probability(p.probability));
    }
}
