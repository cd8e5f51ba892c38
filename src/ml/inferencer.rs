// ============================================================
// Layer 5 - Inferencer
// ============================================================
use anyhow::Result;
use burn::prelude::*;

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::SentimentRnn;

/// A trained model restored from the checkpoint directory.
pub struct Inferencer<B: Backend> {
    model:  SentimentRnn<B>,
    device: B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let model_cfg = ckpt_manager.load_model_config()?;
        let model     = ckpt_manager.load_model(model_cfg.init(&device), &device)?;
        tracing::info!("Model loaded from checkpoint");
        Ok(Self::new(model, device))
    }

    pub fn new(model: SentimentRnn<B>, device: B::Device) -> Self {
        Self { model, device }
    }

    pub fn model(&self) -> &SentimentRnn<B> {
        &self.model
    }

    /// p(positive) for each already-padded sequence; all must share a length.
    pub fn predict(&self, sequences: &[Vec<u32>]) -> Result<Vec<f32>> {
        let Some(first) = sequences.first() else {
            return Ok(Vec::new());
        };
        let seq_len = first.len();
        if let Some(bad) = sequences.iter().find(|s| s.len() != seq_len) {
            anyhow::bail!("Sequence of length {} in a batch of length {}", bad.len(), seq_len);
        }

        let flat: Vec<i32> = sequences.iter().flatten().map(|&x| x as i32).collect();
        let tokens = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([sequences.len(), seq_len]);

        let probs = self.model.forward(tokens).into_data().convert::<f32>();
        probs
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read predictions: {e:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::SentimentRnnConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_restores_saved_model() {
        let tmp    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(tmp.path()).unwrap();
        let device = Default::default();
        let cfg    = SentimentRnnConfig::new(10, 3, 4);

        let model: SentimentRnn<TestBackend> = cfg.init(&device);
        ckpt.save_model_config(&cfg).unwrap();
        ckpt.save_model(&model, 1).unwrap();

        let original = Inferencer::new(model, device.clone());
        let restored = Inferencer::<TestBackend>::from_checkpoint(&ckpt, device).unwrap();

        let seqs = vec![vec![0, 1, 4, 5], vec![1, 6, 7, 9]];
        let a = original.predict(&seqs).unwrap();
        let b = restored.predict(&seqs).unwrap();
        assert_eq!(a.len(), 2);
        for (x, y) in a.iter().zip(&b) {
            // weights round-trip through half precision
            assert!((x - y).abs() < 1e-2, "{x} vs {y}");
        }
    }

    #[test]
    fn test_rejects_ragged_batch() {
        let device = Default::default();
        let model: SentimentRnn<TestBackend> = SentimentRnnConfig::new(10, 3, 4).init(&device);
        let inf = Inferencer::new(model, device);
        assert!(inf.predict(&[vec![1, 2], vec![1]]).is_err());
        assert!(inf.predict(&[]).unwrap().is_empty());
    }
}
