// ============================================================
// Layer 2 - EvaluateUseCase
// ============================================================
// Re-runs the test-split evaluation against the latest saved
// checkpoint, rebuilding the encoding pipeline from the saved
// training config and tokenizer.

use anyhow::Result;

use crate::application::train_use_case::build_split;
use crate::data::loader::ImdbLoader;
use crate::domain::traits::Split;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::{
    inferencer::Inferencer,
    trainer::{evaluate_dataset, EvalMetrics},
};

type EvalBackend = burn::backend::Wgpu;

pub struct EvaluateUseCase {
    checkpoint_dir: String,
    /// Overrides the dataset location recorded at training time
    data_dir:       Option<String>,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: String, data_dir: Option<String>) -> Self {
        Self { checkpoint_dir, data_dir }
    }

    pub fn execute(&self) -> Result<EvalMetrics> {
        let ckpt    = CheckpointManager::new(&self.checkpoint_dir)?;
        let mut cfg = ckpt.load_config()?;
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }

        let encoder = cfg.encoder(TokenizerStore::new(&self.checkpoint_dir).load()?);
        let dataset = build_split(&ImdbLoader::new(&cfg.data_dir), Split::Test, &encoder, cfg.batch_size)?;

        let device     = burn::backend::wgpu::WgpuDevice::default();
        let inferencer = Inferencer::<EvalBackend>::from_checkpoint(&ckpt, device.clone())?;

        let metrics = evaluate_dataset(inferencer.model(), dataset, cfg.batch_size, cfg.num_workers, device);
        tracing::info!(
            "Evaluation: loss={:.4} accuracy={:.4} over {} reviews",
            metrics.loss, metrics.accuracy, metrics.samples,
        );
        Ok(metrics)
    }
}
