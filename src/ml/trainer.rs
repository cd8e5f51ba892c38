// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Manual fit/evaluate loop over Burn DataLoaders with RMSprop.
//
//   - Training uses MyBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns the model on the inner backend, which
//     also switches Dropout off for validation
//   - The embedding weight does not require gradients, so
//     GradientsParams holds nothing for it and RMSprop skips it
//
// Reference: Burn Book §5 (Custom Training Loop)
//            Hinton, Lecture 6e (RMSprop)

use anyhow::{bail, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer, RmsPropConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::sync::Arc;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{ReviewBatch, ReviewBatcher},
    dataset::ReviewDataset,
    embedding_matrix::EmbeddingMatrix,
};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::{count_correct, SentimentRnn, SentimentRnnConfig};

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Loss and accuracy over one pass of a loader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalMetrics {
    pub loss:     f64,
    pub accuracy: f64,
    pub samples:  usize,
}

#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub history:    Vec<EpochMetrics>,
    /// Test-split metrics of the final model
    pub final_eval: EvalMetrics,
    /// Epoch with the highest validation accuracy
    pub best_epoch: usize,
}

pub fn run_training(
    cfg:           &TrainConfig,
    model_cfg:     &SentimentRnnConfig,
    matrix:        &EmbeddingMatrix,
    train_dataset: ReviewDataset,
    test_dataset:  ReviewDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<TrainingSummary> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    let (_, summary) = train_loop::<MyBackend>(
        cfg, model_cfg, matrix, train_dataset, test_dataset, ckpt_manager, metrics, device,
    )?;
    Ok(summary)
}

#[allow(clippy::too_many_arguments)]
pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    model_cfg:     &SentimentRnnConfig,
    matrix:        &EmbeddingMatrix,
    train_dataset: ReviewDataset,
    test_dataset:  ReviewDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<(SentimentRnn<B>, TrainingSummary)> {
    if train_dataset.sample_count() == 0 || test_dataset.sample_count() == 0 {
        bail!(
            "Need at least one full batch of {} reviews in each split (train={}, test={})",
            cfg.batch_size,
            train_dataset.sample_count(),
            test_dataset.sample_count(),
        );
    }

    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: SentimentRnn<B> = model_cfg.init_with_embeddings(matrix, &device)?;
    tracing::info!(
        "Model ready: embedding {}x{} (frozen), 2 x LSTM({}), dense {}",
        model_cfg.vocab_size, model_cfg.embedding_dim, model_cfg.hidden_size, model_cfg.dense_size,
    );

    // Same decay and epsilon as the Keras RMSprop defaults
    let mut optim = RmsPropConfig::new()
        .with_alpha(0.9)
        .with_epsilon(1e-7)
        .init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(ReviewBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(cfg.num_workers)
        .build(train_dataset);

    // Inner backend: no autodiff graph during validation
    let valid_loader = DataLoaderBuilder::new(ReviewBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(cfg.num_workers)
        .build(test_dataset);

    let mut history    = Vec::with_capacity(cfg.epochs);
    let mut best_acc   = f64::NEG_INFINITY;
    let mut best_epoch = 0usize;

    for epoch in 1..=cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            seen += batch.labels.dims()[0];
            let step = model.forward_classification(batch.tokens, batch.labels);

            loss_sum += step.loss.clone().into_scalar().elem::<f64>();
            batches  += 1;
            correct  += count_correct(step.probabilities.clone(), step.labels);

            let grads = step.loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = loss_sum / batches.max(1) as f64;
        let train_acc  = correct as f64 / seen.max(1) as f64;

        // ── Validation phase ──────────────────────────────────────────────────
        let valid = evaluate(&model.valid(), &valid_loader);

        println!(
            "Epoch {:>3}/{} | loss={:.4} | accuracy={:.4} | val_loss={:.4} | val_accuracy={:.4}",
            epoch, cfg.epochs, train_loss, train_acc, valid.loss, valid.accuracy,
        );

        let row = EpochMetrics::new(epoch, train_loss, train_acc, valid.loss, valid.accuracy);
        if row.is_improvement(best_acc) {
            best_acc   = row.val_acc;
            best_epoch = epoch;
        }
        metrics.log(&row)?;
        history.push(row);

        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    // ── Final evaluation ──────────────────────────────────────────────────────
    let final_eval = evaluate(&model.valid(), &valid_loader);
    tracing::info!(
        "Test evaluation: loss={:.4} accuracy={:.4} over {} reviews (best epoch {})",
        final_eval.loss, final_eval.accuracy, final_eval.samples, best_epoch,
    );

    Ok((model, TrainingSummary { history, final_eval, best_epoch }))
}

/// Mean batch loss and overall accuracy of `model` over `loader`.
pub fn evaluate<B: Backend>(
    model:  &SentimentRnn<B>,
    loader: &Arc<dyn DataLoader<ReviewBatch<B>>>,
) -> EvalMetrics {
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut correct  = 0usize;
    let mut samples  = 0usize;

    for batch in loader.iter() {
        samples += batch.labels.dims()[0];
        let step = model.forward_classification(batch.tokens, batch.labels);
        loss_sum += step.loss.into_scalar().elem::<f64>();
        batches  += 1;
        correct  += count_correct(step.probabilities, step.labels);
    }

    if batches == 0 {
        return EvalMetrics { loss: f64::NAN, accuracy: 0.0, samples: 0 };
    }
    EvalMetrics {
        loss:     loss_sum / batches as f64,
        accuracy: correct as f64 / samples as f64,
        samples,
    }
}

/// Evaluate a dataset with a plain (non-autodiff) model.
pub fn evaluate_dataset<B: Backend>(
    model:       &SentimentRnn<B>,
    dataset:     ReviewDataset,
    batch_size:  usize,
    num_workers: usize,
    device:      B::Device,
) -> EvalMetrics {
    let loader = DataLoaderBuilder::new(ReviewBatcher::<B>::new(device))
        .batch_size(batch_size)
        .num_workers(num_workers)
        .build(dataset);
    evaluate(model, &loader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{dataset::ReviewSample, glove::WordVectors, vocabulary::WordIndex};
    use burn::backend::{Autodiff, NdArray};
    use std::{fs, io::Cursor};

    type TestBackend = Autodiff<NdArray>;

    fn matrix() -> EmbeddingMatrix {
        let index = WordIndex::from_words(["good", "great", "bad", "awful"]);
        let vectors = WordVectors::from_reader(
            Cursor::new("good 1 0.5 0\ngreat 0.9 0.4 0.1\nbad -1 -0.5 0\nawful -0.8 -0.6 0.2\n"),
            None,
        )
        .unwrap();
        EmbeddingMatrix::build(&index, &vectors, 100, 3).unwrap()
    }

    // positives use ids 4/5, negatives 6/7
    fn dataset(n: usize) -> ReviewDataset {
        let samples = (0..n)
            .map(|i| {
                let label = (i % 2) as u8;
                let word  = if label == 1 { 4 + (i % 4 / 2) as u32 } else { 6 + (i % 4 / 2) as u32 };
                ReviewSample { tokens: vec![0, 1, word, word], label }
            })
            .collect();
        ReviewDataset::new(samples)
    }

    fn config(dir: &std::path::Path) -> TrainConfig {
        TrainConfig {
            checkpoint_dir: dir.to_string_lossy().into_owned(),
            batch_size:     4,
            epochs:         2,
            embedding_dim:  3,
            hidden_size:    4,
            dense_size:     4,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_train_loop_checkpoints_logs_and_keeps_embedding_frozen() {
        let tmp     = tempfile::tempdir().unwrap();
        let cfg     = config(tmp.path());
        let m       = matrix();
        let model_cfg = SentimentRnnConfig::new(m.rows(), 3, 4).with_dense_size(4);
        let ckpt    = CheckpointManager::new(tmp.path()).unwrap();
        let metrics = MetricsLogger::new(tmp.path()).unwrap();

        let (model, summary) = train_loop::<TestBackend>(
            &cfg, &model_cfg, &m, dataset(16), dataset(8), &ckpt, &metrics, Default::default(),
        )
        .unwrap();

        assert_eq!(summary.history.len(), 2);
        assert_eq!(summary.final_eval.samples, 8);
        assert!(summary.final_eval.loss.is_finite());
        assert!((0.0..=1.0).contains(&summary.final_eval.accuracy));
        assert!((1..=2).contains(&summary.best_epoch));
        assert_eq!(ckpt.latest_epoch().unwrap(), 2);

        let csv = fs::read_to_string(metrics.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 3);

        let weights: Vec<f32> = model.embedding.weight.val().into_data().to_vec().unwrap();
        assert_eq!(weights, m.values());
    }

    #[test]
    fn test_empty_split_is_rejected() {
        let tmp     = tempfile::tempdir().unwrap();
        let cfg     = config(tmp.path());
        let m       = matrix();
        let model_cfg = SentimentRnnConfig::new(m.rows(), 3, 4);
        let ckpt    = CheckpointManager::new(tmp.path()).unwrap();
        let metrics = MetricsLogger::new(tmp.path()).unwrap();

        let result = train_loop::<TestBackend>(
            &cfg, &model_cfg, &m, dataset(8), dataset(0), &ckpt, &metrics, Default::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_evaluate_dataset_counts_every_sample() {
        let device = Default::default();
        let model: SentimentRnn<NdArray> = SentimentRnnConfig::new(8, 3, 4).init(&device);
        let eval = evaluate_dataset(&model, dataset(6), 4, 1, device);
        assert_eq!(eval.samples, 6);
        assert!(eval.loss.is_finite());
    }
}
