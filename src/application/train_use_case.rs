// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Word index → tokenizer        (Layer 4 data, Layer 6 infra)
//   Step 2: Load train/test reviews       (Layer 4 - data)
//   Step 3: Encode, pad, build datasets   (Layer 4 - data)
//   Step 4: Load GloVe vectors            (Layer 4 - data)
//   Step 5: Build the embedding matrix    (Layer 4 - data)
//   Step 6: Save configs                  (Layer 6 - infra)
//   Step 7: Run fit + evaluate            (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::data::{
    dataset::{ReviewDataset, ReviewEncoder},
    embedding_matrix::EmbeddingMatrix,
    glove::WordVectors,
    loader::ImdbLoader,
    vocabulary::WordIndex,
};
use crate::domain::traits::{ReviewSource, Split};
use crate::infra::{
    checkpoint::CheckpointManager, metrics::MetricsLogger, tokenizer_store::TokenizerStore,
};
use crate::ml::model::SentimentRnnConfig;
use crate::ml::trainer::{run_training, TrainingSummary};

// ─── Training Configuration ──────────────────────────────────────────────────
// Hyperparameters and paths for one run. Saved next to the
// checkpoints so `evaluate` and `predict` can rebuild the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Extracted aclImdb directory
    pub data_dir:       String,
    /// GloVe text file, e.g. glove.6B.100d.txt
    pub glove_path:     String,
    pub checkpoint_dir: String,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    /// Vocabulary cap: ids at or above this become <UNK>
    pub num_words:      usize,
    pub embedding_dim:  usize,
    pub max_review_len: usize,
    pub hidden_size:    usize,
    pub dense_size:     usize,
    pub dropout:        f64,
    pub seed:           u64,
    pub num_workers:    usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:       "data/aclImdb".to_string(),
            glove_path:     "data/glove.6B/glove.6B.100d.txt".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            batch_size:     128,
            epochs:         20,
            lr:             1e-3,
            num_words:      10_000,
            embedding_dim:  100,
            max_review_len: 80,
            hidden_size:    32,
            dense_size:     32,
            dropout:        0.5,
            seed:           22,
            num_workers:    1,
        }
    }
}

impl TrainConfig {
    /// Model architecture for a vocabulary of `vocab_size` rows
    pub fn model_config(&self, vocab_size: usize) -> SentimentRnnConfig {
        SentimentRnnConfig::new(vocab_size, self.embedding_dim, self.hidden_size)
            .with_dense_size(self.dense_size)
            .with_dropout(self.dropout)
    }

    /// The encoder used for training, evaluation and prediction
    pub fn encoder(&self, tokenizer: Tokenizer) -> ReviewEncoder {
        ReviewEncoder::new(tokenizer, self.num_words, self.max_review_len)
    }
}

/// Encode a split into a dataset whose length is a multiple of the batch size.
pub fn build_split(
    loader:     &impl ReviewSource,
    split:      Split,
    encoder:    &ReviewEncoder,
    batch_size: usize,
) -> Result<ReviewDataset> {
    let reviews = loader.load_split(split)?;
    let dataset = ReviewDataset::encode(&reviews, encoder)?.drop_remainder(batch_size);

    let [n, len] = dataset.shape();
    match dataset.label_range() {
        Some((max, min)) => tracing::info!(
            "x_{} shape: [{}, {}], label max {} min {}",
            split.dir_name(), n, len, max, min,
        ),
        None => tracing::warn!("{} split has no full batch of {}", split.dir_name(), batch_size),
    }
    Ok(dataset)
}

pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainingSummary> {
        let cfg = &self.config;

        // ── Step 1: Word index → tokenizer ────────────────────────────────────
        let loader     = ImdbLoader::new(&cfg.data_dir);
        let word_index = WordIndex::from_vocab_file(loader.vocab_path())?;
        let tokenizer  = TokenizerStore::new(&cfg.checkpoint_dir).build_and_save(&word_index)?;
        let encoder    = cfg.encoder(tokenizer);

        // ── Steps 2-3: Reviews → padded datasets ──────────────────────────────
        tracing::info!("Loading IMDB reviews from '{}'", cfg.data_dir);

        let train_dataset = build_split(&loader, Split::Train, &encoder, cfg.batch_size)?;
        let test_dataset  = build_split(&loader, Split::Test, &encoder, cfg.batch_size)?;

        // ── Steps 4-5: GloVe → embedding matrix ───────────────────────────────
        let vectors = WordVectors::load(&cfg.glove_path, Some(cfg.embedding_dim))?;
        let matrix  = EmbeddingMatrix::build(
            &word_index, &vectors, cfg.num_words, cfg.embedding_dim,
        )?;
        tracing::info!(
            "Pretrained vectors cover {} of {} embedding rows ({:.1}%)",
            matrix.applied(),
            matrix.rows(),
            matrix.coverage() * 100.0,
        );

        // ── Step 6: Persist configs for evaluate/predict ──────────────────────
        let model_cfg    = cfg.model_config(matrix.rows());
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;
        ckpt_manager.save_model_config(&model_cfg)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
        tracing::info!("Writing epoch metrics to '{}'", metrics.csv_path().display());

        // ── Step 7: Fit and evaluate ──────────────────────────────────────────
        run_training(cfg, &model_cfg, &matrix, train_dataset, test_dataset, &ckpt_manager, &metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::{Review, Sentiment};
    use crate::infra::tokenizer_store::tokenizer_for;

    struct FixedSource(Vec<Review>);

    impl ReviewSource for FixedSource {
        fn load_split(&self, _split: Split) -> Result<Vec<Review>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_defaults_match_reference_run() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.batch_size, 128);
        assert_eq!(cfg.num_words, 10_000);
        assert_eq!(cfg.embedding_dim, 100);
        assert_eq!(cfg.max_review_len, 80);
        assert_eq!(cfg.hidden_size, 32);
        assert_eq!(cfg.epochs, 20);
    }

    #[test]
    fn test_model_config_uses_matrix_rows() {
        let model_cfg = TrainConfig::default().model_config(4_321);
        assert_eq!(model_cfg.vocab_size, 4_321);
        assert_eq!(model_cfg.embedding_dim, 100);
        assert_eq!(model_cfg.dropout, 0.5);
    }

    #[test]
    fn test_build_split_drops_partial_batch() {
        let reviews = (0..7)
            .map(|i| Review::new(format!("good movie {i}"), Sentiment::Positive))
            .collect();
        let encoder = TrainConfig { max_review_len: 5, ..TrainConfig::default() }
            .encoder(tokenizer_for(&["good", "movie"]));

        let ds = build_split(&FixedSource(reviews), Split::Train, &encoder, 3).unwrap();
        assert_eq!(ds.shape(), [6, 5]);
    }
}
