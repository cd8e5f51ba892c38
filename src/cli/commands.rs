// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `evaluate` and `predict`
// and all their configurable flags. Defaults reproduce the
// reference run (10k words, 80 ids per review, GloVe 100d).
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{builder::RangedU64ValueParser, Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the LSTM classifier on IMDB reviews with GloVe embeddings
    Train(TrainArgs),

    /// Evaluate the latest checkpoint on the test split
    Evaluate(EvaluateArgs),

    /// Classify the sentiment of a review
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Extracted aclImdb directory (contains imdb.vocab, train/, test/)
    #[arg(long, default_value = "data/aclImdb")]
    pub data_dir: String,

    /// Pretrained word vectors in GloVe text format
    #[arg(long, default_value = "data/glove.6B/glove.6B.100d.txt")]
    pub glove_path: String,

    /// Directory to save checkpoints, configs and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, default_value_t = 128, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub batch_size: usize,

    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// RMSprop learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Vocabulary size, reserved ids included; rarer words are encoded as <UNK>
    #[arg(long, default_value_t = 10_000, value_parser = RangedU64ValueParser::<usize>::new().range(4..))]
    pub num_words: usize,

    /// Must match the dimension of the GloVe file
    #[arg(long, default_value_t = 100)]
    pub embedding_dim: usize,

    /// Reviews are truncated or front-padded to this many ids
    #[arg(long, default_value_t = 80, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_review_len: usize,

    /// LSTM state size
    #[arg(long, default_value_t = 32)]
    pub hidden_size: usize,

    /// Width of the dense layer in the classification head
    #[arg(long, default_value_t = 32)]
    pub dense_size: usize,

    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    #[arg(long, default_value_t = 22)]
    pub seed: u64,

    /// Data loader worker threads
    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:       a.data_dir,
            glove_path:     a.glove_path,
            checkpoint_dir: a.checkpoint_dir,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            num_words:      a.num_words,
            embedding_dim:  a.embedding_dim,
            max_review_len: a.max_review_len,
            hidden_size:    a.hidden_size,
            dense_size:     a.dense_size,
            dropout:        a.dropout,
            seed:           a.seed,
            num_workers:    a.num_workers,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Use a different aclImdb location than the one saved at training time
    #[arg(long)]
    pub data_dir: Option<String>,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Review text to classify
    #[arg(long)]
    pub text: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
