use anyhow::{bail, Result};
use burn::{
    nn::{
        loss::BinaryCrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    module::Param,
    prelude::*,
    tensor::{activation, Distribution},
};

use crate::data::embedding_matrix::EmbeddingMatrix;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct SentimentRnnConfig {
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    /// LSTM state size, shared by both recurrent layers
    pub hidden_size:   usize,
    #[config(default = 32)]
    pub dense_size:    usize,
    #[config(default = 0.5)]
    pub dropout:       f64,
}

impl SentimentRnnConfig {
    /// Randomly initialised model. Used to rebuild the architecture
    /// before loading a saved record.
    pub fn init<B: Backend>(&self, device: &B::Device) -> SentimentRnn<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        self.assemble(embedding.no_grad(), device)
    }

    /// Model whose embedding table is the pretrained matrix, frozen.
    pub fn init_with_embeddings<B: Backend>(
        &self,
        matrix: &EmbeddingMatrix,
        device: &B::Device,
    ) -> Result<SentimentRnn<B>> {
        if matrix.rows() != self.vocab_size || matrix.dim() != self.embedding_dim {
            bail!(
                "Embedding matrix is {}x{}, model expects {}x{}",
                matrix.rows(),
                matrix.dim(),
                self.vocab_size,
                self.embedding_dim,
            );
        }

        let weight = Tensor::<B, 2>::from_data(
            TensorData::new(matrix.values().to_vec(), [matrix.rows(), matrix.dim()]),
            device,
        );
        let embedding = Embedding { weight: Param::from_tensor(weight) }.no_grad();
        Ok(self.assemble(embedding, device))
    }

    fn assemble<B: Backend>(&self, embedding: Embedding<B>, device: &B::Device) -> SentimentRnn<B> {
        SentimentRnn {
            embedding,
            lstm_lower:   LstmConfig::new(self.embedding_dim, self.hidden_size, true).init(device),
            lstm_upper:   LstmConfig::new(self.hidden_size, self.hidden_size, true).init(device),
            rnn_dropout:  DropoutConfig::new(self.dropout).init(),
            dense:        LinearConfig::new(self.hidden_size, self.dense_size).init(device),
            head_dropout: DropoutConfig::new(self.dropout).init(),
            output:       LinearConfig::new(self.dense_size, 1).init(device),
        }
    }
}

/// Frozen embedding → two stacked LSTMs → dense head → sigmoid.
#[derive(Module, Debug)]
pub struct SentimentRnn<B: Backend> {
    pub embedding:    Embedding<B>,
    pub lstm_lower:   Lstm<B>,
    pub lstm_upper:   Lstm<B>,
    /// Input dropout of both LSTMs, one mask per sequence
    pub rnn_dropout:  Dropout,
    pub dense:        Linear<B>,
    pub head_dropout: Dropout,
    pub output:       Linear<B>,
}

pub struct ClassificationStep<B: Backend> {
    /// Mean binary cross-entropy over the batch
    pub loss:          Tensor<B, 1>,
    /// p(positive) per review - shape: [batch]
    pub probabilities: Tensor<B, 1>,
    pub labels:        Tensor<B, 1, Int>,
}

impl<B: Backend> SentimentRnn<B> {
    /// tokens: [batch, seq_len] → logits: [batch]
    pub fn forward_logits(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        let [batch_size, _] = tokens.dims();

        let x = self.embedding.forward(tokens); // [batch, seq_len, embedding_dim]

        // Lower layer returns every time step for the upper layer.
        let (x, _) = self.lstm_lower.forward(self.sequence_dropout(x), None);
        // Only the upper layer's final hidden state feeds the head.
        let (_, state) = self.lstm_upper.forward(self.sequence_dropout(x), None);

        let x = self.dense.forward(state.hidden); // [batch, dense_size]
        let x = activation::relu(self.head_dropout.forward(x));
        self.output.forward(x).reshape([batch_size])
    }

    /// Drops the same input features at every time step of a sequence.
    /// Inactive outside autodiff backends, like `Dropout`.
    fn sequence_dropout(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let prob = self.rnn_dropout.prob;
        if !B::ad_enabled() || prob == 0.0 {
            return x;
        }
        if prob >= 1.0 {
            return x.mul_scalar(0.0);
        }

        let [batch_size, seq_len, features] = x.dims();
        let keep = 1.0 - prob;
        let mask = Tensor::<B, 3>::random(
            [batch_size, 1, features],
            Distribution::Bernoulli(keep),
            &x.device(),
        )
        .div_scalar(keep)
        .repeat_dim(1, seq_len);

        x * mask
    }

    /// tokens: [batch, seq_len] → p(positive): [batch]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        activation::sigmoid(self.forward_logits(tokens))
    }

    pub fn forward_classification(
        &self,
        tokens: Tensor<B, 2, Int>,
        labels: Tensor<B, 1, Int>,
    ) -> ClassificationStep<B> {
        let logits = self.forward_logits(tokens);
        let loss = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device())
            .forward(logits.clone(), labels.clone());

        ClassificationStep {
            loss,
            probabilities: activation::sigmoid(logits),
            labels,
        }
    }
}

/// Number of labels matched by thresholding probabilities at 0.5.
pub fn count_correct<B: Backend>(probabilities: Tensor<B, 1>, labels: Tensor<B, 1, Int>) -> usize {
    probabilities
        .greater_equal_elem(0.5)
        .int()
        .equal(labels)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{glove::WordVectors, vocabulary::WordIndex};
    use burn::backend::NdArray;
    use std::io::Cursor;

    type TestBackend = NdArray;
    type TrainBackend = burn::backend::Autodiff<NdArray>;

    fn matrix() -> EmbeddingMatrix {
        let index   = WordIndex::from_words(["good", "bad", "plot"]);
        let vectors = WordVectors::from_reader(Cursor::new("good 1 0 0 0\nbad 0 1 0 0\n"), None).unwrap();
        EmbeddingMatrix::build(&index, &vectors, 100, 4).unwrap()
    }

    #[test]
    fn test_forward_shapes_and_range() {
        let device = Default::default();
        let m      = matrix();
        let cfg    = SentimentRnnConfig::new(m.rows(), 4, 8);
        let model: SentimentRnn<TestBackend> = cfg.init_with_embeddings(&m, &device).unwrap();

        let tokens = Tensor::<TestBackend, 2, Int>::from_ints([[0, 1, 4, 5], [1, 6, 2, 4]], &device);
        let probs: Vec<f32> = model.forward(tokens).into_data().to_vec().unwrap();

        assert_eq!(probs.len(), 2);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_embedding_is_initialised_from_matrix() {
        let device = Default::default();
        let m      = matrix();
        let cfg    = SentimentRnnConfig::new(m.rows(), 4, 8);
        let model: SentimentRnn<TestBackend> = cfg.init_with_embeddings(&m, &device).unwrap();

        let weights: Vec<f32> = model.embedding.weight.val().into_data().to_vec().unwrap();
        assert_eq!(weights, m.values());
    }

    #[test]
    fn test_rejects_mismatched_matrix() {
        let device = Default::default();
        let m      = matrix();
        let cfg    = SentimentRnnConfig::new(m.rows() + 1, 4, 8);
        let model: Result<SentimentRnn<TestBackend>> = cfg.init_with_embeddings(&m, &device);
        assert!(model.is_err());
    }

    #[test]
    fn test_classification_loss_is_finite() {
        let device = Default::default();
        let cfg    = SentimentRnnConfig::new(10, 4, 8);
        let model: SentimentRnn<TestBackend> = cfg.init(&device);

        let tokens = Tensor::<TestBackend, 2, Int>::from_ints([[1, 4, 5], [1, 6, 7]], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([1, 0], &device);
        let step   = model.forward_classification(tokens, labels);

        let loss = step.loss.into_scalar().elem::<f32>();
        assert!(loss.is_finite() && loss > 0.0);
    }

    #[test]
    fn test_sequence_dropout_shares_mask_across_time() {
        let device = Default::default();
        let model: SentimentRnn<TrainBackend> = SentimentRnnConfig::new(10, 4, 8).init(&device);

        let x   = Tensor::<TrainBackend, 3>::ones([3, 6, 16], &device);
        let out: Vec<f32> = model.sequence_dropout(x).into_data().to_vec().unwrap();

        // Element (b, t, f) lives at b*96 + t*16 + f
        for b in 0..3 {
            for f in 0..16 {
                let first = out[b * 96 + f];
                assert!(first == 0.0 || (first - 2.0).abs() < 1e-6, "{first}");
                for t in 1..6 {
                    assert_eq!(out[b * 96 + t * 16 + f], first);
                }
            }
        }
    }

    #[test]
    fn test_sequence_dropout_inactive_for_inference() {
        let device = Default::default();
        let model: SentimentRnn<TestBackend> = SentimentRnnConfig::new(10, 4, 8).init(&device);

        let x   = Tensor::<TestBackend, 3>::ones([2, 5, 4], &device);
        let out: Vec<f32> = model.sequence_dropout(x).into_data().to_vec().unwrap();
        assert!(out.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_count_correct() {
        let device = Default::default();
        let probs  = Tensor::<TestBackend, 1>::from_floats([0.9, 0.2, 0.5, 0.4], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([1, 0, 0, 1], &device);
        assert_eq!(count_correct(probs, labels), 2);
    }
}
