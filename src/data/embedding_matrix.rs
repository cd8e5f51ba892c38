// ============================================================
// Layer 4 - Embedding Matrix Builder
// ============================================================
// Aligns pretrained word vectors with the word index so the
// embedding layer can be initialised from GloVe:
//
//   row i = GloVe vector of the word whose id is i   (if known)
//   row i = zeros                                    (otherwise)
//
// Rows: min(max_words, word_index.id_count()). Ids at or above the
// vocabulary cap never reach the model (they are encoded as
// <UNK>), so they get no row. Reserved tokens have no GloVe
// entry and stay zero.

use anyhow::{bail, Result};

use crate::data::{glove::WordVectors, vocabulary::WordIndex};

/// Dense row-major `rows x dim` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    rows:    usize,
    dim:     usize,
    values:  Vec<f32>,
    applied: usize,
}

impl EmbeddingMatrix {
    pub fn build(
        word_index:    &WordIndex,
        vectors:       &WordVectors,
        max_words:     usize,
        embedding_dim: usize,
    ) -> Result<Self> {
        if !vectors.is_empty() && vectors.dim() != embedding_dim {
            bail!(
                "Word vectors have dimension {}, but the embedding dimension is {}",
                vectors.dim(),
                embedding_dim,
            );
        }

        let rows       = max_words.min(word_index.id_count());
        let mut values = vec![0.0f32; rows * embedding_dim];
        let mut applied = 0usize;

        for (word, id) in word_index.entries() {
            let id = id as usize;
            if id >= rows {
                continue;
            }
            if let Some(vector) = vectors.get(word) {
                values[id * embedding_dim..(id + 1) * embedding_dim].copy_from_slice(vector);
                applied += 1;
            }
        }

        tracing::info!(
            "Embedding matrix {}x{}: {} rows initialised from pretrained vectors",
            rows,
            embedding_dim,
            applied,
        );

        Ok(Self { rows, dim: embedding_dim, values, applied })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[cfg(test)]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }

    /// Row-major backing storage
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of rows copied from the word vectors
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Fraction of rows that received a pretrained vector
    pub fn coverage(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.applied as f64 / self.rows as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn fixture() -> (WordIndex, WordVectors) {
        // ids: the=4 and=5 a=6 movie=7 zzz=8
        let index   = WordIndex::from_words(["the", "and", "a", "movie", "zzz"]);
        let vectors = WordVectors::from_reader(
            Cursor::new("the 1 1 1\nmovie 2 3 4\nzzz 9 9 9\nunrelated 5 5 5\n"),
            None,
        )
        .unwrap();
        (index, vectors)
    }

    #[test]
    fn test_known_rows_match_vectors_and_unknown_rows_are_zero() {
        let (index, vectors) = fixture();
        let m = EmbeddingMatrix::build(&index, &vectors, 100, 3).unwrap();

        assert_eq!(m.rows(), index.id_count());
        for (word, id) in index.entries() {
            let row = m.row(id as usize);
            match vectors.get(word) {
                Some(v) => assert_eq!(row, v),
                None => assert!(row.iter().all(|&x| x == 0.0), "row for '{word}'"),
            }
        }
        assert_eq!(m.applied(), 3);
    }

    #[test]
    fn test_vocabulary_cap_limits_rows() {
        let (index, vectors) = fixture();
        let m = EmbeddingMatrix::build(&index, &vectors, 8, 3).unwrap();

        // "zzz" has id 8 and falls outside the cap
        assert_eq!(m.rows(), 8);
        assert_eq!(m.values().len(), 24);
        assert_eq!(m.row(7), &[2.0, 3.0, 4.0]);
        assert_eq!(m.applied(), 2);
    }

    #[test]
    fn test_reserved_rows_are_zero() {
        let (index, vectors) = fixture();
        let m = EmbeddingMatrix::build(&index, &vectors, 100, 3).unwrap();
        for id in 0..4 {
            assert_eq!(m.row(id), &[0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let (index, vectors) = fixture();
        assert!(EmbeddingMatrix::build(&index, &vectors, 100, 50).is_err());
    }

    #[test]
    fn test_empty_vectors_give_zero_matrix() {
        let (index, _) = fixture();
        let m = EmbeddingMatrix::build(&index, &WordVectors::default(), 100, 4).unwrap();
        assert_eq!(m.applied(), 0);
        assert_eq!(m.coverage(), 0.0);
        assert!(m.values().iter().all(|&x| x == 0.0));
    }
}
