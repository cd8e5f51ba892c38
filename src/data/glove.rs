// ============================================================
// Layer 4 - Pretrained Word Vectors (GloVe)
// ============================================================
// Reads a GloVe text file such as `glove.6B.100d.txt`:
//
//   the 0.418 0.24968 -0.41242 ...
//   ,   0.013441 0.23682 -0.16899 ...
//
// One row per token, the token followed by `dim` floats, all
// separated by whitespace. The files are large (400k rows) so
// they are streamed line by line through a BufReader.

use anyhow::{bail, Context, Result};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Token -> dense vector table with a single fixed dimension.
#[derive(Debug, Clone, Default)]
pub struct WordVectors {
    dim:     usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    /// Load a GloVe file. When `expected_dim` is None the first row
    /// decides the dimension.
    pub fn load(path: impl AsRef<Path>, expected_dim: Option<usize>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Indexing word vectors from '{}'", path.display());

        let file = File::open(path)
            .with_context(|| format!("Cannot open word vector file '{}'", path.display()))?;
        let vectors = Self::from_reader(BufReader::new(file), expected_dim)
            .with_context(|| format!("Malformed word vector file '{}'", path.display()))?;

        tracing::info!("Found {} word vectors", vectors.len());
        Ok(vectors)
    }

    /// Parse rows from any buffered reader. A token listed twice keeps
    /// its last vector.
    pub fn from_reader<R: BufRead>(reader: R, expected_dim: Option<usize>) -> Result<Self> {
        let mut dim     = expected_dim;
        let mut vectors = HashMap::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Read error at line {}", line_no + 1))?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };

            let values = parts
                .map(str::parse::<f32>)
                .collect::<Result<Vec<f32>, _>>()
                .with_context(|| format!("Invalid float on line {} ('{word}')", line_no + 1))?;

            let expected = *dim.get_or_insert(values.len());
            if values.len() != expected || expected == 0 {
                bail!(
                    "Line {} ('{word}') has {} values, expected {expected}",
                    line_no + 1,
                    values.len(),
                );
            }
            vectors.insert(word.to_string(), values);
        }

        Ok(Self { dim: dim.unwrap_or(0), vectors })
    }

    /// Vector length; 0 for an empty table with no expected dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parses_rows_and_infers_dim() {
        let text = "the 0.1 0.2 0.3\nmovie -1 0 1.5\n";
        let v = WordVectors::from_reader(Cursor::new(text), None).unwrap();
        assert_eq!(v.dim(), 3);
        assert_eq!(v.len(), 2);
        assert_eq!(v.get("movie"), Some(&[-1.0, 0.0, 1.5][..]));
        assert!(v.get("film").is_none());
    }

    #[test]
    fn test_skips_blank_lines() {
        let text = "\na 1 2\n\n   \nb 3 4\n";
        let v = WordVectors::from_reader(Cursor::new(text), Some(2)).unwrap();
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let text = "a 1 2 3\nb 1 2\n";
        let err = WordVectors::from_reader(Cursor::new(text), None).unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_rejects_unexpected_dim() {
        let text = "a 1 2 3\n";
        assert!(WordVectors::from_reader(Cursor::new(text), Some(100)).is_err());
    }

    #[test]
    fn test_rejects_bad_float() {
        let text = "a 1 two 3\n";
        let err = WordVectors::from_reader(Cursor::new(text), None).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_duplicate_token_keeps_last_vector() {
        let text = "a 1 1\na 2 2\n";
        let v = WordVectors::from_reader(Cursor::new(text), None).unwrap();
        assert_eq!(v.get("a"), Some(&[2.0, 2.0][..]));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WordVectors::load(dir.path().join("missing.txt"), None).is_err());
    }
}
