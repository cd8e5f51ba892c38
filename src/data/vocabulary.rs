// ============================================================
// Layer 4 - Word Index
// ============================================================
// Maps word tokens to integer ids the embedding layer can look up.
//
// The dataset ships `imdb.vocab`, one word per line ordered by
// corpus frequency. A word's raw rank is its 1-based line number,
// so the most frequent word ("the") has rank 1.
//
// Encoded reviews reserve the lowest ids for special tokens and
// shift every ranked word up by INDEX_FROM:
//
//   0  <PAD>      left padding of short reviews
//   1  <START>    first id of every encoded review
//   2  <UNK>      unknown word, or a word outside the vocabulary cap
//   3  <UNUSED>   never emitted
//   4  "the"      rank 1 + INDEX_FROM
//   ...
//
// The tokenizer store turns this index into a WordLevel
// vocabulary, and the embedding matrix reads it through
// `entries` to align pretrained vectors with ids.

use anyhow::{bail, Context, Result};
use std::{collections::HashMap, fs, path::Path};

pub const PAD_ID:    u32 = 0;
pub const START_ID:  u32 = 1;
pub const UNK_ID:    u32 = 2;
pub const UNUSED_ID: u32 = 3;

/// Offset added to a word's frequency rank to get its id
pub const INDEX_FROM: u32 = 3;

pub const RESERVED_TOKENS: [(&str, u32); 4] = [
    ("<PAD>", PAD_ID),
    ("<START>", START_ID),
    ("<UNK>", UNK_ID),
    ("<UNUSED>", UNUSED_ID),
];

/// Frequency-ranked vocabulary with reserved ids for special tokens.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    ranks: HashMap<String, u32>,
}

impl WordIndex {
    /// Build from words ordered by frequency, most frequent first.
    /// A repeated word keeps the rank of its first occurrence.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        let mut next  = 1u32;
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            if !ranks.contains_key(word) {
                ranks.insert(word.to_string(), next);
            }
            next += 1;
        }
        Self { ranks }
    }

    /// Load the dataset's `imdb.vocab` file.
    pub fn from_vocab_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read vocabulary file '{}'", path.display()))?;

        let index = Self::from_words(text.lines());
        if index.ranks.is_empty() {
            bail!("Vocabulary file '{}' has no words", path.display());
        }
        tracing::info!("Loaded word index with {} ranked words", index.ranks.len());
        Ok(index)
    }

    /// Number of ids in the offset index, reserved tokens included.
    pub fn id_count(&self) -> usize {
        self.ranks.len() + RESERVED_TOKENS.len()
    }

    /// Every (token, id) pair of the offset index, reserved tokens first.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        RESERVED_TOKENS.iter().copied().chain(
            self.ranks
                .iter()
                .map(|(word, rank)| (word.as_str(), rank + INDEX_FROM)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> WordIndex {
        WordIndex::from_words(["the", "and", "a", "movie", "film"])
    }

    fn ids(idx: &WordIndex) -> HashMap<&str, u32> {
        idx.entries().collect()
    }

    #[test]
    fn test_ids_are_offset_ranks() {
        let idx = index();
        let ids = ids(&idx);
        assert_eq!(ids["the"], 1 + INDEX_FROM);
        assert_eq!(ids["film"], 8);
        assert!(!ids.contains_key("nope"));
    }

    #[test]
    fn test_len_counts_reserved() {
        assert_eq!(index().id_count(), 9);
    }

    #[test]
    fn test_entries_include_reserved_tokens() {
        let idx = index();
        let entries = ids(&idx);
        assert_eq!(entries["<PAD>"], 0);
        assert_eq!(entries["<START>"], 1);
        assert_eq!(entries["<UNK>"], 2);
        assert_eq!(entries["<UNUSED>"], 3);
        assert_eq!(entries["movie"], 7);
        assert_eq!(entries.len(), idx.id_count());
    }

    #[test]
    fn test_duplicate_words_keep_first_rank() {
        let idx = WordIndex::from_words(["x", "y", "x"]);
        let ids = ids(&idx);
        assert_eq!(ids["x"], 4);
        assert_eq!(ids["y"], 5);
        assert_eq!(idx.id_count(), 6);
    }

    #[test]
    fn test_from_vocab_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("imdb.vocab");
        fs::write(&path, "the\nand\n\na\n").unwrap();

        let idx = WordIndex::from_vocab_file(&path).unwrap();
        // the blank line takes no rank
        assert_eq!(ids(&idx)["a"], 6);
        assert_eq!(idx.id_count(), 7);
    }

    #[test]
    fn test_empty_vocab_file_is_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("imdb.vocab");
        fs::write(&path, "\n\n").unwrap();
        assert!(WordIndex::from_vocab_file(&path).is_err());
    }
}
