// ============================================================
// Layer 6 - Tokenizer Store
// ============================================================
// Builds, saves and loads the word-level tokenizer that turns raw
// review text into word index ids.
//
// The vocabulary is not trained: it is the frequency-ranked word
// index (imdb.vocab rank + INDEX_FROM, reserved tokens at 0..=3)
// written into a HuggingFace tokenizer JSON and loaded back with
// Tokenizer::from_file. The file lives next to the checkpoints so
// `evaluate` and `predict` encode text exactly as training did.
//
// Pipeline inside the tokenizer:
//   normalizer     <br /> → space, lowercase, strip quote apostrophes
//   pre_tokenizer  split on anything not a letter, digit or apostrophe
//   model          WordLevel lookup, unknown words → <UNK>
//
// So "don't" stays one token while "(film)." becomes "film".
//
// Reference: HuggingFace tokenizers documentation (WordLevel)

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::data::vocabulary::WordIndex;

const TOKENIZER_FILE: &str = "tokenizer.json";

/// Any spelling of an HTML line break found in the reviews
const HTML_BREAK_PATTERN: &str = r"(?i)<br\s*/?>";
/// Apostrophes used as quotes rather than inside a word
const EDGE_APOSTROPHE_PATTERN: &str = r"(?<![\p{L}\p{N}])'+|'+(?![\p{L}\p{N}])";
const WORD_SEPARATOR_PATTERN: &str = r"[^\p{L}\p{N}']+";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load a previously saved tokenizer from its JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join(TOKENIZER_FILE);
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}. Have you run 'train' first?",
                path.display(), e
            ))
    }

    /// Write a tokenizer over `word_index` and load it back.
    pub fn build_and_save(&self, word_index: &WordIndex) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create directory '{}'", self.dir.display()))?;

        // ── Step 1: Vocabulary from the word index ────────────────────────────
        let vocab: Map<String, Value> = word_index
            .entries()
            .map(|(word, id)| (word.to_string(), json!(id)))
            .collect();

        // ── Step 2: Tokenizer JSON in HuggingFace format ──────────────────────
        // Reserved tokens are plain vocabulary entries, not added tokens,
        // so a literal "<UNK>" inside a review is normalised like any text.
        let tokenizer_json = json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": {
                "type": "Sequence",
                "normalizers": [
                    { "type": "Replace", "pattern": { "Regex": HTML_BREAK_PATTERN }, "content": " " },
                    { "type": "Lowercase" },
                    { "type": "Replace", "pattern": { "Regex": EDGE_APOSTROPHE_PATTERN }, "content": " " }
                ]
            },
            "pre_tokenizer": {
                "type": "Split",
                "pattern": { "Regex": WORD_SEPARATOR_PATTERN },
                "behavior": "Removed",
                "invert": false
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "<UNK>"
            }
        });

        // ── Step 3: Save and reload ───────────────────────────────────────────
        let tok_path = self.dir.join(TOKENIZER_FILE);
        std::fs::write(&tok_path, serde_json::to_string(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer to '{}'", tok_path.display()))?;

        tracing::info!(
            "Tokenizer built with {} ids, saved to '{}'",
            word_index.id_count(),
            tok_path.display()
        );

        Tokenizer::from_file(&tok_path)
            .map_err(|e| anyhow::anyhow!("Cannot reload tokenizer: {e}"))
    }
}

/// Tokenizer over `words` (most frequent first), built in a scratch directory.
#[cfg(test)]
pub(crate) fn tokenizer_for(words: &[&str]) -> Tokenizer {
    let tmp = tempfile::tempdir().unwrap();
    TokenizerStore::new(tmp.path())
        .build_and_save(&WordIndex::from_words(words.iter().copied()))
        .unwrap()
}
