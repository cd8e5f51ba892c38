// ============================================================
// Layer 4 - IMDB Review Loader
// ============================================================
// Loads the Large Movie Review Dataset from its extracted
// `aclImdb/` directory:
//
//   aclImdb/
//     imdb.vocab           frequency-ordered vocabulary
//     train/pos/*.txt      12 500 positive reviews
//     train/neg/*.txt      12 500 negative reviews
//     test/pos/*.txt
//     test/neg/*.txt
//
// Files are read in sorted order so runs are reproducible, then
// each split is shuffled with a fixed seed. Without the shuffle
// every positive review would precede every negative one, and
// dropping the last partial batch would always drop negatives.
//
// Reference: Rust Book §9 (Error Handling)
//            rand crate documentation

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::review::{Review, Sentiment};
use crate::domain::traits::{ReviewSource, Split};

/// Seed used to shuffle each split after loading
pub const SPLIT_SHUFFLE_SEED: u64 = 113;

pub const VOCAB_FILE: &str = "imdb.vocab";

pub struct ImdbLoader {
    root: PathBuf,
}

impl ImdbLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the frequency-ordered vocabulary file
    pub fn vocab_path(&self) -> PathBuf {
        self.root.join(VOCAB_FILE)
    }
}

impl ReviewSource for ImdbLoader {
    fn load_split(&self, split: Split) -> Result<Vec<Review>> {
        let split_dir = self.root.join(split.dir_name());
        if !split_dir.is_dir() {
            bail!(
                "Dataset split '{}' not found. Expected the extracted aclImdb layout.",
                split_dir.display()
            );
        }

        let mut reviews = Vec::new();
        for (label_dir, sentiment) in [("pos", Sentiment::Positive), ("neg", Sentiment::Negative)] {
            let dir = split_dir.join(label_dir);
            let loaded = load_label_dir(&dir, sentiment)?;
            tracing::debug!("Loaded {} reviews from '{}'", loaded.len(), dir.display());
            reviews.extend(loaded);
        }

        let mut rng = StdRng::seed_from_u64(SPLIT_SHUFFLE_SEED);
        reviews.shuffle(&mut rng);

        tracing::info!("Loaded {} {} reviews", reviews.len(), split.dir_name());
        Ok(reviews)
    }
}

/// Read every `.txt` file of one label directory.
fn load_label_dir(dir: &Path, sentiment: Sentiment) -> Result<Vec<Review>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("txt"))
        .collect();
    paths.sort();

    let mut reviews = Vec::with_capacity(paths.len());
    for path in paths {
        match fs::read_to_string(&path) {
            Ok(text) => reviews.push(Review::new(text, sentiment)),
            // One unreadable file should not abort a 25k-file load
            Err(e) => tracing::warn!("Skipping '{}': {}", path.display(), e),
        }
    }
    Ok(reviews)
}
