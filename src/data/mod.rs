// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the extracted dataset on disk to tensor
// batches, plus the pretrained embedding matrix:
//
//   aclImdb/*.txt
//       │
//       ▼
//   ImdbLoader        → reads reviews and labels per split
//       │
//       ▼
//   ReviewEncoder     → WordLevel tokenizer (infra::tokenizer_store)
//       │               over the WordIndex, <START> + capped vocabulary
//       ▼
//   pad_sequences     → fixed length, front padding/truncation
//       │
//       ▼
//   ReviewDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   ReviewBatcher     → stacks samples into tensor batches
//
//   glove.*.txt → WordVectors ─┐
//   WordIndex ─────────────────┴→ EmbeddingMatrix → frozen Embedding
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the aclImdb directory layout
pub mod loader;

/// Frequency-ranked word index with reserved ids
pub mod vocabulary;

/// Front padding and truncation of id sequences
pub mod padding;

/// GloVe text-format word vectors
pub mod glove;

/// Word vectors aligned to the word index
pub mod embedding_matrix;

/// Implements Burn's Dataset trait for encoded reviews
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
