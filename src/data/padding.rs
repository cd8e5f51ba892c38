// ============================================================
// Layer 4 - Sequence Padding
// ============================================================
// The LSTM consumes fixed-length batches, so every encoded
// review is forced to exactly `max_len` ids:
//
//   longer  -> keep the LAST max_len ids (truncate from the front)
//   shorter -> prepend <PAD> ids        (pad at the front)
//
// Both choices keep the end of the review adjacent to the final
// time step, which is the hidden state the classifier reads.

use crate::data::vocabulary::PAD_ID;

/// Pad or truncate one sequence to `max_len`.
pub fn pad_sequence(seq: &[u32], max_len: usize) -> Vec<u32> {
    if seq.len() >= max_len {
        return seq[seq.len() - max_len..].to_vec();
    }
    let mut out = vec![PAD_ID; max_len - seq.len()];
    out.extend_from_slice(seq);
    out
}

pub fn pad_sequences(seqs: &[Vec<u32>], max_len: usize) -> Vec<Vec<u32>> {
    seqs.iter().map(|s| pad_sequence(s, max_len)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequence_is_front_padded() {
        assert_eq!(pad_sequence(&[1, 7, 9], 5), vec![0, 0, 1, 7, 9]);
    }

    #[test]
    fn test_long_sequence_keeps_tail() {
        assert_eq!(pad_sequence(&[1, 2, 3, 4, 5, 6], 4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_exact_length_unchanged() {
        assert_eq!(pad_sequence(&[5, 6, 7], 3), vec![5, 6, 7]);
    }

    #[test]
    fn test_empty_sequence_is_all_padding() {
        assert_eq!(pad_sequence(&[], 3), vec![0, 0, 0]);
    }

    #[test]
    fn test_batch_has_uniform_length() {
        let padded = pad_sequences(&[vec![1], vec![1, 2, 3, 4, 5, 6, 7]], 4);
        assert!(padded.iter().all(|s| s.len() == 4));
    }
}
