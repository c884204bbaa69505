use huffpack::huffman_coding::code_lengths::CodeLengths;
use huffpack::huffman_coding::huffman::HuffmanTree;
use huffpack::tools::freq_count::FrequencyTable;
use huffpack::{compress_bytes, decompress_bytes, HuffError, EOF_SYMBOL, HEADER_BYTES, SYMBOL_LIMIT};
use proptest::prelude::*;

#[test]
fn empty_input() {
    let packed = compress_bytes(&[]).unwrap();
    assert_eq!(packed.len(), HEADER_BYTES + 1);
    assert!(decompress_bytes(&packed).unwrap().is_empty());
}

#[test]
fn single_distinct_byte() {
    let data = vec![b'x'; 1000];
    let packed = compress_bytes(&data).unwrap();
    let lengths: Vec<u32> = packed[..HEADER_BYTES].iter().map(|&l| l as u32).collect();
    assert_eq!(lengths.iter().filter(|&&l| l > 0).count(), 2);
    assert_eq!(lengths[b'x' as usize], 1);
    assert_eq!(lengths[EOF_SYMBOL as usize], 1);
    // 1000 one-bit codes plus the end-of-stream code.
    assert_eq!(packed.len(), HEADER_BYTES + 126);
    assert_eq!(decompress_bytes(&packed).unwrap(), data);
}

#[test]
fn every_byte_value() {
    let data: Vec<u8> = (0..=255_u8).rev().chain(0..=255_u8).collect();
    let packed = compress_bytes(&data).unwrap();
    assert_eq!(decompress_bytes(&packed).unwrap(), data);
}

#[test]
fn skewed_text() {
    let data = "the quick brown fox jumps over the lazy dog. "
        .repeat(200)
        .into_bytes();
    let packed = compress_bytes(&data).unwrap();
    assert!(packed.len() < data.len());
    assert_eq!(decompress_bytes(&packed).unwrap(), data);
}

#[test]
fn output_is_deterministic() {
    let data = b"mississippi river banks".to_vec();
    assert_eq!(compress_bytes(&data).unwrap(), compress_bytes(&data).unwrap());
}

#[test]
fn truncated_before_eof_fails() {
    let data = b"abracadabra".to_vec();
    let packed = compress_bytes(&data).unwrap();
    for cut in HEADER_BYTES..packed.len() {
        assert!(matches!(
            decompress_bytes(&packed[..cut]),
            Err(HuffError::TruncatedStream)
        ));
    }
}

/// Lengths of a random full binary tree, made by repeatedly splitting a random leaf.
fn split_lengths(splits: &[usize]) -> Vec<u32> {
    let mut leaves: Vec<u32> = vec![1, 1];
    for &pick in splits {
        let idx = pick % leaves.len();
        let depth = leaves.swap_remove(idx);
        leaves.push(depth + 1);
        leaves.push(depth + 1);
    }
    let mut lens = vec![0_u32; SYMBOL_LIMIT];
    lens[..leaves.len()].copy_from_slice(&leaves);
    lens
}

proptest! {
    #[test]
    fn round_trip(data in prop::collection::vec(any::<u8>(), 0..4000)) {
        let packed = compress_bytes(&data).unwrap();
        prop_assert_eq!(decompress_bytes(&packed).unwrap(), data);
    }

    #[test]
    fn length_round_trip_is_idempotent(counts in prop::collection::vec(0_u64..1000, SYMBOL_LIMIT)) {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_counts(counts)).unwrap();
        let first = CodeLengths::from_tree(&tree, SYMBOL_LIMIT).unwrap();
        let second = CodeLengths::from_tree(&first.to_tree().unwrap(), SYMBOL_LIMIT).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn full_trees_are_accepted(splits in prop::collection::vec(any::<usize>(), 0..255)) {
        let lens = split_lengths(&splits);
        let lengths = CodeLengths::new(lens.clone()).unwrap();
        let tree = lengths.to_tree().unwrap();
        let rebuilt = CodeLengths::from_tree(&tree, SYMBOL_LIMIT).unwrap();
        prop_assert_eq!(rebuilt.as_slice(), &lens[..]);
    }

    #[test]
    fn dropping_a_leaf_is_rejected(splits in prop::collection::vec(any::<usize>(), 1..255), pick in any::<usize>()) {
        let mut lens = split_lengths(&splits);
        let used = splits.len() + 2;
        lens[pick % used] = 0;
        prop_assert!(CodeLengths::new(lens).is_err());
    }
}
