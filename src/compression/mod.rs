//! The compression module holds the two pipelines of huffpack.
//!
//! Compression happens in the following steps:
//! - Frequency count: one pass over the input, plus one count for the end-of-stream symbol.
//! - Tree build: greedy huffman construction, ties broken by the lowest symbol in a subtree.
//! - Canonicalization: the tree is reduced to code lengths and rebuilt from them.
//! - Header: the 257 code lengths, 8 bits each.
//! - Payload: a second pass over the input writing each byte's code, then the end-of-stream code.
//!
//! Decompression reads the header, rebuilds the same canonical tree and walks it bit by bit
//! until it decodes the end-of-stream symbol.
//!

pub mod compress;
pub mod decompress;
