//! Canonical huffman file compression.
//!
//! Provides lossless compression of a byte stream using a single canonical huffman code.
//!
//! A compressed stream is laid out as:
//! - Header: the code length of each of the 257 symbols (bytes 0-255 and the end-of-stream
//!   marker 256), one 8 bit field each, 2056 bits in all.
//! - Payload: the code of each input byte, in order.
//! - Trailer: the code of the end-of-stream marker.
//! - Padding: 0-7 zero bits to finish the last byte.
//!
//! Only code lengths are stored. Both sides rebuild the identical tree from them.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffpack test.txt`
//!
//! This will compress the file and create the file test.txt.huf.
//!
//! In code:
//!
//! ```
//! let packed = huffpack::compress_bytes(b"aaab").unwrap();
//! assert_eq!(huffpack::decompress_bytes(&packed).unwrap(), b"aaab");
//! ```
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, compress_bytes};
pub use compression::decompress::{decompress, decompress_bytes};
pub use error::{HuffError, Result};

/// Number of symbols in the alphabet: every byte value plus end-of-stream.
pub const SYMBOL_LIMIT: usize = 257;
/// The reserved end-of-stream symbol.
pub const EOF_SYMBOL: u16 = 256;
/// Width of one code length field in the header.
pub const HEADER_FIELD_BITS: u8 = 8;
/// Size of the header in bytes.
pub const HEADER_BYTES: usize = SYMBOL_LIMIT * HEADER_FIELD_BITS as usize / 8;
