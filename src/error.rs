//! Error conditions for the huffpack codec.
//!
//! Every failure is fatal for the compress/decompress call that raised it. There is no retry
//! and no partial success; callers discard any output on error.

use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffError>;

#[derive(Debug, thiserror::Error)]
pub enum HuffError {
    /// The bit writer was handed something other than 0 or 1.
    #[error("invalid bit value {0}, expected 0 or 1")]
    InvalidBit(u8),

    /// A bit was required but the byte source was exhausted.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// Fewer than two symbols could be placed in the priority queue.
    #[error("at least 2 symbols are needed to build a tree, found {0}")]
    InsufficientAlphabet(usize),

    /// Canonical reconstruction did not finish with exactly one internal root.
    #[error("canonical reconstruction produced {0} roots instead of one internal node")]
    EmptyOrMultipleRoots(usize),

    /// An odd number of nodes was carried up from the given depth.
    #[error("invalid tree structure: odd node count at depth {0}")]
    InvalidTreeStructure(usize),

    /// A code length table that does not describe a full binary tree.
    #[error("invalid canonical code lengths: {0}")]
    InvalidCanonicalLengths(String),

    /// A leaf symbol at or past the alphabet size.
    #[error("symbol {symbol} exceeds symbol limit {limit}")]
    SymbolOutOfRange { symbol: usize, limit: usize },

    /// The same symbol was found in more than one leaf.
    #[error("symbol {0} has more than one code")]
    DuplicateSymbol(usize),

    /// A code length too long for the 8 bit header field.
    #[error("code length {length} for symbol {symbol} does not fit in the header")]
    CodeLengthOverflow { symbol: usize, length: u32 },

    /// A byte seen while encoding has no code. The input changed between the two passes.
    #[error("symbol {0} has no code; input changed between passes")]
    MissingCode(usize),

    /// The payload ended before the end-of-stream symbol was decoded.
    #[error("compressed stream truncated before the end-of-stream symbol")]
    TruncatedStream,

    /// Tree traversal reached a node index outside the arena.
    #[error("invalid tree shape: node {0} does not exist")]
    InvalidTreeShape(usize),

    /// Failure of the underlying byte source or sink.
    #[error(transparent)]
    Io(#[from] io::Error),
}
