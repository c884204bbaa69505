//! The huffman module builds the prefix codes for huffpack.
//!
//! A tree is first built from symbol frequencies. Only the depth of each leaf (its code length)
//! survives: the lengths are written to the file header, and both the encoder and the decoder
//! rebuild the same canonical tree from them. That rebuilt tree supplies the codes used to write
//! the payload and the node walk used to read it back.
//!

pub mod code_lengths;
pub mod huffman;
