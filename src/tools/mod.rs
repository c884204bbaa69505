//! The tools module provides helper pieces for huffpack.
//!
//! The tools are:
//! - cli: Command line interface for huffpack.
//! - freq_count: Symbol frequency table, filled by one pass over the input.
//!
pub mod cli;
pub mod freq_count;
