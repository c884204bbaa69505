//! The bitstream module forms the I/O subsystem for huffpack.
//!
//! Both halves work one bit at a time, most significant bit first, over ordinary
//! `std::io::Read` / `std::io::Write` byte streams. The writer pads the final byte with zero
//! bits; the reader reports the end of the underlying data either as `None` or, when a bit is
//! required, as an error.
//!
pub mod bitreader;
pub mod bitwriter;
