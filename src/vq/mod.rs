//! Brute-force vector quantization.
//!
//! Searches every entry of the block-sized stage codebook for the minimum
//! squared error. This is O(256 x block length) per block and serves as the
//! reference the table-lookup encoder approximates.

pub mod encoder;

pub use encoder::{nearest_codeword, VqEncoder};
