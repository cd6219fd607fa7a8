//! Framed file format for codeword streams.
//!
//! Layout (little-endian):
//! - Magic "HTVQ" (4 bytes)
//! - Version (1 byte)
//! - Block width, block height (1 byte each)
//! - Flags (1 byte, bit 0: corrected stage-4 pairing)
//! - Image rows, image columns, codeword count (u32 each)
//! - Codewords in row-major block scan order
//! - CRC32 of the codewords (u32)

pub mod constants;
pub mod reader;
pub mod writer;

pub use constants::*;
pub use reader::read_image;
pub use writer::ContainerWriter;
