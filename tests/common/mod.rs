//! Shared test data generators.

#![allow(dead_code)]

use htvq::codebook::{vector_len, NUM_STAGES};
use htvq::{Codebook, CodebookBuilder, Image};

/// Codebook whose stage entries are uniform vectors and whose lookup tables
/// average the pair (rounding up). Uniform blocks round-trip exactly.
pub fn averaging_codebook() -> Codebook {
    let mut builder = CodebookBuilder::new();
    for stage in 0..NUM_STAGES {
        builder.fill_entries(stage, |cw| vec![cw; vector_len(stage)]).unwrap();
        builder.fill_lookup(stage, |a, b| ((a as u16 + b as u16 + 1) / 2) as u8).unwrap();
    }
    builder.build()
}

/// Serialized form of [`averaging_codebook`]
pub fn averaging_codebook_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    averaging_codebook().write(&mut bytes).unwrap();
    bytes
}

/// Generate pixel values using a simple xorshift PRNG
pub fn random_image(rows: usize, columns: usize, seed: u64) -> Image {
    let mut state = seed.max(1);
    let mut data = Vec::with_capacity(rows * columns);
    for _ in 0..rows * columns {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as i32);
    }
    Image::from_vec(rows, columns, data).unwrap()
}

/// Smooth diagonal gradient
pub fn gradient_image(rows: usize, columns: usize) -> Image {
    let mut image = Image::new(rows, columns);
    for r in 0..rows {
        for c in 0..columns {
            image[(r, c)] = ((r + c) * 255 / (rows + columns - 2).max(1)) as i32;
        }
    }
    image
}

/// Image built from uniform tiles of `tile_rows x tile_columns`
pub fn tiled_image(rows: usize, columns: usize, tile_rows: usize, tile_columns: usize) -> Image {
    let mut image = Image::new(rows, columns);
    for r in 0..rows {
        for c in 0..columns {
            image[(r, c)] = (((r / tile_rows) * 37 + (c / tile_columns) * 11) % 256) as i32;
        }
    }
    image
}
