//! Hierarchical table-lookup encoder.
//!
//! A block of `2^(S+1)` pixels is laid into the canonical shape of stage `S`
//! and reduced by `S + 1` levels of pair lookups. Level `k` combines adjacent
//! values with lookup table `k`: even levels pair left/right neighbours, odd
//! levels pair top/bottom neighbours, so every intermediate value covers the
//! canonical block of its stage. The last remaining value is the codeword.

use crate::codebook::stage::{canonical_shape, pair_index, pairs_horizontally};
use crate::codebook::{stage_for_length, Codebook, MAX_STAGE, MAX_VECTOR_LEN};
use crate::error::{Error, Result};
use crate::image::matrix::check_pixels;
use crate::image::Block;
use crate::{BlockEncoder, Codeword};

/// Pixel pairing used at level 0 of an 8x4 (stage 4) block.
///
/// The reference encoder indexes the row 3, columns 2-3 pair as
/// `(p[3][2] << 8) | p[3][2]`, so pixel (3, 3) never reaches the lookup.
/// Trained lookup tables may depend on that pairing, so it stays the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Stage4Pairing {
    /// Pair exactly as the reference encoder does
    #[default]
    Reference,
    /// Pair (3, 2) with (3, 3) like every other pixel pair
    Corrected,
}

/// (row, first column) of the level-0 pair the reference encoder mis-indexes
const REFERENCE_QUIRK_PAIR: (usize, usize) = (3, 2);

/// HTVQ encoder borrowing a loaded codebook
#[derive(Clone, Copy, Debug)]
pub struct HtvqEncoder<'a> {
    codebook: &'a Codebook,
    pairing: Stage4Pairing,
}

impl<'a> HtvqEncoder<'a> {
    pub fn new(codebook: &'a Codebook) -> Self {
        Self { codebook, pairing: Stage4Pairing::default() }
    }

    pub fn with_pairing(mut self, pairing: Stage4Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    pub fn pairing(&self) -> Stage4Pairing {
        self.pairing
    }

    /// Encode a row-scanned block of `width x height` pixels to one codeword
    pub fn encode(&self, pixels: &[i32], width: usize, height: usize) -> Result<Codeword> {
        let len = width * height;
        if pixels.len() != len {
            return Err(Error::DimensionMismatch {
                expected_rows: height,
                expected_columns: width,
                found_rows: 1,
                found_columns: pixels.len(),
            });
        }

        let top = stage_for_length(len)?;
        check_pixels(pixels, width)?;

        let mut current = [0u8; MAX_VECTOR_LEN];
        let mut next = [0u8; MAX_VECTOR_LEN];
        for (dst, &p) in current.iter_mut().zip(pixels) {
            *dst = p as u8;
        }

        let quirk = top == MAX_STAGE && self.pairing == Stage4Pairing::Reference;
        let (mut w, mut h) = canonical_shape(top);

        for level in 0..=top {
            let table = self.codebook.lookup_table(level);

            if pairs_horizontally(level) {
                let out_w = w / 2;
                for r in 0..h {
                    for c in 0..out_w {
                        let first = current[r * w + 2 * c];
                        let second = if quirk && level == 0 && (r, 2 * c) == REFERENCE_QUIRK_PAIR {
                            first
                        } else {
                            current[r * w + 2 * c + 1]
                        };
                        next[r * out_w + c] = table[pair_index(first, second)];
                    }
                }
                w = out_w;
            } else {
                let out_h = h / 2;
                for r in 0..out_h {
                    for c in 0..w {
                        let first = current[2 * r * w + c];
                        let second = current[(2 * r + 1) * w + c];
                        next[r * w + c] = table[pair_index(first, second)];
                    }
                }
                h = out_h;
            }

            std::mem::swap(&mut current, &mut next);
        }

        debug_assert_eq!((w, h), (1, 1));
        Ok(current[0])
    }

    /// Encode a block matrix
    pub fn encode_block(&self, block: &Block) -> Result<Codeword> {
        self.encode(block.as_slice(), block.columns(), block.rows())
    }

    /// Encode blocks independently, failing on the first bad block
    pub fn encode_batch(&self, blocks: &[Block]) -> Result<Vec<Codeword>> {
        blocks.iter().map(|block| self.encode_block(block)).collect()
    }
}

impl BlockEncoder for HtvqEncoder<'_> {
    fn encode_block(&self, block: &Block) -> Result<Codeword> {
        HtvqEncoder::encode_block(self, block)
    }
}
