use crate::codebook::{stage_for_length, Codebook, StageCodebook};
use crate::error::{Error, Result};
use crate::image::matrix::check_pixels;
use crate::image::Block;
use crate::{BlockEncoder, Codeword};

/// Index of the entry closest to `block` in squared error.
///
/// Ties resolve to the lowest index.
pub fn nearest_codeword(block: &[i32], codebook: StageCodebook<'_>) -> Result<Codeword> {
    if block.len() != codebook.vector_len() {
        return Err(Error::DimensionMismatch {
            expected_rows: 1,
            expected_columns: codebook.vector_len(),
            found_rows: 1,
            found_columns: block.len(),
        });
    }
    check_pixels(block, block.len())?;
    Ok(search(block, codebook))
}

fn search(block: &[i32], codebook: StageCodebook<'_>) -> Codeword {
    let mut best = 0usize;
    let mut best_distance = u32::MAX;

    for (index, entry) in codebook.iter().enumerate() {
        let distance: u32 = block
            .iter()
            .zip(entry)
            .map(|(&p, &c)| {
                let diff = p - c as i32;
                (diff * diff) as u32
            })
            .sum();

        if distance < best_distance {
            best_distance = distance;
            best = index;
            if distance == 0 {
                break;
            }
        }
    }

    best as Codeword
}

/// Full-search encoder over a loaded codebook
#[derive(Clone, Copy, Debug)]
pub struct VqEncoder<'a> {
    codebook: &'a Codebook,
}

impl<'a> VqEncoder<'a> {
    pub fn new(codebook: &'a Codebook) -> Self {
        Self { codebook }
    }

    /// Encode a row-scanned `width x height` block against its stage codebook
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

        let stage = stage_for_length(len)?;
        check_pixels(pixels, width)?;
        Ok(search(pixels, self.codebook.stage(stage)))
    }

    pub fn encode_block(&self, block: &Block) -> Result<Codeword> {
        self.encode(block.as_slice(), block.columns(), block.rows())
    }
}

impl BlockEncoder for VqEncoder<'_> {
    fn encode_block(&self, block: &Block) -> Result<Codeword> {
        VqEncoder::encode_block(self, block)
    }
}
