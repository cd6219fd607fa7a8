use crate::codebook::{stage_for_length, Codebook};
use crate::error::Result;
use crate::image::Block;
use crate::{BlockDecoder, Codeword};

/// HTVQ decoder: a codeword is a direct index into the block-sized stage codebook
#[derive(Clone, Copy, Debug)]
pub struct HtvqDecoder<'a> {
    codebook: &'a Codebook,
}

impl<'a> HtvqDecoder<'a> {
    pub fn new(codebook: &'a Codebook) -> Self {
        Self { codebook }
    }

    /// Decode one codeword into a `height x width` block
    pub fn decode(&self, codeword: Codeword, width: usize, height: usize) -> Result<Block> {
        let stage = stage_for_length(width * height)?;
        Block::from_pixels(height, width, self.codebook.entry(stage, codeword))
    }

    /// Decode a codeword sequence into blocks of the same shape
    pub fn decode_batch(
        &self,
        codewords: &[Codeword],
        width: usize,
        height: usize,
    ) -> Result<Vec<Block>> {
        let stage = stage_for_length(width * height)?;
        codewords
            .iter()
            .map(|&codeword| Block::from_pixels(height, width, self.codebook.entry(stage, codeword)))
            .collect()
    }
}

impl BlockDecoder for HtvqDecoder<'_> {
    fn decode_block(&self, codeword: Codeword, width: usize, height: usize) -> Result<Block> {
        self.decode(codeword, width, height)
    }
}
