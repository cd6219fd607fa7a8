pub mod codebook;
pub mod container;
pub mod error;
pub mod htvq;
pub mod image;
pub mod metrics;
pub mod pipeline;
pub mod vq;

pub use codebook::{Codebook, CodebookBuilder, StageCodebook, CODEBOOK_FILE_SIZE};
pub use error::{Error, ErrorKind, Result};
pub use htvq::{HtvqDecoder, HtvqEncoder, Stage4Pairing};
pub use image::{Block, Image, Matrix, PartitionConfig, Partitioner};
pub use pipeline::{
    compress_image, decompress_image, parallel::ParallelPipeline, single::SequentialPipeline,
    CompressedImage,
};
pub use vq::VqEncoder;

/// Index into a stage codebook
pub type Codeword = u8;

/// Codeword search used when encoding blocks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Cascaded lookup tables (fast path)
    #[default]
    Hierarchical,
    /// Full nearest-codeword search over the stage codebook
    BruteForce,
}

/// Configuration for compressing and decompressing images
#[derive(Clone, Debug)]
pub struct CodecConfig {
    /// Block width in pixels (default: 4)
    pub block_width: usize,
    /// Block height in pixels (default: 4)
    pub block_height: usize,
    /// Blocks processed per batch (0 is treated as 1)
    pub block_count: usize,
    /// Number of threads (0 = auto, 1 = single-threaded)
    pub num_threads: usize,
    /// Encoder used for blocks
    pub search: SearchMode,
    /// Level-0 pairing for 8x4 blocks
    pub pairing: Stage4Pairing,
}

impl CodecConfig {
    /// Batch size with the zero case folded to one block
    pub fn batch_size(&self) -> usize {
        self.block_count.max(1)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            block_width: 4,
            block_height: 4,
            block_count: 64,
            num_threads: 1,
            search: SearchMode::Hierarchical,
            pairing: Stage4Pairing::Reference,
        }
    }
}

/// Statistics from the last pipeline run
#[derive(Clone, Debug, Default)]
pub struct CodecStats {
    pub blocks: u64,
    pub batches: u64,
    pub threads: usize,
}

/// Maps one block to one codeword
pub trait BlockEncoder: Sync {
    fn encode_block(&self, block: &Block) -> Result<Codeword>;
}

/// Maps one codeword back to a `height x width` block
pub trait BlockDecoder: Sync {
    fn decode_block(&self, codeword: Codeword, width: usize, height: usize) -> Result<Block>;
}

/// Trait for running encoders and decoders over block sequences in batches
pub trait BlockPipeline {
    /// Encode blocks, returning codewords in input order
    fn encode_blocks<E: BlockEncoder>(
        &mut self,
        encoder: &E,
        blocks: &[Block],
    ) -> Result<Vec<Codeword>>;

    /// Decode codewords, returning blocks in input order
    fn decode_blocks<D: BlockDecoder>(
        &mut self,
        decoder: &D,
        codewords: &[Codeword],
        width: usize,
        height: usize,
    ) -> Result<Vec<Block>>;

    fn stats(&self) -> &CodecStats;
}
