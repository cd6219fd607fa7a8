//! Whole-image compression: partition, encode, decode, reassemble.

pub mod parallel;
pub mod single;

pub use parallel::ParallelPipeline;
pub use single::SequentialPipeline;

use crate::codebook::{stage_for_length, Codebook};
use crate::error::{Error, Result};
use crate::htvq::{HtvqDecoder, HtvqEncoder, Stage4Pairing};
use crate::image::{Image, PartitionConfig, Partitioner};
use crate::vq::VqEncoder;
use crate::{BlockEncoder, BlockPipeline, CodecConfig, CodecStats, Codeword, SearchMode};

/// Codeword stream of one image, in row-major block scan order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedImage {
    pub image_rows: usize,
    pub image_columns: usize,
    pub block_width: usize,
    pub block_height: usize,
    /// Pairing the encoder used for 8x4 blocks
    pub pairing: Stage4Pairing,
    pub codewords: Vec<Codeword>,
}

impl CompressedImage {
    /// Partition geometry implied by the image and block dimensions
    pub fn partition_config(&self) -> PartitionConfig {
        PartitionConfig {
            image_rows: self.image_rows,
            image_columns: self.image_columns,
            partition_rows: self.block_height,
            partition_columns: self.block_width,
        }
    }

    /// Number of codewords the dimensions require
    pub fn expected_codewords(&self) -> usize {
        if self.block_width == 0 || self.block_height == 0 {
            return 0;
        }
        (self.image_rows / self.block_height) * (self.image_columns / self.block_width)
    }
}

/// Compress an image into a codeword stream
pub fn compress_image(
    codebook: &Codebook,
    image: &Image,
    config: &CodecConfig,
) -> Result<(CompressedImage, CodecStats)> {
    let partitioner = Partitioner::new(PartitionConfig {
        image_rows: image.rows(),
        image_columns: image.columns(),
        partition_rows: config.block_height,
        partition_columns: config.block_width,
    })?;

    // Reject unsupported block sizes before touching any pixels
    stage_for_length(config.block_width * config.block_height)?;

    let blocks = partitioner.partition(image)?;
    log::debug!(
        "Encoding {}x{} image as {} blocks of {}x{} ({:?})",
        image.columns(),
        image.rows(),
        blocks.len(),
        config.block_width,
        config.block_height,
        config.search
    );

    let (codewords, stats) = match config.search {
        SearchMode::Hierarchical => {
            let encoder = HtvqEncoder::new(codebook).with_pairing(config.pairing);
            encode_with(&encoder, &blocks, config)?
        }
        SearchMode::BruteForce => encode_with(&VqEncoder::new(codebook), &blocks, config)?,
    };

    let compressed = CompressedImage {
        image_rows: image.rows(),
        image_columns: image.columns(),
        block_width: config.block_width,
        block_height: config.block_height,
        pairing: config.pairing,
        codewords,
    };
    Ok((compressed, stats))
}

/// Reconstruct an image from a codeword stream
pub fn decompress_image(
    codebook: &Codebook,
    compressed: &CompressedImage,
    config: &CodecConfig,
) -> Result<(Image, CodecStats)> {
    let partitioner = Partitioner::new(compressed.partition_config())?;
    if compressed.codewords.len() != partitioner.block_count() {
        return Err(Error::CodewordCountMismatch {
            declared: compressed.codewords.len(),
            required: partitioner.block_count(),
        });
    }

    let decoder = HtvqDecoder::new(codebook);
    let (width, height) = (compressed.block_width, compressed.block_height);

    let (blocks, stats) = if config.num_threads == 1 {
        let mut pipeline = SequentialPipeline::new(config.clone());
        let blocks = pipeline.decode_blocks(&decoder, &compressed.codewords, width, height)?;
        (blocks, pipeline.stats().clone())
    } else {
        let mut pipeline = ParallelPipeline::new(config.clone());
        let blocks = pipeline.decode_blocks(&decoder, &compressed.codewords, width, height)?;
        (blocks, pipeline.stats().clone())
    };

    let image = partitioner.unpartition(&blocks)?;
    Ok((image, stats))
}

fn encode_with<E: BlockEncoder>(
    encoder: &E,
    blocks: &[crate::image::Block],
    config: &CodecConfig,
) -> Result<(Vec<Codeword>, CodecStats)> {
    if config.num_threads == 1 {
        let mut pipeline = SequentialPipeline::new(config.clone());
        let codewords = pipeline.encode_blocks(encoder, blocks)?;
        Ok((codewords, pipeline.stats().clone()))
    } else {
        let mut pipeline = ParallelPipeline::new(config.clone());
        let codewords = pipeline.encode_blocks(encoder, blocks)?;
        Ok((codewords, pipeline.stats().clone()))
    }
}
