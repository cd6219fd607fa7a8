use crate::error::Result;
use crate::image::Block;
use crate::{BlockDecoder, BlockEncoder, BlockPipeline, CodecConfig, CodecStats, Codeword};

/// Single-threaded pipeline: batches run one after another on the caller's thread
pub struct SequentialPipeline {
    config: CodecConfig,
    stats: CodecStats,
}

impl SequentialPipeline {
    pub fn new(config: CodecConfig) -> Self {
        Self { config, stats: CodecStats::default() }
    }
}

impl BlockPipeline for SequentialPipeline {
    fn encode_blocks<E: BlockEncoder>(
        &mut self,
        encoder: &E,
        blocks: &[Block],
    ) -> Result<Vec<Codeword>> {
        self.stats = CodecStats { threads: 1, ..Default::default() };
        let mut codewords = Vec::with_capacity(blocks.len());

        for batch in blocks.chunks(self.config.batch_size()) {
            for block in batch {
                codewords.push(encoder.encode_block(block)?);
            }
            self.stats.batches += 1;
            self.stats.blocks += batch.len() as u64;
        }

        Ok(codewords)
    }

    fn decode_blocks<D: BlockDecoder>(
        &mut self,
        decoder: &D,
        codewords: &[Codeword],
        width: usize,
        height: usize,
    ) -> Result<Vec<Block>> {
        self.stats = CodecStats { threads: 1, ..Default::default() };
        let mut blocks = Vec::with_capacity(codewords.len());

        for batch in codewords.chunks(self.config.batch_size()) {
            for &codeword in batch {
                blocks.push(decoder.decode_block(codeword, width, height)?);
            }
            self.stats.batches += 1;
            self.stats.blocks += batch.len() as u64;
        }

        Ok(blocks)
    }

    fn stats(&self) -> &CodecStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebook::{vector_len, CodebookBuilder, NUM_STAGES};
    use crate::error::Error;
    use crate::{HtvqDecoder, HtvqEncoder};

    fn averaging_codebook() -> crate::Codebook {
        let mut builder = CodebookBuilder::new();
        for stage in 0..NUM_STAGES {
            builder.fill_entries(stage, |cw| vec![cw; vector_len(stage)]).unwrap();
            builder.fill_lookup(stage, |a, b| ((a as u16 + b as u16 + 1) / 2) as u8).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_batches_counted() {
        let codebook = averaging_codebook();
        let encoder = HtvqEncoder::new(&codebook);
        let blocks: Vec<Block> =
            (0..10).map(|v| Block::from_vec(2, 2, vec![v * 10; 4]).unwrap()).collect();

        let config = CodecConfig { block_count: 4, ..Default::default() };
        let mut pipeline = SequentialPipeline::new(config);
        let codewords = pipeline.encode_blocks(&encoder, &blocks).unwrap();

        assert_eq!(codewords, (0..10).map(|v| v * 10).collect::<Vec<u8>>());
        assert_eq!(pipeline.stats().batches, 3);
        assert_eq!(pipeline.stats().blocks, 10);
    }

    #[test]
    fn test_decode_blocks() {
        let codebook = averaging_codebook();
        let decoder = HtvqDecoder::new(&codebook);
        let mut pipeline = SequentialPipeline::new(CodecConfig::default());

        let blocks = pipeline.decode_blocks(&decoder, &[1, 2, 3], 4, 2).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].as_slice(), &[3; 8]);
    }

    #[test]
    fn test_fails_fast() {
        let codebook = averaging_codebook();
        let encoder = HtvqEncoder::new(&codebook);
        let blocks = vec![
            Block::from_vec(2, 2, vec![1; 4]).unwrap(),
            Block::from_vec(2, 2, vec![-5; 4]).unwrap(),
            Block::from_vec(2, 2, vec![1; 4]).unwrap(),
        ];

        let mut pipeline = SequentialPipeline::new(CodecConfig { block_count: 1, ..Default::default() });
        let result = pipeline.encode_blocks(&encoder, &blocks);
        assert!(matches!(result, Err(Error::ValueOutOfRange { value: -5, .. })));
        assert_eq!(pipeline.stats().batches, 1);
    }
}
