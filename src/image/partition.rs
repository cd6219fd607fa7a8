//! Splitting images into fixed-size blocks and reassembling them.
//!
//! Blocks are produced in row-major scan order: block rows top to bottom,
//! and left to right within a block row.

use super::matrix::{Block, Image};
use crate::error::{Error, Result};

/// Image and partition dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionConfig {
    pub image_rows: usize,
    pub image_columns: usize,
    pub partition_rows: usize,
    pub partition_columns: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self { image_rows: 176, image_columns: 144, partition_rows: 4, partition_columns: 4 }
    }
}

/// Validated partition geometry
#[derive(Clone, Copy, Debug)]
pub struct Partitioner {
    config: PartitionConfig,
}

impl Partitioner {
    /// Fails with `InvalidPartition` unless the partition evenly divides the image
    pub fn new(config: PartitionConfig) -> Result<Self> {
        let PartitionConfig { image_rows, image_columns, partition_rows, partition_columns } =
            config;

        if partition_rows == 0
            || partition_columns == 0
            || image_rows % partition_rows != 0
            || image_columns % partition_columns != 0
        {
            return Err(Error::InvalidPartition {
                image_rows,
                image_columns,
                partition_rows,
                partition_columns,
            });
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// (block rows, block columns) of the grid
    pub fn grid(&self) -> (usize, usize) {
        (
            self.config.image_rows / self.config.partition_rows,
            self.config.image_columns / self.config.partition_columns,
        )
    }

    /// Number of blocks per image
    pub fn block_count(&self) -> usize {
        let (rows, columns) = self.grid();
        rows * columns
    }

    /// Split an image into blocks in row-major scan order
    pub fn partition(&self, image: &Image) -> Result<Vec<Block>> {
        let cfg = &self.config;
        if image.dims() != (cfg.image_rows, cfg.image_columns) {
            return Err(Error::DimensionMismatch {
                expected_rows: cfg.image_rows,
                expected_columns: cfg.image_columns,
                found_rows: image.rows(),
                found_columns: image.columns(),
            });
        }

        let (grid_rows, grid_columns) = self.grid();
        let mut blocks = Vec::with_capacity(grid_rows * grid_columns);

        for block_row in 0..grid_rows {
            for block_column in 0..grid_columns {
                let mut block = Block::new(cfg.partition_rows, cfg.partition_columns);
                let left = block_column * cfg.partition_columns;

                for r in 0..cfg.partition_rows {
                    let src = image.row(block_row * cfg.partition_rows + r);
                    block.row_mut(r).copy_from_slice(&src[left..left + cfg.partition_columns]);
                }
                blocks.push(block);
            }
        }

        Ok(blocks)
    }

    /// Reassemble blocks given in row-major scan order into a full image
    pub fn unpartition(&self, blocks: &[Block]) -> Result<Image> {
        let cfg = &self.config;
        if blocks.len() != self.block_count() {
            return Err(Error::BlockCountMismatch {
                expected: self.block_count(),
                found: blocks.len(),
            });
        }

        let (_, grid_columns) = self.grid();
        let mut image = Image::new(cfg.image_rows, cfg.image_columns);

        for (index, block) in blocks.iter().enumerate() {
            if block.dims() != (cfg.partition_rows, cfg.partition_columns) {
                return Err(Error::BlockShapeMismatch {
                    index,
                    expected_rows: cfg.partition_rows,
                    expected_columns: cfg.partition_columns,
                    found_rows: block.rows(),
                    found_columns: block.columns(),
                });
            }

            let top = (index / grid_columns) * cfg.partition_rows;
            let left = (index % grid_columns) * cfg.partition_columns;
            for r in 0..cfg.partition_rows {
                image.row_mut(top + r)[left..left + cfg.partition_columns]
                    .copy_from_slice(block.row(r));
            }
        }

        Ok(image)
    }
}
