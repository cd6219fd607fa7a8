pub mod matrix;
pub mod partition;
pub mod pgm;

pub use matrix::{Block, Image, Matrix};
pub use partition::{PartitionConfig, Partitioner};
