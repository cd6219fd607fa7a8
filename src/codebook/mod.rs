pub mod builder;
pub mod constants;
pub mod loader;
pub mod stage;

pub use builder::CodebookBuilder;
pub use constants::*;
pub use loader::{Codebook, StageCodebook};
pub use stage::{canonical_shape, pair_index, stage_for_length};
