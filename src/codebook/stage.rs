//! Stage arithmetic shared by the hierarchical and brute-force encoders.
//!
//! A block of `len` elements is quantized at stage `log2(len) - 1`. Each stage
//! has a canonical block shape obtained by doubling the previous shape along
//! alternating dimensions, starting with a horizontal pixel pair:
//!
//! | stage | length | shape (w x h) |
//! |-------|--------|---------------|
//! | 0     | 2      | 2x1           |
//! | 1     | 4      | 2x2           |
//! | 2     | 8      | 4x2           |
//! | 3     | 16     | 4x4           |
//! | 4     | 32     | 8x4           |

use super::constants::MAX_STAGE;
use crate::error::{Error, Result};

/// Stage index for a block of `len` elements.
///
/// Fails with [`Error::InvalidBlockLength`] when `len < 2` or is not a power of
/// two, and with [`Error::TooManyStages`] when the stage exceeds the codebook.
pub fn stage_for_length(len: usize) -> Result<usize> {
    if len < 2 || !len.is_power_of_two() {
        return Err(Error::InvalidBlockLength(len));
    }

    let stage = len.trailing_zeros() as usize - 1;
    if stage > MAX_STAGE {
        return Err(Error::TooManyStages { length: len, stages: stage, max: MAX_STAGE });
    }

    Ok(stage)
}

/// Canonical (width, height) of a stage's block
#[inline]
pub const fn canonical_shape(stage: usize) -> (usize, usize) {
    (1 << (stage / 2 + 1), 1 << ((stage + 1) / 2))
}

/// Whether reduction level `level` pairs horizontally adjacent values.
///
/// Even levels pair left/right, odd levels pair top/bottom.
#[inline]
pub const fn pairs_horizontally(level: usize) -> bool {
    level % 2 == 0
}

/// Lookup table index for an ordered pair of child values
#[inline]
pub fn pair_index(first: u8, second: u8) -> usize {
    ((first as usize) << 8) | second as usize
}
