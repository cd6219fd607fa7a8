//! In-memory codebook assembly.

use super::constants::*;
use super::loader::Codebook;
use crate::error::{Error, Result};
use crate::Codeword;

/// Builder for codebooks that do not come from a file.
///
/// Starts from an all-zero codebook; entries and lookup tables are set per
/// stage and the result is frozen with [`CodebookBuilder::build`].
#[derive(Clone, Debug)]
pub struct CodebookBuilder {
    codebook: Codebook,
}

impl Default for CodebookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CodebookBuilder {
    pub fn new() -> Self {
        Self { codebook: Codebook::zeroed() }
    }

    /// Set the vector for `codeword` at `stage`.
    ///
    /// The vector length must be `2^(stage+1)`.
    pub fn set_entry(&mut self, stage: usize, codeword: Codeword, vector: &[u8]) -> Result<()> {
        check_stage(stage)?;
        let len = vector_len(stage);
        if vector.len() != len {
            return Err(Error::DimensionMismatch {
                expected_rows: 1,
                expected_columns: len,
                found_rows: 1,
                found_columns: vector.len(),
            });
        }

        let start = codeword as usize * len;
        self.codebook.stage_vectors_mut(stage)[start..start + len].copy_from_slice(vector);
        Ok(())
    }

    /// Set every entry of a stage from `f(codeword) -> vector`
    pub fn fill_entries<F>(&mut self, stage: usize, mut f: F) -> Result<()>
    where
        F: FnMut(Codeword) -> Vec<u8>,
    {
        for codeword in 0..=u8::MAX {
            let vector = f(codeword);
            self.set_entry(stage, codeword, &vector)?;
        }
        Ok(())
    }

    /// Set one lookup table entry
    pub fn set_lookup(
        &mut self,
        stage: usize,
        first: u8,
        second: u8,
        codeword: Codeword,
    ) -> Result<()> {
        check_stage(stage)?;
        let index = super::stage::pair_index(first, second);
        self.codebook.lookup_table_mut(stage)[index] = codeword;
        Ok(())
    }

    /// Set every lookup table entry of a stage from `f(first, second) -> codeword`
    pub fn fill_lookup<F>(&mut self, stage: usize, mut f: F) -> Result<()>
    where
        F: FnMut(u8, u8) -> Codeword,
    {
        check_stage(stage)?;
        let table = self.codebook.lookup_table_mut(stage);
        for (index, slot) in table.iter_mut().enumerate() {
            *slot = f((index >> 8) as u8, (index & 0xFF) as u8);
        }
        Ok(())
    }

    pub fn build(self) -> Codebook {
        self.codebook
    }
}

fn check_stage(stage: usize) -> Result<()> {
    if stage > MAX_STAGE {
        return Err(Error::TooManyStages {
            length: 2usize.checked_shl(stage as u32).unwrap_or(usize::MAX),
            stages: stage,
            max: MAX_STAGE,
        });
    }
    Ok(())
}
