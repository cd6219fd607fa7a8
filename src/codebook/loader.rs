//! Codebook storage and the binary codebook file format.
//!
//! The file has no header or length prefix. For each stage `s = 0..4`:
//! - `256 * 2^(s+1)` bytes: the stage's codebook vectors, row-scanned
//! - `65536` bytes: the stage's lookup table, one codeword per pair index
//!
//! All bytes are unsigned. A complete file is exactly
//! [`CODEBOOK_FILE_SIZE`] bytes.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use super::constants::*;
use super::stage::pair_index;
use crate::error::{CodebookSection, Error, Result};
use crate::Codeword;

/// Loaded codebook: per-stage vectors and lookup tables, immutable after load.
#[derive(Clone)]
pub struct Codebook {
    /// All stage vectors, stage 0 first
    vectors: Box<[u8]>,
    /// All lookup tables, `NUM_STAGES * LOOKUP_TABLE_SIZE`
    lookup: Box<[u8]>,
}

impl std::fmt::Debug for Codebook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codebook").field("fingerprint", &self.fingerprint()).finish()
    }
}

impl Codebook {
    /// All-zero codebook, the starting point for [`super::CodebookBuilder`]
    pub(crate) fn zeroed() -> Self {
        Self {
            vectors: vec![0u8; VECTORS_SIZE].into_boxed_slice(),
            lookup: vec![0u8; NUM_STAGES * LOOKUP_TABLE_SIZE].into_boxed_slice(),
        }
    }

    /// Load a codebook from a byte stream, reading stages in order.
    ///
    /// Fails with [`Error::CorruptCodebook`] on a short read. Bytes after the
    /// last stage are not consumed.
    pub fn load<R: Read>(mut reader: R) -> Result<Self> {
        let mut codebook = Self::zeroed();

        for stage in 0..NUM_STAGES {
            let start = stage_vectors_offset(stage);
            let vectors = &mut codebook.vectors[start..start + stage_vectors_size(stage)];
            read_section(&mut reader, vectors, stage, CodebookSection::Vectors)?;

            let start = stage * LOOKUP_TABLE_SIZE;
            let table = &mut codebook.lookup[start..start + LOOKUP_TABLE_SIZE];
            read_section(&mut reader, table, stage, CodebookSection::LookupTable)?;
        }

        log::debug!("Loaded codebook (fingerprint 0x{:08x})", codebook.fingerprint());
        Ok(codebook)
    }

    /// Load a codebook from an in-memory buffer
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let codebook = Self::load(data)?;
        if data.len() > CODEBOOK_FILE_SIZE {
            log::warn!(
                "Ignoring {} trailing bytes after codebook data",
                data.len() - CODEBOOK_FILE_SIZE
            );
        }
        Ok(codebook)
    }

    /// Load a codebook file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading codebook from {}", path.display());
        let file = File::open(path)?;
        Self::load(BufReader::with_capacity(LOOKUP_TABLE_SIZE, file))
    }

    /// Write the codebook in the binary file format
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for stage in 0..NUM_STAGES {
            writer.write_all(self.stage_vectors(stage))?;
            writer.write_all(self.lookup_table(stage))?;
        }
        writer.flush()
    }

    /// View of one stage's 256 codebook vectors.
    ///
    /// Stage accessors panic when `stage > MAX_STAGE`.
    pub fn stage(&self, stage: usize) -> StageCodebook<'_> {
        StageCodebook { stage, data: self.stage_vectors(stage) }
    }

    /// Codebook vector for `codeword` at `stage`
    #[inline]
    pub fn entry(&self, stage: usize, codeword: Codeword) -> &[u8] {
        let len = vector_len(stage);
        let start = stage_vectors_offset(stage) + codeword as usize * len;
        &self.vectors[start..start + len]
    }

    /// Lookup table of a stage
    #[inline]
    pub fn lookup_table(&self, stage: usize) -> &[u8] {
        let start = stage * LOOKUP_TABLE_SIZE;
        &self.lookup[start..start + LOOKUP_TABLE_SIZE]
    }

    /// Codeword a stage's lookup table holds for the pair `(first, second)`
    #[inline]
    pub fn lookup(&self, stage: usize, first: u8, second: u8) -> Codeword {
        self.lookup_table(stage)[pair_index(first, second)]
    }

    /// CRC32 of the codebook in file order
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        for stage in 0..NUM_STAGES {
            hasher.update(self.stage_vectors(stage));
            hasher.update(self.lookup_table(stage));
        }
        hasher.finalize()
    }

    fn stage_vectors(&self, stage: usize) -> &[u8] {
        let start = stage_vectors_offset(stage);
        &self.vectors[start..start + stage_vectors_size(stage)]
    }

    pub(crate) fn stage_vectors_mut(&mut self, stage: usize) -> &mut [u8] {
        let start = stage_vectors_offset(stage);
        &mut self.vectors[start..start + stage_vectors_size(stage)]
    }

    pub(crate) fn lookup_table_mut(&mut self, stage: usize) -> &mut [u8] {
        let start = stage * LOOKUP_TABLE_SIZE;
        &mut self.lookup[start..start + LOOKUP_TABLE_SIZE]
    }
}

/// Borrowed view of one stage's codebook vectors
#[derive(Clone, Copy, Debug)]
pub struct StageCodebook<'a> {
    stage: usize,
    data: &'a [u8],
}

impl<'a> StageCodebook<'a> {
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Number of entries (always 256)
    pub fn len(&self) -> usize {
        self.data.len() / self.vector_len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of each vector
    pub fn vector_len(&self) -> usize {
        vector_len(self.stage)
    }

    pub fn entry(&self, codeword: Codeword) -> &'a [u8] {
        let len = self.vector_len();
        let start = codeword as usize * len;
        &self.data[start..start + len]
    }

    /// Entries in codeword order
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> {
        self.data.chunks_exact(self.vector_len())
    }
}

/// Fill `buf` from the reader, failing with `CorruptCodebook` on a short read
fn read_section<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    stage: usize,
    section: CodebookSection,
) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(Error::Io(e)),
        }
    }

    if filled < buf.len() {
        return Err(Error::CorruptCodebook { stage, section, expected: buf.len(), found: filled });
    }
    Ok(())
}
