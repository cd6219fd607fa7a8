/// Number of stages in a codebook file
pub const NUM_STAGES: usize = 5;

/// Highest stage index
pub const MAX_STAGE: usize = NUM_STAGES - 1;

/// Entries per stage codebook (one per 8-bit codeword)
pub const CODEBOOK_ENTRIES: usize = 256;

/// Entries per lookup table (one per 16-bit pair index)
pub const LOOKUP_TABLE_SIZE: usize = 65536;

/// Longest vector a stage can hold (stage 4, 8x4 block)
pub const MAX_VECTOR_LEN: usize = vector_len(MAX_STAGE);

/// Bytes of codebook vectors across all stages (512 + 1024 + 2048 + 4096 + 8192)
pub const VECTORS_SIZE: usize = stage_vectors_offset(NUM_STAGES);

/// Exact size of a codebook file
pub const CODEBOOK_FILE_SIZE: usize = VECTORS_SIZE + NUM_STAGES * LOOKUP_TABLE_SIZE;

/// Vector length of a stage: 2^(stage+1)
#[inline]
pub const fn vector_len(stage: usize) -> usize {
    2 << stage
}

/// Bytes of codebook vectors in one stage
#[inline]
pub const fn stage_vectors_size(stage: usize) -> usize {
    CODEBOOK_ENTRIES * vector_len(stage)
}

/// Offset of a stage's vectors within the contiguous vector storage
#[inline]
pub const fn stage_vectors_offset(stage: usize) -> usize {
    // sum of 256 * 2^(t+1) for t < stage
    CODEBOOK_ENTRIES * ((2 << stage) - 2)
}
