use thiserror::Error;

/// Section of a codebook stage that a short read hit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodebookSection {
    Vectors,
    LookupTable,
}

impl std::fmt::Display for CodebookSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vectors => f.write_str("codebook vectors"),
            Self::LookupTable => f.write_str("lookup table"),
        }
    }
}

/// Coarse classification of [`Error`] variants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Partition or block dimensions inconsistent with the configuration
    Configuration,
    /// Codebook stream truncated or malformed
    CorruptCodebook,
    /// Operand shapes disagree
    DimensionMismatch,
    /// Pixel value outside [0, 255]
    ValueRange,
    /// Block larger than the codebook's stage capacity
    ResourceLimit,
    /// Malformed input data (block lengths, container or image files)
    InvalidInput,
    Io,
    Internal,
}

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error(
        "Partition {partition_rows}x{partition_columns} does not evenly divide image {image_rows}x{image_columns}"
    )]
    InvalidPartition {
        image_rows: usize,
        image_columns: usize,
        partition_rows: usize,
        partition_columns: usize,
    },

    #[error("Block {index} is {found_rows}x{found_columns}, expected {expected_rows}x{expected_columns}")]
    BlockShapeMismatch {
        index: usize,
        expected_rows: usize,
        expected_columns: usize,
        found_rows: usize,
        found_columns: usize,
    },

    #[error("Expected {expected} blocks, got {found}")]
    BlockCountMismatch { expected: usize, found: usize },

    // Codebook errors
    #[error("Corrupt codebook: stage {stage} {section} needs {expected} bytes, got {found}")]
    CorruptCodebook { stage: usize, section: CodebookSection, expected: usize, found: usize },

    // Operand errors
    #[error("Dimension mismatch: expected {expected_rows}x{expected_columns}, got {found_rows}x{found_columns}")]
    DimensionMismatch {
        expected_rows: usize,
        expected_columns: usize,
        found_rows: usize,
        found_columns: usize,
    },

    #[error("Pixel value {value} at ({row}, {column}) is outside [0, 255]")]
    ValueOutOfRange { value: i32, row: usize, column: usize },

    #[error("Invalid block length {0}: length must be > 1 and a power of two")]
    InvalidBlockLength(usize),

    #[error("Block of {length} elements needs {stages} stages, codebook supports at most {max}")]
    TooManyStages { length: usize, stages: usize, max: usize },

    // Container errors
    #[error("Invalid container magic: expected \"HTVQ\", got {0:02x?}")]
    InvalidContainerMagic([u8; 4]),

    #[error("Unsupported container version: {0}")]
    UnsupportedContainerVersion(u8),

    #[error("Container declares {declared} codewords, dimensions require {required}")]
    CodewordCountMismatch { declared: usize, required: usize },

    #[error("CRC32 mismatch: expected 0x{expected:08x}, got 0x{found:08x}")]
    Crc32Mismatch { expected: u32, found: u32 },

    // Image file errors
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Invalid image header: {0}")]
    InvalidImageHeader(String),

    // Internal errors
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidPartition { .. }
            | Self::BlockShapeMismatch { .. }
            | Self::BlockCountMismatch { .. } => ErrorKind::Configuration,
            Self::CorruptCodebook { .. } => ErrorKind::CorruptCodebook,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::ValueOutOfRange { .. } => ErrorKind::ValueRange,
            Self::TooManyStages { .. } => ErrorKind::ResourceLimit,
            Self::InvalidBlockLength(_)
            | Self::InvalidContainerMagic(_)
            | Self::UnsupportedContainerVersion(_)
            | Self::CodewordCountMismatch { .. }
            | Self::Crc32Mismatch { .. }
            | Self::UnsupportedImageFormat(_)
            | Self::InvalidImageHeader(_)
            | Self::UnexpectedEof => ErrorKind::InvalidInput,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
