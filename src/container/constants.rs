/// Container magic bytes
pub const CONTAINER_MAGIC: [u8; 4] = *b"HTVQ";

/// Current container version
pub const CONTAINER_VERSION: u8 = 1;

/// Header size: magic, version, block width/height, flags, rows, columns, count
pub const HEADER_SIZE: usize = 20;

/// Footer size (CRC32 of the codewords)
pub const FOOTER_SIZE: usize = 4;

/// Flag bit: codewords were produced with corrected stage-4 pairing
pub const FLAG_CORRECTED_PAIRING: u8 = 0x01;
