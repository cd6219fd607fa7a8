use std::io::Write;

use super::constants::*;
use crate::error::{Error, Result};
use crate::htvq::Stage4Pairing;
use crate::pipeline::CompressedImage;

/// Writes compressed images in the container format
pub struct ContainerWriter<W: Write> {
    writer: W,
    bytes_written: u64,
}

impl<W: Write> ContainerWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, bytes_written: 0 }
    }

    /// Write header, codewords and CRC32 footer
    pub fn write_image(&mut self, image: &CompressedImage) -> Result<()> {
        let required = image.expected_codewords();
        if image.codewords.len() != required {
            return Err(Error::CodewordCountMismatch {
                declared: image.codewords.len(),
                required,
            });
        }

        let header = encode_header(image)?;
        self.writer.write_all(&header)?;
        self.writer.write_all(&image.codewords)?;

        let crc = crc32fast::hash(&image.codewords);
        self.writer.write_all(&crc.to_le_bytes())?;

        self.bytes_written += (HEADER_SIZE + image.codewords.len() + FOOTER_SIZE) as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Get the inner writer (consumes self)
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn encode_header(image: &CompressedImage) -> Result<[u8; HEADER_SIZE]> {
    let narrow = |value: usize, what: &str| {
        u32::try_from(value)
            .map_err(|_| Error::Internal(format!("{} {} does not fit the container", what, value)))
    };
    let block_width = u8::try_from(image.block_width)
        .map_err(|_| Error::Internal(format!("block width {} too large", image.block_width)))?;
    let block_height = u8::try_from(image.block_height)
        .map_err(|_| Error::Internal(format!("block height {} too large", image.block_height)))?;

    let flags = match image.pairing {
        Stage4Pairing::Reference => 0,
        Stage4Pairing::Corrected => FLAG_CORRECTED_PAIRING,
    };

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(&CONTAINER_MAGIC);
    header[4] = CONTAINER_VERSION;
    header[5] = block_width;
    header[6] = block_height;
    header[7] = flags;
    header[8..12].copy_from_slice(&narrow(image.image_rows, "image rows")?.to_le_bytes());
    header[12..16].copy_from_slice(&narrow(image.image_columns, "image columns")?.to_le_bytes());
    header[16..20].copy_from_slice(&narrow(image.codewords.len(), "codeword count")?.to_le_bytes());
    Ok(header)
}
