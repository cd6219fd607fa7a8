use std::io::{self, Read};

use super::constants::*;
use crate::error::{Error, Result};
use crate::htvq::Stage4Pairing;
use crate::pipeline::CompressedImage;

/// Read one compressed image, verifying its header and CRC32 footer
pub fn read_image<R: Read>(reader: &mut R) -> Result<CompressedImage> {
    let mut header = [0u8; HEADER_SIZE];
    read_exact(reader, &mut header)?;

    let magic: [u8; 4] = [header[0], header[1], header[2], header[3]];
    if magic != CONTAINER_MAGIC {
        return Err(Error::InvalidContainerMagic(magic));
    }

    let version = header[4];
    if version != CONTAINER_VERSION {
        return Err(Error::UnsupportedContainerVersion(version));
    }

    let block_width = header[5] as usize;
    let block_height = header[6] as usize;
    let pairing = if header[7] & FLAG_CORRECTED_PAIRING != 0 {
        Stage4Pairing::Corrected
    } else {
        Stage4Pairing::Reference
    };
    let image_rows = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;
    let image_columns =
        u32::from_le_bytes([header[12], header[13], header[14], header[15]]) as usize;
    let declared = u32::from_le_bytes([header[16], header[17], header[18], header[19]]) as usize;

    let mut image = CompressedImage {
        image_rows,
        image_columns,
        block_width,
        block_height,
        pairing,
        codewords: Vec::new(),
    };

    let required = image.expected_codewords();
    if declared != required {
        return Err(Error::CodewordCountMismatch { declared, required });
    }

    // Grow with the data actually read; the header alone can claim ~4 GiB
    (&mut *reader).take(declared as u64).read_to_end(&mut image.codewords)?;
    if image.codewords.len() != declared {
        return Err(Error::UnexpectedEof);
    }

    let mut footer = [0u8; FOOTER_SIZE];
    read_exact(reader, &mut footer)?;
    let expected = u32::from_le_bytes(footer);
    let found = crc32fast::hash(&image.codewords);
    if expected != found {
        return Err(Error::Crc32Mismatch { expected, found });
    }

    Ok(image)
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::UnexpectedEof,
        _ => Error::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerWriter;
    use std::io::Cursor;

    fn encoded(image: &CompressedImage) -> Vec<u8> {
        let mut writer = ContainerWriter::new(Vec::new());
        writer.write_image(image).unwrap();
        writer.into_inner()
    }

    fn sample() -> CompressedImage {
        CompressedImage {
            image_rows: 8,
            image_columns: 8,
            block_width: 4,
            block_height: 4,
            pairing: Stage4Pairing::Reference,
            codewords: vec![1, 2, 3, 4],
        }
    }

    #[test]
    fn test_read_written_image() {
        let image = sample();
        let bytes = encoded(&image);
        assert_eq!(read_image(&mut Cursor::new(bytes)).unwrap(), image);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encoded(&sample());
        bytes[0] = b'X';
        assert!(matches!(
            read_image(&mut bytes.as_slice()),
            Err(Error::InvalidContainerMagic([b'X', b'T', b'V', b'Q']))
        ));
    }

    #[test]
    fn test_bad_version() {
        let mut bytes = encoded(&sample());
        bytes[4] = 9;
        assert!(matches!(
            read_image(&mut bytes.as_slice()),
            Err(Error::UnsupportedContainerVersion(9))
        ));
    }

    #[test]
    fn test_corrupted_codeword() {
        let mut bytes = encoded(&sample());
        bytes[HEADER_SIZE + 1] ^= 0xFF;
        assert!(matches!(read_image(&mut bytes.as_slice()), Err(Error::Crc32Mismatch { .. })));
    }

    #[test]
    fn test_truncated() {
        let bytes = encoded(&sample());
        for len in [0, HEADER_SIZE - 1, HEADER_SIZE + 2, bytes.len() - 1] {
            assert!(
                matches!(read_image(&mut &bytes[..len]), Err(Error::UnexpectedEof)),
                "length {}",
                len
            );
        }
    }

    #[test]
    fn test_large_declared_count_on_short_stream() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CONTAINER_MAGIC);
        bytes.extend_from_slice(&[CONTAINER_VERSION, 1, 1, 0]);
        bytes.extend_from_slice(&65536u32.to_le_bytes());
        bytes.extend_from_slice(&65535u32.to_le_bytes());
        bytes.extend_from_slice(&4_294_901_760u32.to_le_bytes());
        bytes.extend_from_slice(&[1, 2, 3]);

        assert!(matches!(read_image(&mut bytes.as_slice()), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_inconsistent_count() {
        let mut bytes = encoded(&sample());
        bytes[16..20].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            read_image(&mut bytes.as_slice()),
            Err(Error::CodewordCountMismatch { required: 4, .. })
        ));
    }
}
