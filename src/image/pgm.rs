//! 8-bit greyscale PGM images (P5 binary, P2 ASCII).

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::matrix::Image;
use crate::error::{Error, Result};

/// Read a PGM image from a file
pub fn open<P: AsRef<Path>>(path: P) -> Result<Image> {
    read(BufReader::new(File::open(path)?))
}

/// Write an image as binary PGM to a file
pub fn save<P: AsRef<Path>>(image: &Image, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Parse a P5 or P2 image with maxval 255
pub fn read<R: Read>(mut reader: R) -> Result<Image> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let mut header = HeaderTokens { data: &data, pos: 0 };
    let magic = header.next_token()?;
    let binary = match magic {
        b"P5" => true,
        b"P2" => false,
        other => {
            return Err(Error::UnsupportedImageFormat(String::from_utf8_lossy(other).into_owned()))
        }
    };

    let columns = header.next_number("width")?;
    let rows = header.next_number("height")?;
    let max_val = header.next_number("maxval")?;
    if max_val != 255 {
        return Err(Error::UnsupportedImageFormat(format!("maxval {} (only 255)", max_val)));
    }

    let len = rows.checked_mul(columns).ok_or_else(|| {
        Error::InvalidImageHeader(format!("{}x{} image is too large", columns, rows))
    })?;
    if binary {
        // Exactly one whitespace byte separates the header from the raster
        let start = header.pos + 1;
        let end = start.checked_add(len).ok_or_else(|| {
            Error::InvalidImageHeader(format!("{}x{} image is too large", columns, rows))
        })?;
        let raster = data.get(start..end).ok_or(Error::UnexpectedEof)?;
        Image::from_pixels(rows, columns, raster)
    } else {
        // Each pixel needs at least one byte, so the input bounds the reservation
        let mut values = Vec::with_capacity(len.min(data.len() - header.pos));
        for i in 0..len {
            let value = header.next_number("pixel")?;
            if value > 255 {
                return Err(Error::ValueOutOfRange {
                    value: i32::try_from(value).unwrap_or(i32::MAX),
                    row: i / columns,
                    column: i % columns,
                });
            }
            values.push(value as i32);
        }
        Image::from_vec(rows, columns, values)
    }
}

/// Write an image as binary PGM, rejecting values outside [0, 255]
pub fn write<W: Write>(image: &Image, mut writer: W) -> Result<()> {
    let pixels = image.to_pixels()?;
    write!(writer, "P5\n{} {}\n255\n", image.columns(), image.rows())?;
    writer.write_all(&pixels)?;
    Ok(())
}

/// Whitespace-separated header tokens with `#` comments skipped
struct HeaderTokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderTokens<'a> {
    fn next_token(&mut self) -> Result<&'a [u8]> {
        loop {
            match self.data.get(self.pos) {
                None => return Err(Error::UnexpectedEof),
                Some(b'#') => {
                    while self.data.get(self.pos).is_some_and(|&b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(_) => break,
            }
        }

        let start = self.pos;
        while self.data.get(self.pos).is_some_and(|b| !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        Ok(&self.data[start..self.pos])
    }

    fn next_number(&mut self, field: &str) -> Result<usize> {
        let token = self.next_token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                Error::InvalidImageHeader(format!(
                    "bad {}: {:?}",
                    field,
                    String::from_utf8_lossy(token)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_binary() {
        let mut data = b"P5\n# comment\n3 2\n255\n".to_vec();
        data.extend_from_slice(&[0, 1, 2, 253, 254, 255]);

        let image = read(data.as_slice()).unwrap();
        assert_eq!(image.dims(), (2, 3));
        assert_eq!(image.as_slice(), &[0, 1, 2, 253, 254, 255]);
    }

    #[test]
    fn test_read_ascii() {
        let data = b"P2\n2 2\n255\n10 20\n30 40\n";
        let image = read(&data[..]).unwrap();
        assert_eq!(image.as_slice(), &[10, 20, 30, 40]);
    }

    #[test]
    fn test_ascii_out_of_range() {
        let data = b"P2\n1 1\n255\n300\n";
        assert!(matches!(read(&data[..]), Err(Error::ValueOutOfRange { value: 300, .. })));
    }

    #[test]
    fn test_ascii_value_wider_than_i32() {
        let data = b"P2\n2 1\n255\n7 4294967296\n";
        assert!(matches!(
            read(&data[..]),
            Err(Error::ValueOutOfRange { value: i32::MAX, row: 0, column: 1 })
        ));
    }

    #[test]
    fn test_overflowing_dimensions() {
        let data = b"P5\n4294967296 4294967296\n255\n";
        assert!(matches!(read(&data[..]), Err(Error::InvalidImageHeader(_))));

        let data = b"P5\n18446744073709551615 1\n255\n";
        assert!(matches!(read(&data[..]), Err(Error::InvalidImageHeader(_))));
    }

    #[test]
    fn test_oversized_ascii_header() {
        let data = b"P2\n100000 100000\n255\n1 2 3\n";
        assert!(matches!(read(&data[..]), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(read(&b"P6\n1 1\n255\n"[..]), Err(Error::UnsupportedImageFormat(_))));
        assert!(matches!(read(&b"P5\n1 1\n65535\n"[..]), Err(Error::UnsupportedImageFormat(_))));
        assert!(matches!(read(&b"P5\nx 1\n255\n"[..]), Err(Error::InvalidImageHeader(_))));
    }

    #[test]
    fn test_truncated_raster() {
        let data = b"P5\n4 4\n255\n\x00\x01";
        assert!(matches!(read(&data[..]), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_write_read_round_trip() {
        let image = Image::from_rows(&[[0, 50, 100, 150], [200, 250, 255, 1]]).unwrap();
        let mut bytes = Vec::new();
        write(&image, &mut bytes).unwrap();
        assert!(bytes.starts_with(b"P5\n4 2\n255\n"));
        assert_eq!(read(bytes.as_slice()).unwrap(), image);
    }

    #[test]
    fn test_write_rejects_out_of_range() {
        let image = Image::from_rows(&[[0, 256]]).unwrap();
        assert!(write(&image, Vec::new()).is_err());
    }
}
