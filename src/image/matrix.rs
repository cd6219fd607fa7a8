use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// Row-major matrix of integer pixel intensities.
///
/// Values are stored as `i32` so that out-of-range input can be represented
/// and rejected instead of being wrapped or clamped on the way in.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    data: Vec<i32>,
}

/// A full image
pub type Image = Matrix;

/// One quantization unit cut from an image
pub type Block = Matrix;

impl Matrix {
    /// Zero-filled matrix
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns, data: vec![0; rows * columns] }
    }

    /// Wrap row-major data, which must hold exactly `rows * columns` values
    pub fn from_vec(rows: usize, columns: usize, data: Vec<i32>) -> Result<Self> {
        if data.len() != rows * columns {
            return Err(Error::DimensionMismatch {
                expected_rows: rows,
                expected_columns: columns,
                found_rows: 1,
                found_columns: data.len(),
            });
        }
        Ok(Self { rows, columns, data })
    }

    /// Build from 8-bit pixels
    pub fn from_pixels(rows: usize, columns: usize, pixels: &[u8]) -> Result<Self> {
        Self::from_vec(rows, columns, pixels.iter().map(|&p| p as i32).collect())
    }

    /// Build from nested rows; all rows must have the same length
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * columns);
        for row in rows {
            let row = row.as_ref();
            if row.len() != columns {
                return Err(Error::DimensionMismatch {
                    expected_rows: rows.len(),
                    expected_columns: columns,
                    found_rows: rows.len(),
                    found_columns: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { rows: rows.len(), columns, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// (rows, columns)
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major values
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.data
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.columns..(row + 1) * self.columns]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [i32] {
        &mut self.data[row * self.columns..(row + 1) * self.columns]
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.data
    }

    /// Fail with `DimensionMismatch` unless `other` has the same shape
    pub fn check_same_dims(&self, other: &Matrix) -> Result<()> {
        if self.dims() != other.dims() {
            return Err(Error::DimensionMismatch {
                expected_rows: self.rows,
                expected_columns: self.columns,
                found_rows: other.rows,
                found_columns: other.columns,
            });
        }
        Ok(())
    }

    /// Fail with `ValueOutOfRange` at the first value outside [0, 255]
    pub fn check_pixel_range(&self) -> Result<()> {
        check_pixels(&self.data, self.columns.max(1))
    }

    /// Convert to 8-bit pixels, rejecting values outside [0, 255]
    pub fn to_pixels(&self) -> Result<Vec<u8>> {
        self.check_pixel_range()?;
        Ok(self.data.iter().map(|&v| v as u8).collect())
    }
}

/// Check row-major values of a matrix `columns` wide against [0, 255]
pub(crate) fn check_pixels(values: &[i32], columns: usize) -> Result<()> {
    match values.iter().position(|v| !(0..=255).contains(v)) {
        Some(i) => {
            Err(Error::ValueOutOfRange { value: values[i], row: i / columns, column: i % columns })
        }
        None => Ok(()),
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = i32;

    fn index(&self, (row, column): (usize, usize)) -> &i32 {
        debug_assert!(column < self.columns, "column {} out of bounds", column);
        &self.data[row * self.columns + column]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut i32 {
        debug_assert!(column < self.columns, "column {} out of bounds", column);
        &mut self.data[row * self.columns + column]
    }
}
