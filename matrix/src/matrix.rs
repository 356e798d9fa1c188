use std::{fmt, ops::Range};

use ndarray::{prelude::*, s};

use crate::{MatrixErr, Result};

/// The scalar type every matrix in the system holds.
pub type Elem = i64;

/// A dense, row-major matrix of `Elem`.
///
/// The inner array is always kept in standard (C) layout so the elements can be
/// handed to the wire as a single contiguous slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    inner: Array2<Elem>,
}

impl Matrix {
    /// Creates a new `Matrix` from its row-major elements.
    ///
    /// # Arguments
    /// * `rows` - The amount of rows.
    /// * `cols` - The amount of columns.
    /// * `data` - The elements, row after row.
    ///
    /// # Returns
    /// The matrix or an error if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<Elem>) -> Result<Self> {
        let inner = Array2::from_shape_vec((rows, cols), data)?;
        Ok(Self { inner })
    }

    /// Builds a matrix out of nested rows, mostly useful for literals.
    ///
    /// # Returns
    /// The matrix or an error if the rows are ragged.
    pub fn from_rows<R: AsRef<[Elem]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or_default();
        let mut data = Vec::with_capacity(rows.len() * cols);

        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MatrixErr::DimensionMismatch {
                    op: "from_rows",
                    left: (1, cols),
                    right: (1, row.len()),
                });
            }

            data.extend_from_slice(row);
        }

        Self::new(rows.len(), cols, data)
    }

    /// Wraps an already built array, normalizing it to standard layout.
    pub fn from_array(array: Array2<Elem>) -> Self {
        let inner = if array.is_standard_layout() {
            array
        } else {
            array.as_standard_layout().into_owned()
        };

        Self { inner }
    }

    pub fn rows(&self) -> usize {
        self.inner.nrows()
    }

    pub fn cols(&self) -> usize {
        self.inner.ncols()
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.inner.dim()
    }

    pub fn view(&self) -> ArrayView2<'_, Elem> {
        self.inner.view()
    }

    /// The row-major elements as one contiguous slice, if the layout allows it.
    pub fn as_slice(&self) -> Option<&[Elem]> {
        self.inner.as_slice()
    }

    /// Copies the rows in `range` into a new matrix.
    ///
    /// # Returns
    /// The sliced matrix or an error if `range` falls outside of this matrix.
    pub fn slice_rows(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.rows() {
            return Err(MatrixErr::DimensionMismatch {
                op: "slice_rows",
                left: self.shape(),
                right: (range.end.saturating_sub(range.start), self.cols()),
            });
        }

        let rows = self.inner.slice(s![range, ..]).to_owned();
        Ok(Self::from_array(rows))
    }

    /// Counts the elements that differ between `self` and `other`.
    ///
    /// # Returns
    /// The count or an error if the shapes differ.
    pub fn mismatches(&self, other: &Self) -> Result<usize> {
        self.same_shape("mismatches", other)?;

        let count = self
            .inner
            .iter()
            .zip(other.inner.iter())
            .filter(|(a, b)| a != b)
            .count();

        Ok(count)
    }

    /// Computes the Frobenius norm of `self - other`.
    ///
    /// The subtraction is carried out in `f64` so extreme values can't overflow.
    pub fn diff_norm(&self, other: &Self) -> Result<f64> {
        self.same_shape("diff_norm", other)?;

        let sum: f64 = self
            .inner
            .iter()
            .zip(other.inner.iter())
            .map(|(&a, &b)| {
                let d = a as f64 - b as f64;
                d * d
            })
            .sum();

        Ok(sum.sqrt())
    }

    fn same_shape(&self, op: &'static str, other: &Self) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(MatrixErr::DimensionMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}
