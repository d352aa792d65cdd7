//! Dense row-major matrix arithmetic for small least-squares systems.
//!
//! The adjustment pipeline builds tall design matrices (two rows per
//! control point, six columns), reduces them to 6x6 normal equations and
//! inverts those by Gauss-Jordan elimination with partial pivoting. The
//! [`Mat`] type here covers exactly that workload: plain `f64` storage,
//! allocating operations that never mutate their inputs, and singular
//! systems reported as errors instead of garbage values.

use std::ops::{Index, IndexMut};

use thiserror::Error;

/// Pivot magnitude below which a column is treated as numerically zero
/// during Gauss-Jordan elimination.
pub const PIVOT_EPSILON: f64 = 1e-10;

/// Error types for matrix operations.
#[derive(Debug, Error, PartialEq)]
pub enum MatError {
    /// Matrix constructed with a zero row or column count.
    #[error("matrix dimensions must be non-zero, got {rows}x{cols}")]
    InvalidShape {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        cols: usize,
    },

    /// Matrix shape does not match the provided data.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Number of elements the shape requires.
        expected: usize,
        /// Actual number of elements in the data.
        actual: usize,
    },

    /// Inner dimensions are incompatible for a matrix product.
    #[error("dimension mismatch: cannot multiply {lhs_rows}x{lhs_cols} by {rhs_rows}x{rhs_cols}")]
    DimensionMismatch {
        /// Rows of the left-hand matrix.
        lhs_rows: usize,
        /// Columns of the left-hand matrix.
        lhs_cols: usize,
        /// Rows of the right-hand matrix.
        rhs_rows: usize,
        /// Columns of the right-hand matrix.
        rhs_cols: usize,
    },

    /// Operation requires a square matrix.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// No usable pivot was found during elimination.
    #[error("matrix is singular to working precision")]
    Singular,
}

/// Dense row-major matrix of `f64` values.
///
/// The backing buffer always holds exactly `rows * cols` elements, with
/// element `(i, j)` stored at offset `i * cols + j`. Matrices are plain
/// values: operations allocate fresh outputs and leave their inputs
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Mat {
    /// Creates a matrix of the given shape with every element set to zero.
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of rows, must be non-zero.
    /// * `cols` - Number of columns, must be non-zero.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, MatError> {
        if rows == 0 || cols == 0 {
            return Err(MatError::InvalidShape { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        })
    }

    /// Creates a matrix of the given shape from row-major data.
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of rows, must be non-zero.
    /// * `cols` - Number of columns, must be non-zero.
    /// * `data` - Row-major elements, must hold `rows * cols` values.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, MatError> {
        if rows == 0 || cols == 0 {
            return Err(MatError::InvalidShape { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(MatError::ShapeMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates the `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self, MatError> {
        let mut mat = Self::zeros(n, n)?;
        for i in 0..n {
            mat.data[i * n + i] = 1.0;
        }
        Ok(mat)
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the element at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Returns the row-major elements as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the transpose as a new matrix.
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Computes the matrix product `self * rhs`.
    ///
    /// # Arguments
    ///
    /// * `rhs` - Right-hand matrix, its row count must equal `self.cols()`.
    ///
    /// # Returns
    ///
    /// A new `self.rows() x rhs.cols()` matrix.
    pub fn matmul(&self, rhs: &Self) -> Result<Self, MatError> {
        if self.cols != rhs.rows {
            return Err(MatError::DimensionMismatch {
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: rhs.rows,
                rhs_cols: rhs.cols,
            });
        }
        let mut out = Self::zeros(self.rows, rhs.cols)?;
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut acc = 0.0;
                for k in 0..self.cols {
                    acc += self.data[i * self.cols + k] * rhs.data[k * rhs.cols + j];
                }
                out.data[i * rhs.cols + j] = acc;
            }
        }
        Ok(out)
    }

    /// Computes the inverse by Gauss-Jordan elimination with partial
    /// pivoting.
    ///
    /// The elimination runs on a working copy augmented with an identity
    /// matrix. When a diagonal pivot falls below [`PIVOT_EPSILON`] in
    /// magnitude, the rows below are scanned in order and the first one
    /// with a usable entry in that column is swapped in, so identical
    /// inputs always take identical elimination paths.
    ///
    /// # Returns
    ///
    /// A new matrix holding the inverse.
    ///
    /// # Errors
    ///
    /// Fails with [`MatError::NotSquare`] for rectangular inputs and with
    /// [`MatError::Singular`] when no usable pivot exists for some column.
    pub fn inverse(&self) -> Result<Self, MatError> {
        if self.rows != self.cols {
            return Err(MatError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let n = self.rows;
        let mut work = self.clone();
        let mut inv = Self::identity(n)?;

        for i in 0..n {
            // swap in the first lower row with a usable pivot
            if work.data[i * n + i].abs() < PIVOT_EPSILON {
                let swap = (i + 1..n)
                    .find(|&k| work.data[k * n + i].abs() > PIVOT_EPSILON)
                    .ok_or(MatError::Singular)?;
                work.swap_rows(i, swap);
                inv.swap_rows(i, swap);
            }

            // normalize the pivot row
            let pivot = work.data[i * n + i];
            for j in 0..n {
                work.data[i * n + j] /= pivot;
                inv.data[i * n + j] /= pivot;
            }

            // eliminate the pivot column from every other row
            for k in 0..n {
                if k == i {
                    continue;
                }
                let factor = work.data[k * n + i];
                for j in 0..n {
                    work.data[k * n + j] -= factor * work.data[i * n + j];
                    inv.data[k * n + j] -= factor * inv.data[i * n + j];
                }
            }
        }

        Ok(inv)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}
