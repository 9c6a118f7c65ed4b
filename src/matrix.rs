/*
 * SPDX-FileCopyrightText: 2026 The sparse-heatmap developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Dense materialization of sparse entries.

use crate::ingest::Entry;
use ndarray::{Array2, ArrayBase, Data, Ix2, Zip};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Entry ({row}, {col}) is outside a matrix with max row {max_row} and max column {max_col}")]
    OutOfBounds {
        row: usize,
        col: usize,
        max_row: usize,
        max_col: usize,
    },
    #[error("A matrix with max row {max_row} and max column {max_col} is too large")]
    TooLarge { max_row: usize, max_col: usize },
    #[error("Cannot compare a {left:?} matrix with a {right:?} matrix")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

/// The largest row and column indices of a matrix.
///
/// The corresponding dense matrix has `max_row + 1` rows and `max_col + 1`
/// columns, so the default value describes a 1×1 matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub max_row: usize,
    pub max_col: usize,
}

impl Dimensions {
    pub fn new(max_row: usize, max_col: usize) -> Self {
        Self { max_row, max_col }
    }

    /// Grows the dimensions, if necessary, so that they contain the given
    /// cell.
    pub fn cover(&mut self, row: usize, col: usize) {
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row <= self.max_row && col <= self.max_col
    }

    /// Returns the shape `(rows, columns)` of the dense matrix.
    ///
    /// Fails if the size in bytes of the matrix does not fit in an `isize`.
    pub fn shape(&self) -> Result<(usize, usize), MatrixError> {
        let too_large = MatrixError::TooLarge {
            max_row: self.max_row,
            max_col: self.max_col,
        };
        let rows = self.max_row.checked_add(1).ok_or(too_large.clone())?;
        let cols = self.max_col.checked_add(1).ok_or(too_large.clone())?;
        rows.checked_mul(cols)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()))
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or(too_large)?;
        Ok((rows, cols))
    }
}

/// Builds a zero-initialized dense matrix and writes each entry at its
/// coordinates.
///
/// Entries are written in order, so for duplicate coordinates the last entry
/// wins. All entries are checked against `dims` before anything is
/// allocated.
pub fn materialize(entries: &[Entry], dims: Dimensions) -> Result<Array2<f64>, MatrixError> {
    if let Some(entry) = entries.iter().find(|e| !dims.contains(e.row, e.col)) {
        return Err(MatrixError::OutOfBounds {
            row: entry.row,
            col: entry.col,
            max_row: dims.max_row,
            max_col: dims.max_col,
        });
    }

    let mut matrix = Array2::<f64>::zeros(dims.shape()?);
    for entry in entries {
        matrix[[entry.row, entry.col]] = entry.value;
    }
    log::debug!(
        "Materialized {} entries into a {}x{} matrix",
        entries.len(),
        matrix.nrows(),
        matrix.ncols()
    );
    Ok(matrix)
}

/// Returns the coordinates, in row-major order, of the cells at which `left`
/// and `right` differ by more than `tolerance`.
///
/// A NaN cell always differs. Matrices of different shapes cannot be
/// compared.
pub fn mismatches<S, T>(
    left: &ArrayBase<S, Ix2>,
    right: &ArrayBase<T, Ix2>,
    tolerance: f64,
) -> Result<Vec<(usize, usize)>, MatrixError>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    if left.dim() != right.dim() {
        return Err(MatrixError::ShapeMismatch {
            left: left.dim(),
            right: right.dim(),
        });
    }
    let mut cells = Vec::new();
    Zip::indexed(left).and(right).for_each(|(row, col), &a, &b| {
        let diff = (a - b).abs();
        if diff.is_nan() || diff > tolerance {
            log::debug!("({}, {}): {} != {}", row, col, a, b);
            cells.push((row, col));
        }
    });
    Ok(cells)
}
