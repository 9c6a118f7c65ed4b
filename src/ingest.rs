/*
 * SPDX-FileCopyrightText: 2026 The sparse-heatmap developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Reading sparse matrices from text files.
//!
//! The input format is a list of lines `<row> <col> <value>`, with fields
//! separated by whitespace. All three fields are parsed as floating-point
//! numbers; row and column are then truncated toward zero and used as
//! indices. Lines containing only whitespace are ignored. There is no header,
//! no comment syntax, and no explicit dimension line: the dimensions of the
//! matrix are the largest indices that appear in the file.
//!
//! [`write_entries`] produces the same format from a dense matrix, one line
//! per cell in row-major order.

use crate::matrix::{Dimensions, MatrixError};
use anyhow::{Context, Result};
use dsi_progress_logger::prelude::*;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::num::ParseFloatError;
use std::path::Path;

/// Which index of an entry, row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Row,
    Column,
}

impl Display for IndexKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Row => f.write_str("row"),
            IndexKind::Column => f.write_str("column"),
        }
    }
}

/// An error occurring while parsing a sparse-matrix text file.
///
/// Line numbers are 1-based.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("line {line}: expected 3 whitespace-separated fields (row, column, value), got {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: cannot parse {token:?} as a number")]
    InvalidNumber {
        line: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },
    /// The index is negative, infinite, NaN, or too large for a `usize`.
    #[error("line {line}: {value} is not a valid {kind} index")]
    InvalidIndex { line: usize, kind: IndexKind, value: f64 },
    #[error("line {line}: could not read line")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// A single cell of a sparse matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl Entry {
    pub fn new(row: usize, col: usize, value: f64) -> Self {
        Self { row, col, value }
    }
}

/// The entries of a sparse matrix in input order, together with the
/// [dimensions](Dimensions) they imply.
///
/// The dimensions are updated on every [push](SparseEntries::push), so they
/// always cover all entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseEntries {
    entries: Vec<Entry>,
    dims: Dimensions,
}

impl SparseEntries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        self.dims.cover(entry.row, entry.col);
        self.entries.push(entry);
    }

    /// Returns the entries in input order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the largest row and column indices seen so far.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materializes the entries into a dense matrix of the inferred
    /// dimensions.
    pub fn to_dense(&self) -> Result<Array2<f64>, MatrixError> {
        crate::matrix::materialize(&self.entries, self.dims)
    }
}

impl Extend<Entry> for SparseEntries {
    fn extend<T: IntoIterator<Item = Entry>>(&mut self, iter: T) {
        for entry in iter {
            self.push(entry);
        }
    }
}

impl FromIterator<Entry> for SparseEntries {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        let mut entries = Self::new();
        entries.extend(iter);
        entries
    }
}

fn parse_number(line: usize, token: &str) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .map_err(|source| ParseError::InvalidNumber {
            line,
            token: token.to_owned(),
            source,
        })
}

fn to_index(line: usize, kind: IndexKind, value: f64) -> Result<usize, ParseError> {
    let truncated = value.trunc();
    // -0.0 passes, as truncation of values in (-1, 0) should
    if !truncated.is_finite() || truncated < 0.0 || truncated >= usize::MAX as f64 {
        return Err(ParseError::InvalidIndex { line, kind, value });
    }
    Ok(truncated as usize)
}

/// Parses a single line of input.
///
/// Returns `Ok(None)` if the line contains only whitespace. The `line`
/// argument is the 1-based line number, used only for error reporting.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Entry>, ParseError> {
    let fields = text.split_whitespace().collect::<Vec<_>>();
    match fields.as_slice() {
        [] => Ok(None),
        [row, col, value] => {
            let row = parse_number(line, row)?;
            let col = parse_number(line, col)?;
            let value = parse_number(line, value)?;
            Ok(Some(Entry {
                row: to_index(line, IndexKind::Row, row)?,
                col: to_index(line, IndexKind::Column, col)?,
                value,
            }))
        }
        _ => Err(ParseError::FieldCount {
            line,
            found: fields.len(),
        }),
    }
}

/// Parses all entries from a reader.
///
/// Parsing stops at the first malformed line.
pub fn parse_entries(reader: impl BufRead) -> Result<SparseEntries, ParseError> {
    let mut entries = SparseEntries::new();

    let mut pl = ProgressLogger::default();
    pl.display_memory(false).item_name("lines");
    pl.start("Reading sparse entries...");

    for (line_idx, text) in reader.lines().enumerate() {
        let line = line_idx + 1;
        let text = text.map_err(|source| ParseError::Io { line, source })?;
        if let Some(entry) = parse_line(line, &text)? {
            entries.push(entry);
        }
        pl.light_update();
    }

    pl.done();
    Ok(entries)
}

/// Reads all entries from the file at the given path.
///
/// The file is closed when this function returns, whether or not parsing
/// succeeded.
pub fn read_entries(path: impl AsRef<Path>) -> Result<SparseEntries> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Could not open input file {}", path.display()))?;
    let entries = parse_entries(BufReader::new(file))
        .with_context(|| format!("Could not parse input file {}", path.display()))?;

    if entries.is_empty() {
        log::warn!(
            "No entries in {}: the matrix will be a single zero cell",
            path.display()
        );
    } else {
        let dims = entries.dims();
        log::info!(
            "Read {} entries from {} (max row {}, max column {})",
            entries.len(),
            path.display(),
            dims.max_row,
            dims.max_col
        );
    }
    Ok(entries)
}

/// Writes every cell of `matrix`, zeros included, as a `<row> <col> <value>`
/// line, in row-major order.
///
/// Values use the shortest representation that parses back to the same
/// `f64`, so reading the output yields the original matrix.
pub fn write_entries<S>(
    matrix: &ArrayBase<S, Ix2>,
    mut writer: impl Write,
) -> std::io::Result<()>
where
    S: Data<Elem = f64>,
{
    let mut pl = ProgressLogger::default();
    pl.display_memory(false)
        .item_name("cells")
        .expected_updates(Some(matrix.len()));
    pl.start("Writing dense entries...");

    for ((row, col), value) in matrix.indexed_iter() {
        writeln!(writer, "{} {} {}", row, col, value)?;
        pl.light_update();
    }

    pl.done();
    writer.flush()
}

/// Writes `matrix` to the file at the given path with [`write_entries`].
pub fn save_entries<S>(matrix: &ArrayBase<S, Ix2>, path: impl AsRef<Path>) -> Result<()>
where
    S: Data<Elem = f64>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Could not create output file {}", path.display()))?;
    write_entries(matrix, BufWriter::new(file))
        .with_context(|| format!("Could not write output file {}", path.display()))?;
    log::info!("Wrote {} entries to {}", matrix.len(), path.display());
    Ok(())
}
