//! Errors for grid mutations that do not match the grid's shape.

use thiserror::Error;

/// A grid update the editor should never have sent.
///
/// Callers log these and skip the update; none of them is fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("row {row} out of range for {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("columns {start}..{end} out of range for {cols} columns")]
    ColumnOutOfRange { start: usize, end: usize, cols: usize },

    #[error("scroll region rows {top}..{bottom} cols {left}..{right} invalid for a {rows}x{cols} grid")]
    InvalidRegion {
        top: usize,
        bottom: usize,
        left: usize,
        right: usize,
        rows: usize,
        cols: usize,
    },

    #[error("malformed line update: {0}")]
    MalformedLine(String),

    #[error("grid is not defined (size {rows}x{cols})")]
    Undefined { rows: usize, cols: usize },
}
