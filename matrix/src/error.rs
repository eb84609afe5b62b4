//! Failure kinds raised by matrix construction and access.

use std::{fmt, io};

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Matrix axis named in out-of-range reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Vertical axis, indexed by row.
    Row,
    /// Horizontal axis, indexed by column.
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
        }
    }
}

/// Errors that abort a matrix operation.
///
/// None of these leave a partially mutated matrix behind.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// A requested or resulting row or column count is zero, or the shape
    /// holds more elements than can be stored.
    #[error("matrix dimensions {rows}x{cols} are invalid; both must be at least 1 and their storage must be addressable")]
    InvalidDimensions {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        cols: usize,
    },
    /// Supplied data does not fit the matrix shape.
    #[error("expected {expected} elements but found {actual}")]
    DimensionMismatch {
        /// Number of elements the shape requires.
        expected: usize,
        /// Number of elements supplied.
        actual: usize,
    },
    /// A coordinate lies beyond the current bounds.
    #[error("{axis} index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// Axis on which the coordinate overflowed.
        axis: Axis,
        /// Offending index.
        index: usize,
        /// Current length of the axis.
        len: usize,
    },
    /// The window width is zero, even, or wider than the matrix allows.
    #[error("window width {width} must be odd and at most {limit}")]
    InvalidWindow {
        /// Requested window width.
        width: usize,
        /// Smaller of the two source dimensions.
        limit: usize,
    },
    /// The text source could not be read.
    #[error("failed to read matrix source: {0}")]
    Io(#[from] io::Error),
    /// A text token could not be converted to the element type.
    #[error("line {line}: cannot parse token `{token}`: {reason}")]
    Parse {
        /// One-based line number of the token.
        line: usize,
        /// Raw token text.
        token: String,
        /// Parser message.
        reason: String,
    },
}
