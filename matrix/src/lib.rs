#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generic two-dimensional matrix container.
//!
//! [`Matrix`] stores a rectangle of elements in row-major order and exposes
//! bounds-checked access, row and column insertion or removal, square window
//! extraction with an out-of-range fill value, and construction from
//! delimited text. Every fallible operation reports a [`MatrixError`] and
//! leaves the matrix unchanged on failure.

mod error;
mod load;
mod matrix;
mod window;

pub use error::{Axis, MatrixError, Result};
pub use load::{Element, FLAT_SEPARATOR, NULL_SEPARATOR};
pub use matrix::Matrix;
