//! Square neighbourhood extraction around a cell.

use crate::{
    error::{MatrixError, Result},
    matrix::Matrix,
};

impl<T: Clone> Matrix<T> {
    /// Cuts a `width x width` window centred on `(row, col)`.
    ///
    /// Output cell `(i, j)` reads source cell
    /// `(row - (width - 1) / 2 + i, col - (width - 1) / 2 + j)`. Source
    /// coordinates that fall outside the matrix produce `fill` instead, so the
    /// centre may sit on an edge or even outside the matrix.
    ///
    /// A width of one returns the centre element alone and ignores `fill`; the
    /// centre must then be in range. Any other width must be odd and no larger
    /// than the smaller matrix dimension.
    pub fn cut_window(&self, row: usize, col: usize, width: usize, fill: T) -> Result<Self> {
        if width == 1 {
            let centre = self.get(row, col)?.clone();
            return Self::filled(1, 1, centre);
        }

        let limit = self.rows.min(self.cols);
        if width == 0 || width % 2 == 0 || width > limit {
            return Err(MatrixError::InvalidWindow { width, limit });
        }

        let reach = (width - 1) / 2;
        let mut data = Vec::with_capacity(width * width);
        for i in 0..width {
            let source_row = shift(row, i, reach).filter(|&r| r < self.rows);
            for j in 0..width {
                let source_col = shift(col, j, reach).filter(|&c| c < self.cols);
                let value = match (source_row, source_col) {
                    (Some(r), Some(c)) => self.data[self.offset(r, c)].clone(),
                    _ => fill.clone(),
                };
                data.push(value);
            }
        }

        Ok(Self {
            data,
            rows: width,
            cols: width,
        })
    }

    /// [`Matrix::cut_window`] filling out-of-range cells with `T::default()`.
    pub fn cut_window_default(&self, row: usize, col: usize, width: usize) -> Result<Self>
    where
        T: Default,
    {
        self.cut_window(row, col, width, T::default())
    }
}

/// `centre + step - reach`, or `None` when the result would be negative.
fn shift(centre: usize, step: usize, reach: usize) -> Option<usize> {
    centre.checked_add(step)?.checked_sub(reach)
}
