//! Dense row-major matrix storage with bounds-checked access.

use std::{
    mem,
    ops::{Index, IndexMut},
};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{Axis, MatrixError, Result};

/// Rectangular container of elements stored in row-major order.
///
/// A matrix always holds at least one row and one column, and every row has
/// the same length. Both properties are checked on construction and kept by
/// every mutation; a failed mutation leaves the matrix untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<T>>", into = "Vec<Vec<T>>")]
#[serde(bound(
    serialize = "T: Clone + Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct Matrix<T> {
    pub(crate) data: Vec<T>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl<T> Matrix<T> {
    /// Builds a matrix from explicit rows.
    ///
    /// Every row must have the length of the first one. Degenerate `1xN` and
    /// `Nx1` inputs are accepted.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some(ragged) = rows.iter().find(|row| row.len() != n_cols) {
            return Err(MatrixError::DimensionMismatch {
                expected: n_cols,
                actual: ragged.len(),
            });
        }
        ensure_dimensions(n_rows, n_cols)?;

        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            rows: n_rows,
            cols: n_cols,
        })
    }

    /// Unpacks a row-major flat sequence into a `rows x cols` matrix.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let len = element_count::<T>(rows, cols)?;
        if data.len() != len {
            return Err(MatrixError::DimensionMismatch {
                expected: len,
                actual: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Creates a `rows x cols` matrix of default values.
    pub fn new(rows: usize, cols: usize) -> Result<Self>
    where
        T: Default,
    {
        let len = element_count::<T>(rows, cols)?;
        let data = std::iter::repeat_with(T::default).take(len).collect();
        Ok(Self { data, rows, cols })
    }

    /// Creates a `rows x cols` matrix with every element set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        let len = element_count::<T>(rows, cols)?;
        Ok(Self {
            data: vec![value; len],
            rows,
            cols,
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.cols
    }

    /// Dimensions as `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Reports whether the matrix has as many rows as columns.
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Elements in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterates over every element in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterates over the rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.cols)
    }

    /// Copies the contents out as a vector of rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        self.iter_rows().map(<[T]>::to_vec).collect()
    }

    /// Element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<&T> {
        let offset = self.checked_offset(row, col)?;
        Ok(&self.data[offset])
    }

    /// Mutable element at `(row, col)`.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let offset = self.checked_offset(row, col)?;
        Ok(&mut self.data[offset])
    }

    /// Overwrites the element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        *self.get_mut(row, col)? = value;
        Ok(())
    }

    /// Row `index` as a slice.
    pub fn row(&self, index: usize) -> Result<&[T]> {
        check_index(Axis::Row, index, self.rows)?;
        let start = index * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    /// Copy of column `index`, read top to bottom.
    pub fn column(&self, index: usize) -> Result<Vec<T>>
    where
        T: Clone,
    {
        check_index(Axis::Column, index, self.cols)?;
        Ok(self
            .iter_rows()
            .map(|row| row[index].clone())
            .collect())
    }

    /// Counts the elements equal to `value`.
    #[must_use]
    pub fn count_elements(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.data.iter().filter(|element| *element == value).count()
    }

    /// Inserts `row` so that it becomes row `index`; later rows shift down.
    ///
    /// `index` may equal the row count to append.
    pub fn insert_row(&mut self, index: usize, row: Vec<T>) -> Result<()> {
        if row.len() != self.cols {
            return Err(MatrixError::DimensionMismatch {
                expected: self.cols,
                actual: row.len(),
            });
        }
        check_insertion(Axis::Row, index, self.rows)?;

        let tail = self.data.split_off(index * self.cols);
        self.data.extend(row);
        self.data.extend(tail);
        self.rows += 1;
        trace!("inserted row {index}, matrix is now {}x{}", self.rows, self.cols);
        Ok(())
    }

    /// Inserts `column` so that it becomes column `index`; later columns shift right.
    ///
    /// `index` may equal the column count to append.
    pub fn insert_column(&mut self, index: usize, column: Vec<T>) -> Result<()> {
        if column.len() != self.rows {
            return Err(MatrixError::DimensionMismatch {
                expected: self.rows,
                actual: column.len(),
            });
        }
        check_insertion(Axis::Column, index, self.cols)?;

        let mut data = Vec::with_capacity(self.data.len() + self.rows);
        let mut cells = mem::take(&mut self.data).into_iter();
        for value in column {
            data.extend(cells.by_ref().take(index));
            data.push(value);
            data.extend(cells.by_ref().take(self.cols - index));
        }
        self.data = data;
        self.cols += 1;
        trace!("inserted column {index}, matrix is now {}x{}", self.rows, self.cols);
        Ok(())
    }

    /// Removes row `index` and returns its elements; later rows shift up.
    ///
    /// The last remaining row cannot be removed.
    pub fn remove_row(&mut self, index: usize) -> Result<Vec<T>> {
        check_index(Axis::Row, index, self.rows)?;
        ensure_dimensions(self.rows - 1, self.cols)?;

        let start = index * self.cols;
        let removed = self.data.drain(start..start + self.cols).collect();
        self.rows -= 1;
        trace!("removed row {index}, matrix is now {}x{}", self.rows, self.cols);
        Ok(removed)
    }

    /// Removes column `index` and returns its elements; later columns shift left.
    ///
    /// The last remaining column cannot be removed.
    pub fn remove_column(&mut self, index: usize) -> Result<Vec<T>> {
        check_index(Axis::Column, index, self.cols)?;
        ensure_dimensions(self.rows, self.cols - 1)?;

        let cols = self.cols;
        let mut removed = Vec::with_capacity(self.rows);
        let mut kept = Vec::with_capacity(self.data.len() - self.rows);
        for (offset, value) in mem::take(&mut self.data).into_iter().enumerate() {
            if offset % cols == index {
                removed.push(value);
            } else {
                kept.push(value);
            }
        }
        self.data = kept;
        self.cols -= 1;
        trace!("removed column {index}, matrix is now {}x{}", self.rows, self.cols);
        Ok(removed)
    }

    /// Appends `times` copies of the current columns to the right, keeping
    /// their order (`|ABC|` becomes `|ABC|ABC|...|`).
    ///
    /// Fails with [`MatrixError::InvalidDimensions`] when the widened shape
    /// cannot be addressed; the column count is then reported as `usize::MAX`
    /// if the width itself overflows.
    pub fn propagate_horizontally(&mut self, times: usize) -> Result<()>
    where
        T: Clone,
    {
        if times == 0 {
            return Ok(());
        }
        let cols = times
            .checked_add(1)
            .and_then(|copies| self.cols.checked_mul(copies))
            .ok_or(MatrixError::InvalidDimensions {
                rows: self.rows,
                cols: usize::MAX,
            })?;
        let len = element_count::<T>(self.rows, cols)?;

        let copies = cols / self.cols;
        let mut data = Vec::with_capacity(len);
        for row in self.data.chunks_exact(self.cols) {
            for _ in 0..copies {
                data.extend_from_slice(row);
            }
        }
        self.data = data;
        self.cols = cols;
        trace!("propagated columns {times} times, matrix is now {}x{}", self.rows, self.cols);
        Ok(())
    }

    #[inline]
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn checked_offset(&self, row: usize, col: usize) -> Result<usize> {
        check_index(Axis::Row, row, self.rows)?;
        check_index(Axis::Column, col, self.cols)?;
        Ok(self.offset(row, col))
    }
}

impl<T> TryFrom<Vec<Vec<T>>> for Matrix<T> {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<T>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl<T: Clone> From<Matrix<T>> for Vec<Vec<T>> {
    fn from(matrix: Matrix<T>) -> Self {
        matrix.to_rows()
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.get(row, col) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        match self.get_mut(row, col) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

fn ensure_dimensions(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(MatrixError::InvalidDimensions { rows, cols });
    }
    Ok(())
}

/// Element count of a `rows x cols` matrix of `T`, rejecting empty shapes and
/// shapes whose storage could not be allocated.
pub(crate) fn element_count<T>(rows: usize, cols: usize) -> Result<usize> {
    ensure_dimensions(rows, cols)?;
    rows.checked_mul(cols)
        .filter(|&len| {
            len.checked_mul(mem::size_of::<T>().max(1))
                .map_or(false, |bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(MatrixError::InvalidDimensions { rows, cols })
}

fn check_index(axis: Axis, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(MatrixError::IndexOutOfRange { axis, index, len });
    }
    Ok(())
}

fn check_insertion(axis: Axis, index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(MatrixError::IndexOutOfRange { axis, index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix<i32> {
        Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).expect("rectangular rows")
    }

    fn assert_rows_consistent<T>(matrix: &Matrix<T>) {
        assert_eq!(matrix.as_slice().len(), matrix.n_rows() * matrix.n_cols());
        for row in matrix.iter_rows() {
            assert_eq!(row.len(), matrix.n_cols());
        }
    }

    #[test]
    fn from_rows_reports_shape() {
        let matrix = sample();
        assert_eq!(matrix.shape(), (2, 3));
        assert!(!matrix.is_square());
        assert_eq!(matrix[(0, 0)], 1);
        assert_eq!(matrix[(1, 2)], 6);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let error = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5]]).unwrap_err();
        assert!(matches!(
            error,
            MatrixError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        let error = Matrix::<i32>::from_rows(Vec::new()).unwrap_err();
        assert!(matches!(error, MatrixError::InvalidDimensions { rows: 0, .. }));

        let error = Matrix::<i32>::from_rows(vec![Vec::new(), Vec::new()]).unwrap_err();
        assert!(matches!(error, MatrixError::InvalidDimensions { cols: 0, .. }));
    }

    #[test]
    fn degenerate_shapes_are_accepted() {
        let row = Matrix::from_rows(vec![vec!['a', 'b', 'c']]).expect("single row");
        assert_eq!(row.shape(), (1, 3));
        let column = Matrix::from_rows(vec![vec![1.5], vec![2.5]]).expect("single column");
        assert_eq!(column.shape(), (2, 1));
    }

    #[test]
    fn new_uses_default_and_rejects_zero_dimensions() {
        let matrix = Matrix::<u8>::new(2, 2).expect("valid dimensions");
        assert_eq!(matrix.count_elements(&0), 4);
        assert!(matches!(
            Matrix::<u8>::new(0, 3),
            Err(MatrixError::InvalidDimensions { rows: 0, cols: 3 })
        ));
        assert!(matches!(
            Matrix::filled(3, 0, 'x'),
            Err(MatrixError::InvalidDimensions { rows: 3, cols: 0 })
        ));
    }

    #[test]
    fn from_flat_checks_length() {
        let matrix = Matrix::from_flat(2, 3, vec![1, 2, 3, 4, 5, 6]).expect("six elements");
        assert_eq!(matrix, sample());
        assert!(matches!(
            Matrix::from_flat(2, 2, vec![1, 2, 3]),
            Err(MatrixError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn access_out_of_range_names_axis() {
        let matrix = sample();
        assert!(matches!(
            matrix.get(2, 0),
            Err(MatrixError::IndexOutOfRange {
                axis: Axis::Row,
                index: 2,
                len: 2
            })
        ));
        assert!(matches!(
            matrix.get(0, 3),
            Err(MatrixError::IndexOutOfRange {
                axis: Axis::Column,
                index: 3,
                len: 3
            })
        ));
    }

    #[test]
    #[should_panic(expected = "row index 5 is out of range")]
    fn indexing_out_of_range_panics() {
        let matrix = sample();
        let value = matrix[(5, 0)];
        assert_eq!(value, 0);
    }

    #[test]
    fn set_writes_through() {
        let mut matrix = sample();
        matrix.set(0, 0, 9).expect("in range");
        matrix[(1, 1)] = 7;
        assert_eq!(matrix.to_rows(), vec![vec![9, 2, 3], vec![4, 7, 6]]);
    }

    #[test]
    fn row_and_column_are_bounds_checked() {
        let matrix = sample();
        assert_eq!(matrix.row(1).expect("row 1"), &[4, 5, 6]);
        assert_eq!(matrix.column(0).expect("column 0"), vec![1, 4]);
        assert!(matrix.row(2).is_err());
        assert!(matrix.column(3).is_err());
    }

    #[test]
    fn insert_row_shifts_later_rows_down() {
        let mut matrix = sample();
        matrix.insert_row(1, vec![7, 8, 9]).expect("valid row");
        assert_eq!(matrix.row(1).expect("inserted"), &[7, 8, 9]);
        assert_eq!(matrix.row(2).expect("shifted"), &[4, 5, 6]);
        assert!(matrix.is_square());
        assert_rows_consistent(&matrix);
    }

    #[test]
    fn insert_row_allows_append() {
        let mut matrix = sample();
        matrix.insert_row(2, vec![7, 8, 9]).expect("append");
        assert_eq!(matrix.row(2).expect("appended"), &[7, 8, 9]);
    }

    #[test]
    fn failed_insert_row_leaves_matrix_untouched() {
        let mut matrix = sample();
        assert!(matches!(
            matrix.insert_row(0, vec![1, 2]),
            Err(MatrixError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            matrix.insert_row(3, vec![1, 2, 3]),
            Err(MatrixError::IndexOutOfRange { axis: Axis::Row, .. })
        ));
        assert_eq!(matrix, sample());
    }

    #[test]
    fn insert_column_shifts_later_columns_right() {
        let mut matrix = sample();
        matrix.insert_row(1, vec![7, 8, 9]).expect("valid row");
        matrix.insert_column(2, vec![10, 11, 12]).expect("valid column");
        assert_eq!(
            matrix.to_rows(),
            vec![vec![1, 2, 10, 3], vec![7, 8, 11, 9], vec![4, 5, 12, 6]]
        );
        assert_rows_consistent(&matrix);
    }

    #[test]
    fn insert_column_rejects_bad_input() {
        let mut matrix = sample();
        assert!(matrix.insert_column(0, vec![1, 2, 3]).is_err());
        assert!(matrix.insert_column(4, vec![1, 2]).is_err());
        matrix.insert_column(3, vec![0, 0]).expect("append column");
        assert_eq!(matrix.column(3).expect("appended"), vec![0, 0]);
    }

    #[test]
    fn remove_row_and_column_reverse_insertion() {
        let mut matrix = sample();
        matrix.insert_row(1, vec![7, 8, 9]).expect("valid row");
        matrix.insert_column(0, vec![0, 0, 0]).expect("valid column");

        assert_eq!(matrix.remove_column(0).expect("column 0"), vec![0, 0, 0]);
        assert_eq!(matrix.remove_row(1).expect("row 1"), vec![7, 8, 9]);
        assert_eq!(matrix, sample());
    }

    #[test]
    fn removing_last_row_or_column_fails() {
        let mut matrix = Matrix::from_rows(vec![vec![1, 2]]).expect("single row");
        assert!(matches!(
            matrix.remove_row(0),
            Err(MatrixError::InvalidDimensions { rows: 0, cols: 2 })
        ));
        assert_eq!(matrix.remove_column(1).expect("column 1"), vec![2]);
        assert!(matches!(
            matrix.remove_column(0),
            Err(MatrixError::InvalidDimensions { rows: 1, cols: 0 })
        ));
        assert!(matrix.remove_row(1).is_err());
        assert_eq!(matrix.to_rows(), vec![vec![1]]);
    }

    #[test]
    fn propagate_horizontally_repeats_columns_in_order() {
        let mut matrix = sample();
        matrix.propagate_horizontally(2).expect("width fits");
        assert_eq!(
            matrix.to_rows(),
            vec![
                vec![1, 2, 3, 1, 2, 3, 1, 2, 3],
                vec![4, 5, 6, 4, 5, 6, 4, 5, 6]
            ]
        );
        matrix.propagate_horizontally(0).expect("no-op");
        assert_eq!(matrix.n_cols(), 9);
    }

    #[test]
    fn propagating_past_addressable_width_leaves_matrix_untouched() {
        let mut matrix = sample();
        assert!(matches!(
            matrix.propagate_horizontally(usize::MAX),
            Err(MatrixError::InvalidDimensions {
                rows: 2,
                cols: usize::MAX
            })
        ));
        assert!(matches!(
            matrix.propagate_horizontally(usize::MAX / 4),
            Err(MatrixError::InvalidDimensions { rows: 2, .. })
        ));
        assert_eq!(matrix, sample());
    }

    #[test]
    fn unaddressable_shapes_are_rejected() {
        let huge = 1_usize << 32;
        assert!(matches!(
            Matrix::filled(huge, huge, 7_u8),
            Err(MatrixError::InvalidDimensions { rows, cols }) if rows == huge && cols == huge
        ));
        assert!(matches!(
            Matrix::<u8>::from_flat(huge, huge, Vec::new()),
            Err(MatrixError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Matrix::<u64>::new(usize::MAX, 1),
            Err(MatrixError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn count_elements_matches_exact_values() {
        let matrix = Matrix::from_rows(vec![vec!['.', 'x', '.'], vec!['x', 'x', '.']])
            .expect("rectangular rows");
        assert_eq!(matrix.count_elements(&'x'), 3);
        assert_eq!(matrix.count_elements(&'.'), 3);
        assert_eq!(matrix.count_elements(&'o'), 0);
    }

    #[test]
    fn equality_is_sensitive_to_shape_and_values() {
        let matrix = sample();
        assert_eq!(matrix, matrix.clone());

        let mut changed = sample();
        changed.set(1, 2, 0).expect("in range");
        assert_ne!(matrix, changed);
        assert_ne!(changed, matrix);

        let reshaped = Matrix::from_flat(3, 2, vec![1, 2, 3, 4, 5, 6]).expect("same data");
        assert_ne!(matrix, reshaped);
    }
}
