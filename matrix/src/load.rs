//! Construction from delimited text.
//!
//! Two layouts are understood. The flat layout is a single line of
//! comma-separated tokens whose shape is supplied by the caller. The line
//! layout stores one row per line, either as separated tokens or, with
//! [`NULL_SEPARATOR`], one element per character.

use std::{fmt, io::BufRead, str::FromStr};

use log::debug;

use crate::{
    error::{MatrixError, Result},
    matrix::{element_count, Matrix},
};

/// Separator used between tokens of the flat layout.
pub const FLAT_SEPARATOR: char = ',';

/// Separator that makes every character of a line its own token.
pub const NULL_SEPARATOR: char = '\0';

/// Element types that can be read from text.
///
/// Implemented for every clonable, comparable, default-constructible type
/// whose [`FromStr`] error can be displayed. A token is parsed as written
/// first and only retried without surrounding whitespace if that fails, so
/// `" "` stays a valid `char` and `String` tokens keep their padding.
pub trait Element: Clone + Default + PartialEq {
    /// Converts a single token into an element.
    fn parse_token(token: &str) -> std::result::Result<Self, String>;
}

impl<T> Element for T
where
    T: Clone + Default + PartialEq + FromStr,
    T::Err: fmt::Display,
{
    fn parse_token(token: &str) -> std::result::Result<Self, String> {
        token.parse().or_else(|error: T::Err| {
            let trimmed = token.trim();
            if trimmed.len() == token.len() {
                return Err(error.to_string());
            }
            trimmed.parse().map_err(|error: T::Err| error.to_string())
        })
    }
}

/// How a line is cut into tokens.
#[derive(Clone, Copy, Debug)]
enum Split {
    Separator(char),
    Characters,
}

impl Split {
    fn new(separator: char) -> Self {
        if separator == NULL_SEPARATOR {
            Self::Characters
        } else {
            Self::Separator(separator)
        }
    }

    /// Lines without data. Whitespace is data when every character is a cell.
    fn is_blank(self, line: &str) -> bool {
        match self {
            Self::Separator(_) => line.trim().is_empty(),
            Self::Characters => line.is_empty(),
        }
    }

    fn parse<T: Element>(self, line: &str, number: usize) -> Result<Vec<T>> {
        let parse = |token: &str| {
            T::parse_token(token).map_err(|reason| MatrixError::Parse {
                line: number,
                token: token.to_owned(),
                reason,
            })
        };
        match self {
            Self::Separator(separator) => line.split(separator).map(parse).collect(),
            Self::Characters => line.matches(|_: char| true).map(parse).collect(),
        }
    }
}

impl<T: Element> Matrix<T> {
    /// Reads a `rows x cols` matrix from the first line of `reader`.
    ///
    /// The line must hold exactly `rows * cols` comma-separated tokens; a
    /// blank line holds none.
    pub fn from_flat_reader<R: BufRead>(mut reader: R, rows: usize, cols: usize) -> Result<Self> {
        let _ = element_count::<T>(rows, cols)?;

        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        let line = strip_line_ending(&line);
        let split = Split::Separator(FLAT_SEPARATOR);
        let values = if split.is_blank(line) {
            Vec::new()
        } else {
            split.parse(line, 1)?
        };
        let matrix = Self::from_flat(rows, cols, values)?;
        debug!("loaded {rows}x{cols} matrix from {read} bytes of flat text");
        Ok(matrix)
    }

    /// Reads one row per line, splitting each line on `separator`.
    ///
    /// With [`NULL_SEPARATOR`] every character is one token and only empty
    /// lines are skipped; otherwise lines holding nothing but whitespace are
    /// skipped too. Every row must have as many tokens as the first one.
    pub fn from_reader<R: BufRead>(reader: R, separator: char) -> Result<Self> {
        let split = Split::new(separator);
        let mut rows = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = strip_line_ending(&line);
            if split.is_blank(line) {
                continue;
            }
            rows.push(split.parse(line, index + 1)?);
        }

        let matrix = Self::from_rows(rows)?;
        debug!(
            "loaded {}x{} matrix from line text",
            matrix.n_rows(),
            matrix.n_cols()
        );
        Ok(matrix)
    }

    /// [`Matrix::from_reader`] over an in-memory string.
    pub fn parse_lines(text: &str, separator: char) -> Result<Self> {
        Self::from_reader(text.as_bytes(), separator)
    }
}

impl Matrix<char> {
    /// Reads one row per line, taking every character as one element.
    ///
    /// Same as [`Matrix::from_reader`] with [`NULL_SEPARATOR`].
    pub fn from_char_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader(reader, NULL_SEPARATOR)
    }

    /// [`Matrix::from_char_reader`] over an in-memory string.
    pub fn parse_char_lines(text: &str) -> Result<Self> {
        Self::from_char_reader(text.as_bytes())
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_text_unpacks_row_major() {
        let matrix = Matrix::<i32>::from_flat_reader("1,2,3,4,5,6\n".as_bytes(), 2, 3)
            .expect("six tokens");
        assert_eq!(matrix.to_rows(), vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn flat_text_reads_only_first_line() {
        let matrix = Matrix::<i32>::from_flat_reader("1,2\n3,4\n".as_bytes(), 1, 2)
            .expect("first line only");
        assert_eq!(matrix.to_rows(), vec![vec![1, 2]]);
    }

    #[test]
    fn flat_text_with_wrong_count_is_rejected() {
        let error = Matrix::<i32>::from_flat_reader("1,2,3,4,5".as_bytes(), 2, 3).unwrap_err();
        assert!(matches!(
            error,
            MatrixError::DimensionMismatch {
                expected: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn flat_text_rejects_zero_dimensions() {
        let error = Matrix::<i32>::from_flat_reader("".as_bytes(), 0, 3).unwrap_err();
        assert!(matches!(error, MatrixError::InvalidDimensions { rows: 0, cols: 3 }));
    }

    #[test]
    fn malformed_token_reports_line_and_token() {
        let error = Matrix::<i32>::parse_lines("1,2\n3,four\n", ',').unwrap_err();
        match error {
            MatrixError::Parse { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "four");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn custom_separator_and_padding_are_accepted() {
        let matrix = Matrix::<f64>::parse_lines("1.5; 2.5\r\n3.5 ;4.5\r\n", ';')
            .expect("semicolon separated");
        assert_eq!(matrix.to_rows(), vec![vec![1.5, 2.5], vec![3.5, 4.5]]);
    }

    #[test]
    fn ragged_lines_are_rejected() {
        let error = Matrix::<u8>::parse_lines("1 2 3\n4 5\n", ' ').unwrap_err();
        assert!(matches!(
            error,
            MatrixError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn empty_source_has_no_rows() {
        let error = Matrix::<u8>::parse_lines("\n\n", ',').unwrap_err();
        assert!(matches!(error, MatrixError::InvalidDimensions { rows: 0, .. }));
    }

    #[test]
    fn char_lines_produce_one_fresh_row_per_line() {
        let matrix = Matrix::<char>::parse_char_lines("...\nxx.\n.x.\n").expect("three lines");
        assert_eq!(
            matrix.to_rows(),
            vec![
                vec!['.', '.', '.'],
                vec!['x', 'x', '.'],
                vec!['.', 'x', '.']
            ]
        );
    }

    #[test]
    fn char_lines_keep_spaces_as_cells() {
        let matrix = Matrix::<char>::parse_char_lines("# #\n   \n").expect("two lines");
        assert_eq!(matrix.shape(), (2, 3));
        assert_eq!(matrix.count_elements(&' '), 4);
    }

    #[test]
    fn string_elements_parse_verbatim_tokens() {
        let matrix = Matrix::<String>::parse_lines("a,b,c\nd,e,f", ',').expect("strings");
        assert_eq!(matrix[(1, 0)], "d");
    }

    #[test]
    fn flat_text_on_blank_line_has_no_tokens() {
        let error = Matrix::<i32>::from_flat_reader("\n".as_bytes(), 2, 3).unwrap_err();
        assert!(matches!(
            error,
            MatrixError::DimensionMismatch {
                expected: 6,
                actual: 0
            }
        ));
    }

    #[test]
    fn null_separator_reads_one_element_per_character() {
        let text = "...\nxx.\n.x.\n";
        let split = Matrix::<char>::parse_lines(text, NULL_SEPARATOR).expect("three lines");
        assert_eq!(split, Matrix::<char>::parse_char_lines(text).expect("three lines"));
        assert_eq!(split.row(1).expect("row 1"), &['x', 'x', '.']);
    }

    #[test]
    fn null_separator_parses_each_character_as_element() {
        let digits = Matrix::<u8>::parse_lines("12\n34\n", NULL_SEPARATOR).expect("digits");
        assert_eq!(digits.to_rows(), vec![vec![1, 2], vec![3, 4]]);

        let error = Matrix::<u8>::parse_lines("1a\n", NULL_SEPARATOR).unwrap_err();
        assert!(matches!(error, MatrixError::Parse { line: 1, ref token, .. } if token == "a"));
    }

    #[test]
    fn whitespace_tokens_survive_when_they_parse() {
        let chars = Matrix::<char>::parse_lines("a, ,b", ',').expect("space is a char");
        assert_eq!(chars.to_rows(), vec![vec!['a', ' ', 'b']]);

        let strings = Matrix::<String>::parse_lines(" a,b ", ',').expect("strings");
        assert_eq!(strings.as_slice(), &[" a".to_owned(), "b ".to_owned()]);
    }

    #[test]
    fn whitespace_only_lines_are_skipped_between_tokens() {
        let matrix = Matrix::<i32>::parse_lines("1,2\n   \n3,4\n  \n", ',').expect("two rows");
        assert_eq!(matrix.to_rows(), vec![vec![1, 2], vec![3, 4]]);
    }
}
