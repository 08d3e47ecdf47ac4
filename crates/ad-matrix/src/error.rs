//! Construction errors for the data model.

use thiserror::Error;

/// Errors raised when a matrix or aggregate fails its structural invariants.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("{field}: expected length {expected}, found {found}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{field}: index pointer must have {expected} entries, found {found}")]
    BadIndptrLength {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{field}: index pointer is not monotonically non-decreasing at entry {at}")]
    NonMonotoneIndptr { field: &'static str, at: usize },

    #[error("{field}: stored index {index} out of bounds for axis of length {bound}")]
    IndexOutOfBounds {
        field: &'static str,
        index: usize,
        bound: usize,
    },

    #[error("{field}: matrix must be square on its axis, found {rows}x{cols}")]
    NotSquare {
        field: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("{field}: duplicate identifier {name:?}")]
    DuplicateIdentifier { field: &'static str, name: String },

    #[error("categorical code {code} out of range for dictionary of {dictionary_len} labels")]
    CodeOutOfRange { code: u32, dictionary_len: usize },
}
