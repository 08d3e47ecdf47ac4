//! ad-store: container format adapter.
//!
//! Persists an `AnnotatedMatrix` to disk and reads it back, in one of two
//! container formats selected by file extension: a single-file hierarchical
//! binary container (`.adb`) and a directory-based chunked container
//! (`.adz`). The adapter guarantees only that `read(write(a))` yields a
//! structurally comparable aggregate; it makes no bit-exactness promise for
//! floats and no code-stability promise for categoricals.

pub mod binary;
pub mod chunked;
pub mod error;
pub mod format;

pub use error::StoreError;
pub use format::Format;

use std::path::Path;

use ad_matrix::AnnotatedMatrix;

/// Write `aggregate` to `path` in the format selected by its extension.
pub fn write_aggregate(aggregate: &AnnotatedMatrix, path: &Path) -> Result<(), StoreError> {
    match Format::from_path(path)? {
        Format::Binary => binary::write(aggregate, path),
        Format::Chunked => chunked::write(aggregate, path),
    }
}

/// Read an aggregate from `path` in the format selected by its extension.
pub fn read_aggregate(path: &Path) -> Result<AnnotatedMatrix, StoreError> {
    match Format::from_path(path)? {
        Format::Binary => binary::read(path),
        Format::Chunked => chunked::read(path),
    }
}
