//! Adapter errors.

use std::path::PathBuf;

use ad_matrix::MatrixError;
use thiserror::Error;

/// Errors surfaced by the container adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("container holds an invalid aggregate: {0}")]
    Invalid(#[from] MatrixError),

    #[error("unknown file extension: {}", path.display())]
    UnknownExtension { path: PathBuf },

    #[error("invalid container header")]
    InvalidHeader,

    #[error("incompatible container version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("missing chunk '{name}' in {}", dir.display())]
    MissingChunk { name: &'static str, dir: PathBuf },
}
