//! Container format selection by file extension.

use std::path::Path;

use crate::error::StoreError;

/// The two supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Single-file hierarchical binary container (gzip-compressed), `.adb`.
    /// Byte-native: string dictionaries round-trip as raw byte strings.
    Binary,
    /// Directory-based chunked container, `.adz`: a manifest plus one chunk
    /// file per field. Text-native.
    Chunked,
}

impl Format {
    pub const BINARY_EXTENSION: &'static str = "adb";
    pub const CHUNKED_EXTENSION: &'static str = "adz";

    /// Dispatch on the path's extension.
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(Self::BINARY_EXTENSION) => Ok(Format::Binary),
            Some(Self::CHUNKED_EXTENSION) => Ok(Format::Chunked),
            _ => Err(StoreError::UnknownExtension {
                path: path.to_path_buf(),
            }),
        }
    }

    /// True if this backend returns categorical labels as raw byte strings,
    /// in which case comparison needs an encoding reconciliation codec.
    pub fn is_byte_native(self) -> bool {
        matches!(self, Format::Binary)
    }
}
