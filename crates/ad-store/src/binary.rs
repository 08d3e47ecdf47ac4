//! Single-file hierarchical binary container.
//!
//! The file is one gzip stream wrapping a container document: a versioned
//! header followed by the aggregate payload. The backend is byte-native for
//! strings: the categorical dictionary is written as raw byte strings and
//! comes back as `Labels::Bytes`, so validating against this format
//! requires the UTF-8 reconciliation codec.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ad_matrix::AnnotatedMatrix;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Current binary container format version.
pub const BINARY_VERSION: u32 = 1;

const MAGIC: &str = "ADMB";

/// Container header, validated on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BinaryHeader {
    magic: String,
    version: u32,
}

impl BinaryHeader {
    fn current() -> Self {
        Self {
            magic: MAGIC.to_string(),
            version: BINARY_VERSION,
        }
    }

    fn validate(&self) -> Result<(), StoreError> {
        if self.magic != MAGIC {
            return Err(StoreError::InvalidHeader);
        }
        if self.version != BINARY_VERSION {
            return Err(StoreError::IncompatibleVersion {
                expected: BINARY_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct BinaryContainer {
    header: BinaryHeader,
    aggregate: AnnotatedMatrix,
}

/// Write the aggregate as a single gzip-compressed container file.
pub fn write(aggregate: &AnnotatedMatrix, path: &Path) -> Result<(), StoreError> {
    // Byte-encode the categorical dictionary; this backend stores strings
    // as raw bytes, as single-file hierarchical containers typically do.
    let byte_cat = aggregate
        .cell_type()
        .to_byte_dictionary(|s| s.as_bytes().to_vec());
    let aggregate = aggregate.clone().with_cell_type(byte_cat)?;

    let container = BinaryContainer {
        header: BinaryHeader::current(),
        aggregate,
    };

    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, &container)?;
    encoder.finish()?;
    Ok(())
}

/// Read an aggregate back from a single-file container.
pub fn read(path: &Path) -> Result<AnnotatedMatrix, StoreError> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let container: BinaryContainer = serde_json::from_reader(decoder)?;

    container.header.validate()?;
    container.aggregate.validate()?;
    Ok(container.aggregate)
}
