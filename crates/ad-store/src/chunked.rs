//! Directory-based chunked container.
//!
//! The container is a directory holding a versioned manifest plus one JSON
//! chunk file per aggregate field. Text-native: string data round-trips as
//! decoded text, so no encoding reconciliation is needed when validating
//! against this format.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ad_matrix::{
    AnnotatedMatrix, Categorical, CscMatrix, CsrMatrix, DenseMatrix,
};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Current chunked container format version.
pub const CHUNKED_VERSION: u32 = 1;

const MAGIC: &str = "ADMZ";
const MANIFEST: &str = "manifest.json";

/// Per-field chunk file names, fixed across versions.
const CHUNK_X: &str = "x.json";
const CHUNK_OBS_PAIRS: &str = "obs_pairs.json";
const CHUNK_VAR_PAIRS: &str = "var_pairs.json";
const CHUNK_OBS_NAMES: &str = "obs_names.json";
const CHUNK_VAR_NAMES: &str = "var_names.json";
const CHUNK_CELL_TYPE: &str = "cell_type.json";
const CHUNK_GENE_STUFF1: &str = "gene_stuff1.json";
const CHUNK_GENE_STUFF2: &str = "gene_stuff2.json";
const CHUNK_OBS_UMAP: &str = "obs_umap.json";
const CHUNK_VAR_UMAP: &str = "var_umap.json";
const CHUNK_UNS_RANDOM: &str = "uns_random.json";
const CHUNK_LOG_LAYER: &str = "log_layer.json";

/// Manifest written at the directory root.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Manifest {
    magic: String,
    version: u32,
    n_obs: usize,
    n_var: usize,
}

impl Manifest {
    fn validate(&self) -> Result<(), StoreError> {
        if self.magic != MAGIC {
            return Err(StoreError::InvalidHeader);
        }
        if self.version != CHUNKED_VERSION {
            return Err(StoreError::IncompatibleVersion {
                expected: CHUNKED_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

fn write_chunk<T: Serialize>(dir: &Path, name: &'static str, value: &T) -> Result<(), StoreError> {
    let file = File::create(dir.join(name))?;
    serde_json::to_writer(BufWriter::new(file), value)?;
    Ok(())
}

fn read_chunk<T: DeserializeOwned>(dir: &Path, name: &'static str) -> Result<T, StoreError> {
    let path = dir.join(name);
    let file = File::open(&path).map_err(|_| StoreError::MissingChunk {
        name,
        dir: dir.to_path_buf(),
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Write the aggregate as a chunked directory at `path`.
pub fn write(aggregate: &AnnotatedMatrix, path: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(path)?;

    let manifest = Manifest {
        magic: MAGIC.to_string(),
        version: CHUNKED_VERSION,
        n_obs: aggregate.n_obs(),
        n_var: aggregate.n_var(),
    };
    write_chunk(path, MANIFEST, &manifest)?;

    write_chunk(path, CHUNK_X, aggregate.x())?;
    write_chunk(path, CHUNK_OBS_PAIRS, aggregate.obs_pairs())?;
    write_chunk(path, CHUNK_VAR_PAIRS, aggregate.var_pairs())?;
    write_chunk(path, CHUNK_OBS_NAMES, &aggregate.obs_names())?;
    write_chunk(path, CHUNK_VAR_NAMES, &aggregate.var_names())?;
    write_chunk(path, CHUNK_CELL_TYPE, aggregate.cell_type())?;
    write_chunk(path, CHUNK_GENE_STUFF1, &aggregate.gene_stuff1())?;
    write_chunk(path, CHUNK_GENE_STUFF2, &aggregate.gene_stuff2())?;
    write_chunk(path, CHUNK_OBS_UMAP, aggregate.obs_umap())?;
    write_chunk(path, CHUNK_VAR_UMAP, aggregate.var_umap())?;
    write_chunk(path, CHUNK_UNS_RANDOM, &aggregate.uns_random())?;
    write_chunk(path, CHUNK_LOG_LAYER, aggregate.log_layer())?;

    Ok(())
}

/// Read an aggregate back from a chunked directory.
///
/// Every chunk is required; the aggregate is rebuilt through
/// `AnnotatedMatrix::new`, so cross-field shape violations in a corrupt
/// container surface as adapter errors.
pub fn read(path: &Path) -> Result<AnnotatedMatrix, StoreError> {
    let manifest: Manifest = read_chunk(path, MANIFEST)?;
    manifest.validate()?;

    let x: CsrMatrix<f32> = read_chunk(path, CHUNK_X)?;
    let obs_pairs: CsrMatrix<f64> = read_chunk(path, CHUNK_OBS_PAIRS)?;
    let var_pairs: CscMatrix<i16> = read_chunk(path, CHUNK_VAR_PAIRS)?;
    let obs_names: Vec<String> = read_chunk(path, CHUNK_OBS_NAMES)?;
    let var_names: Vec<String> = read_chunk(path, CHUNK_VAR_NAMES)?;
    let cell_type: Categorical = read_chunk(path, CHUNK_CELL_TYPE)?;
    let gene_stuff1: Vec<i32> = read_chunk(path, CHUNK_GENE_STUFF1)?;
    let gene_stuff2: Vec<i64> = read_chunk(path, CHUNK_GENE_STUFF2)?;
    let obs_umap: DenseMatrix<f64> = read_chunk(path, CHUNK_OBS_UMAP)?;
    let var_umap: DenseMatrix<f64> = read_chunk(path, CHUNK_VAR_UMAP)?;
    let uns_random: Vec<i64> = read_chunk(path, CHUNK_UNS_RANDOM)?;
    let log_layer: CsrMatrix<f32> = read_chunk(path, CHUNK_LOG_LAYER)?;

    x.validate()?;
    obs_pairs.validate()?;
    var_pairs.validate()?;
    log_layer.validate()?;
    cell_type.validate()?;

    let aggregate = AnnotatedMatrix::new(
        x,
        obs_pairs,
        var_pairs,
        obs_names,
        var_names,
        cell_type,
        gene_stuff1,
        gene_stuff2,
        obs_umap,
        var_umap,
        uns_random,
        log_layer,
    )?;
    Ok(aggregate)
}
