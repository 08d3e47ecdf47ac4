//! The `AnnotatedMatrix` aggregate.
//!
//! One statically typed field per annotation category, rather than the
//! string-keyed mappings some annotated-data containers use internally.
//! The fixed schema means shape mismatches are caught here, when the
//! aggregate is built, instead of surfacing later during comparison.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::categorical::Categorical;
use crate::dense::DenseMatrix;
use crate::error::MatrixError;
use crate::sparse::{CscMatrix, CsrMatrix};

/// Number of observations (rows) in the canonical fixture.
pub const N_OBS: usize = 100;
/// Number of variables (columns) in the canonical fixture.
pub const N_VAR: usize = 2000;

/// A complete annotated data matrix: primary sparse payload plus
/// per-observation, per-variable, pairwise, and aggregate-level annotations.
///
/// Fields are private; construction goes through [`AnnotatedMatrix::new`],
/// which enforces every cross-field shape invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedMatrix {
    /// Primary matrix, obs x var.
    x: CsrMatrix<f32>,
    /// Pairwise annotation on observations, obs x obs.
    obs_pairs: CsrMatrix<f64>,
    /// Pairwise annotation on variables, var x var.
    var_pairs: CscMatrix<i16>,
    /// Unique, ordered row labels.
    obs_names: Vec<String>,
    /// Unique, ordered column labels.
    var_names: Vec<String>,
    /// Per-observation cell type, dictionary-encoded.
    cell_type: Categorical,
    /// Per-variable dense i32 annotation.
    gene_stuff1: Vec<i32>,
    /// Per-variable dense i64 annotation.
    gene_stuff2: Vec<i64>,
    /// Per-observation embedding, obs x 2.
    obs_umap: DenseMatrix<f64>,
    /// Per-variable embedding, var x 3.
    var_umap: DenseMatrix<f64>,
    /// Aggregate-level scalar list, not keyed to either axis.
    uns_random: Vec<i64>,
    /// Derived layer: log1p of the primary matrix, obs x var.
    log_layer: CsrMatrix<f32>,
}

fn check_len<T>(field: &'static str, values: &[T], expected: usize) -> Result<(), MatrixError> {
    if values.len() != expected {
        return Err(MatrixError::LengthMismatch {
            field,
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

fn check_unique(field: &'static str, names: &[String]) -> Result<(), MatrixError> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(MatrixError::DuplicateIdentifier {
                field,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

impl AnnotatedMatrix {
    /// Assemble an aggregate, validating all cross-field invariants:
    /// per-obs fields have `x.rows()` entries, per-var fields have
    /// `x.cols()` entries, pair matrices are square on their axis, and
    /// identifiers are unique.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: CsrMatrix<f32>,
        obs_pairs: CsrMatrix<f64>,
        var_pairs: CscMatrix<i16>,
        obs_names: Vec<String>,
        var_names: Vec<String>,
        cell_type: Categorical,
        gene_stuff1: Vec<i32>,
        gene_stuff2: Vec<i64>,
        obs_umap: DenseMatrix<f64>,
        var_umap: DenseMatrix<f64>,
        uns_random: Vec<i64>,
        log_layer: CsrMatrix<f32>,
    ) -> Result<Self, MatrixError> {
        let aggregate = Self {
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
        };
        aggregate.check_shapes()?;
        Ok(aggregate)
    }

    fn check_shapes(&self) -> Result<(), MatrixError> {
        let n_obs = self.x.rows();
        let n_var = self.x.cols();

        if self.obs_pairs.rows() != n_obs || self.obs_pairs.cols() != n_obs {
            return Err(MatrixError::NotSquare {
                field: "obs_pairs",
                rows: self.obs_pairs.rows(),
                cols: self.obs_pairs.cols(),
            });
        }
        if self.var_pairs.rows() != n_var || self.var_pairs.cols() != n_var {
            return Err(MatrixError::NotSquare {
                field: "var_pairs",
                rows: self.var_pairs.rows(),
                cols: self.var_pairs.cols(),
            });
        }

        check_len("obs_names", &self.obs_names, n_obs)?;
        check_len("var_names", &self.var_names, n_var)?;
        check_len("cell_type", self.cell_type.codes(), n_obs)?;
        check_len("gene_stuff1", &self.gene_stuff1, n_var)?;
        check_len("gene_stuff2", &self.gene_stuff2, n_var)?;

        check_unique("obs_names", &self.obs_names)?;
        check_unique("var_names", &self.var_names)?;

        if self.obs_umap.rows() != n_obs {
            return Err(MatrixError::LengthMismatch {
                field: "obs_umap",
                expected: n_obs,
                found: self.obs_umap.rows(),
            });
        }
        if self.var_umap.rows() != n_var {
            return Err(MatrixError::LengthMismatch {
                field: "var_umap",
                expected: n_var,
                found: self.var_umap.rows(),
            });
        }

        if self.log_layer.rows() != n_obs || self.log_layer.cols() != n_var {
            return Err(MatrixError::LengthMismatch {
                field: "log_layer",
                expected: n_obs * n_var,
                found: self.log_layer.rows() * self.log_layer.cols(),
            });
        }

        Ok(())
    }

    /// Re-run every construction invariant, including the inner sparse
    /// layout checks. Container readers call this because deserialization
    /// does not go through [`AnnotatedMatrix::new`].
    pub fn validate(&self) -> Result<(), MatrixError> {
        self.x.validate()?;
        self.obs_pairs.validate()?;
        self.var_pairs.validate()?;
        self.log_layer.validate()?;
        self.cell_type.validate()?;
        self.check_shapes()
    }

    /// Number of observations (rows of the primary matrix).
    pub fn n_obs(&self) -> usize {
        self.x.rows()
    }

    /// Number of variables (columns of the primary matrix).
    pub fn n_var(&self) -> usize {
        self.x.cols()
    }

    pub fn x(&self) -> &CsrMatrix<f32> {
        &self.x
    }

    pub fn obs_pairs(&self) -> &CsrMatrix<f64> {
        &self.obs_pairs
    }

    pub fn var_pairs(&self) -> &CscMatrix<i16> {
        &self.var_pairs
    }

    pub fn obs_names(&self) -> &[String] {
        &self.obs_names
    }

    pub fn var_names(&self) -> &[String] {
        &self.var_names
    }

    pub fn cell_type(&self) -> &Categorical {
        &self.cell_type
    }

    pub fn gene_stuff1(&self) -> &[i32] {
        &self.gene_stuff1
    }

    pub fn gene_stuff2(&self) -> &[i64] {
        &self.gene_stuff2
    }

    pub fn obs_umap(&self) -> &DenseMatrix<f64> {
        &self.obs_umap
    }

    pub fn var_umap(&self) -> &DenseMatrix<f64> {
        &self.var_umap
    }

    pub fn uns_random(&self) -> &[i64] {
        &self.uns_random
    }

    pub fn log_layer(&self) -> &CsrMatrix<f32> {
        &self.log_layer
    }
}

/// Mutators used by tests and backends that need to rebuild a single field.
/// Each consumes the aggregate and revalidates through [`AnnotatedMatrix::new`].
impl AnnotatedMatrix {
    pub fn with_x(self, x: CsrMatrix<f32>) -> Result<Self, MatrixError> {
        Self::new(
            x,
            self.obs_pairs,
            self.var_pairs,
            self.obs_names,
            self.var_names,
            self.cell_type,
            self.gene_stuff1,
            self.gene_stuff2,
            self.obs_umap,
            self.var_umap,
            self.uns_random,
            self.log_layer,
        )
    }

    pub fn with_obs_names(self, obs_names: Vec<String>) -> Result<Self, MatrixError> {
        Self::new(
            self.x,
            self.obs_pairs,
            self.var_pairs,
            obs_names,
            self.var_names,
            self.cell_type,
            self.gene_stuff1,
            self.gene_stuff2,
            self.obs_umap,
            self.var_umap,
            self.uns_random,
            self.log_layer,
        )
    }

    pub fn with_cell_type(self, cell_type: Categorical) -> Result<Self, MatrixError> {
        Self::new(
            self.x,
            self.obs_pairs,
            self.var_pairs,
            self.obs_names,
            self.var_names,
            cell_type,
            self.gene_stuff1,
            self.gene_stuff2,
            self.obs_umap,
            self.var_umap,
            self.uns_random,
            self.log_layer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorical::Categorical;

    fn tiny() -> AnnotatedMatrix {
        let x = CsrMatrix::from_dense(2, 3, &[1.0f32, 0.0, 2.0, 0.0, 3.0, 0.0]).unwrap();
        let obs_pairs = CsrMatrix::from_dense(2, 2, &[0.0f64, 1.0, 0.0, 0.0]).unwrap();
        let var_pairs = CscMatrix::from_dense(3, 3, &[0i16; 9]).unwrap();
        let log_layer = x.map(|v| (1.0 + v).ln());
        AnnotatedMatrix::new(
            x,
            obs_pairs,
            var_pairs,
            vec!["Cell_0".into(), "Cell_1".into()],
            vec!["Gene_0".into(), "Gene_1".into(), "Gene_2".into()],
            Categorical::from_labels(&["B", "T"]),
            vec![0, 1, 2],
            vec![0, 1, 2],
            DenseMatrix::new(2, 2, vec![0.0; 4]).unwrap(),
            DenseMatrix::new(3, 3, vec![0.0; 9]).unwrap(),
            vec![1, 2, 3],
            log_layer,
        )
        .unwrap()
    }

    #[test]
    fn valid_aggregate_constructs() {
        let agg = tiny();
        assert_eq!(agg.n_obs(), 2);
        assert_eq!(agg.n_var(), 3);
    }

    #[test]
    fn short_obs_names_rejected() {
        let agg = tiny();
        let err = agg.with_obs_names(vec!["Cell_0".into()]).unwrap_err();
        assert!(matches!(
            err,
            MatrixError::LengthMismatch {
                field: "obs_names",
                expected: 2,
                found: 1,
            }
        ));
    }

    #[test]
    fn duplicate_var_names_rejected() {
        let x = CsrMatrix::from_dense(1, 2, &[1.0f32, 0.0]).unwrap();
        let log_layer = x.map(|v| (1.0 + v).ln());
        let err = AnnotatedMatrix::new(
            x,
            CsrMatrix::from_dense(1, 1, &[0.0f64]).unwrap(),
            CscMatrix::from_dense(2, 2, &[0i16; 4]).unwrap(),
            vec!["Cell_0".into()],
            vec!["Gene_0".into(), "Gene_0".into()],
            Categorical::from_labels(&["B"]),
            vec![0, 1],
            vec![0, 1],
            DenseMatrix::new(1, 2, vec![0.0; 2]).unwrap(),
            DenseMatrix::new(2, 3, vec![0.0; 6]).unwrap(),
            vec![1, 2, 3],
            log_layer,
        )
        .unwrap_err();
        assert!(matches!(err, MatrixError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn non_square_obs_pairs_rejected() {
        let x = CsrMatrix::from_dense(2, 2, &[1.0f32, 0.0, 0.0, 1.0]).unwrap();
        let log_layer = x.map(|v| (1.0 + v).ln());
        let err = AnnotatedMatrix::new(
            x,
            CsrMatrix::from_dense(2, 3, &[0.0f64; 6]).unwrap(),
            CscMatrix::from_dense(2, 2, &[0i16; 4]).unwrap(),
            vec!["Cell_0".into(), "Cell_1".into()],
            vec!["Gene_0".into(), "Gene_1".into()],
            Categorical::from_labels(&["B", "T"]),
            vec![0, 1],
            vec![0, 1],
            DenseMatrix::new(2, 2, vec![0.0; 4]).unwrap(),
            DenseMatrix::new(2, 3, vec![0.0; 6]).unwrap(),
            vec![1, 2, 3],
            log_layer,
        )
        .unwrap_err();
        assert!(matches!(err, MatrixError::NotSquare { field: "obs_pairs", .. }));
    }
}
