//! Compressed sparse matrix representations.
//!
//! Two layouts are supported: row-compressed (`CsrMatrix`) and
//! column-compressed (`CscMatrix`). Both keep the usual three-array form
//! (index pointer, minor-axis indices, values) and validate it on
//! construction so that downstream code never sees a malformed matrix.

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// Row-compressed sparse matrix.
///
/// `indptr` has `rows + 1` entries; row `r` occupies the half-open slice
/// `indptr[r]..indptr[r + 1]` of `indices` (column indices) and `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix<T> {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<T>,
}

/// Column-compressed sparse matrix.
///
/// Same three-array layout as [`CsrMatrix`], with the roles of rows and
/// columns swapped: `indptr` walks columns and `indices` stores row indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CscMatrix<T> {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<T>,
}

fn validate_compressed(
    field: &'static str,
    major: usize,
    minor: usize,
    indptr: &[usize],
    indices: &[usize],
    data_len: usize,
) -> Result<(), MatrixError> {
    if indptr.len() != major + 1 {
        return Err(MatrixError::BadIndptrLength {
            field,
            expected: major + 1,
            found: indptr.len(),
        });
    }
    for i in 1..indptr.len() {
        if indptr[i] < indptr[i - 1] {
            return Err(MatrixError::NonMonotoneIndptr { field, at: i });
        }
    }
    let nnz = indptr[major];
    if indices.len() != nnz {
        return Err(MatrixError::LengthMismatch {
            field,
            expected: nnz,
            found: indices.len(),
        });
    }
    if data_len != nnz {
        return Err(MatrixError::LengthMismatch {
            field,
            expected: nnz,
            found: data_len,
        });
    }
    for &idx in indices {
        if idx >= minor {
            return Err(MatrixError::IndexOutOfBounds {
                field,
                index: idx,
                bound: minor,
            });
        }
    }
    Ok(())
}

impl<T: Copy + Default + PartialEq> CsrMatrix<T> {
    /// Build a CSR matrix from its three arrays, validating the layout.
    pub fn new(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self, MatrixError> {
        validate_compressed("csr", rows, cols, &indptr, &indices, data.len())?;
        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Build a CSR matrix from a row-major dense buffer, dropping zeros.
    pub fn from_dense(rows: usize, cols: usize, dense: &[T]) -> Result<Self, MatrixError> {
        if dense.len() != rows * cols {
            return Err(MatrixError::LengthMismatch {
                field: "csr dense source",
                expected: rows * cols,
                found: dense.len(),
            });
        }
        let zero = T::default();
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for r in 0..rows {
            for c in 0..cols {
                let v = dense[r * cols + c];
                if v != zero {
                    indices.push(c);
                    data.push(v);
                }
            }
            indptr.push(data.len());
        }
        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of explicitly stored entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Expand to a row-major dense buffer of `rows * cols` values.
    pub fn to_dense(&self) -> Vec<T> {
        let mut dense = vec![T::default(); self.rows * self.cols];
        for r in 0..self.rows {
            for k in self.indptr[r]..self.indptr[r + 1] {
                dense[r * self.cols + self.indices[k]] = self.data[k];
            }
        }
        dense
    }

    /// Re-check the layout invariants. Deserialization does not go through
    /// [`CsrMatrix::new`], so readers call this after decoding a container.
    pub fn validate(&self) -> Result<(), MatrixError> {
        validate_compressed(
            "csr",
            self.rows,
            self.cols,
            &self.indptr,
            &self.indices,
            self.data.len(),
        )
    }

    /// Apply an element-wise transform to the stored values, preserving the
    /// sparsity layout. Used to derive secondary layers (e.g. log1p counts).
    pub fn map<U, F>(&self, f: F) -> CsrMatrix<U>
    where
        F: Fn(T) -> U,
    {
        CsrMatrix {
            rows: self.rows,
            cols: self.cols,
            indptr: self.indptr.clone(),
            indices: self.indices.clone(),
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl<T: Copy + Default + PartialEq> CscMatrix<T> {
    /// Build a CSC matrix from its three arrays, validating the layout.
    pub fn new(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self, MatrixError> {
        validate_compressed("csc", cols, rows, &indptr, &indices, data.len())?;
        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Build a CSC matrix from a row-major dense buffer, dropping zeros.
    pub fn from_dense(rows: usize, cols: usize, dense: &[T]) -> Result<Self, MatrixError> {
        if dense.len() != rows * cols {
            return Err(MatrixError::LengthMismatch {
                field: "csc dense source",
                expected: rows * cols,
                found: dense.len(),
            });
        }
        let zero = T::default();
        let mut indptr = Vec::with_capacity(cols + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for c in 0..cols {
            for r in 0..rows {
                let v = dense[r * cols + c];
                if v != zero {
                    indices.push(r);
                    data.push(v);
                }
            }
            indptr.push(data.len());
        }
        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of explicitly stored entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Expand to a row-major dense buffer of `rows * cols` values.
    pub fn to_dense(&self) -> Vec<T> {
        let mut dense = vec![T::default(); self.rows * self.cols];
        for c in 0..self.cols {
            for k in self.indptr[c]..self.indptr[c + 1] {
                dense[self.indices[k] * self.cols + c] = self.data[k];
            }
        }
        dense
    }

    /// Re-check the layout invariants after deserialization.
    pub fn validate(&self) -> Result<(), MatrixError> {
        validate_compressed(
            "csc",
            self.cols,
            self.rows,
            &self.indptr,
            &self.indices,
            self.data.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csr_dense_roundtrip() {
        let dense = vec![0.0f32, 1.0, 2.0, 0.0, 0.0, 3.0];
        let m = CsrMatrix::from_dense(2, 3, &dense).unwrap();
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.to_dense(), dense);
    }

    #[test]
    fn csc_dense_roundtrip() {
        let dense = vec![0i16, 4, 0, 5, 0, 6];
        let m = CscMatrix::from_dense(3, 2, &dense).unwrap();
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.to_dense(), dense);
    }

    #[test]
    fn csr_rejects_bad_indptr_length() {
        let err = CsrMatrix::<f32>::new(2, 3, vec![0, 1], vec![0], vec![1.0]).unwrap_err();
        assert!(matches!(err, MatrixError::BadIndptrLength { .. }));
    }

    #[test]
    fn csr_rejects_non_monotone_indptr() {
        let err =
            CsrMatrix::<f32>::new(2, 3, vec![0, 2, 1], vec![0, 1], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, MatrixError::NonMonotoneIndptr { at: 2, .. }));
    }

    #[test]
    fn csr_rejects_column_index_out_of_bounds() {
        let err = CsrMatrix::<f32>::new(1, 3, vec![0, 1], vec![3], vec![1.0]).unwrap_err();
        assert!(matches!(err, MatrixError::IndexOutOfBounds { index: 3, .. }));
    }

    #[test]
    fn csr_serde_roundtrip_preserves_layout() {
        let m = CsrMatrix::from_dense(2, 3, &[0.0f32, 1.5, 0.0, 2.5, 0.0, 3.5]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: CsrMatrix<f32> = serde_json::from_str(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn csr_map_preserves_layout() {
        let dense = vec![0.0f32, 2.0, 0.0, 4.0];
        let m = CsrMatrix::from_dense(2, 2, &dense).unwrap();
        let doubled = m.map(|v| v * 2.0);
        assert_eq!(doubled.to_dense(), vec![0.0, 4.0, 0.0, 8.0]);
        assert_eq!(doubled.nnz(), m.nnz());
    }
}
