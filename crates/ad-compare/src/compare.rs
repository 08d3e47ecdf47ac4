//! Field-by-field aggregate comparison.
//!
//! The check order is fixed and part of the contract, because comparison is
//! fail-fast: callers relying on "first failing field" semantics get the
//! first field in this sequence:
//!
//! 1. `x`  2. `obs_pairs`  3. `var_pairs`  4. `obs_names`  5. `var_names`
//! 6. `cell_type`  7. `gene_stuff1`  8. `gene_stuff2`  9. `obs_umap`
//! 10. `var_umap`  11. `uns_random`  12. `log_layer`

use ad_matrix::{AnnotatedMatrix, Categorical, LabelRef};
use thiserror::Error;

use crate::codec::LabelCodec;
use crate::tolerance::Tolerance;

/// Category of check applied to a field, used in failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    SparseFloat32,
    SparseFloat64,
    SparseInt16,
    Identifiers,
    CategoricalLabels,
    DenseInt,
    DenseFloat64,
    ScalarList,
    DerivedLayer,
}

impl core::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            CheckKind::SparseFloat32 => "sparse row-compressed float32",
            CheckKind::SparseFloat64 => "sparse row-compressed float64",
            CheckKind::SparseInt16 => "sparse column-compressed int16",
            CheckKind::Identifiers => "identifier sequence",
            CheckKind::CategoricalLabels => "categorical labels",
            CheckKind::DenseInt => "dense integer vector",
            CheckKind::DenseFloat64 => "dense float64 matrix",
            CheckKind::ScalarList => "scalar list",
            CheckKind::DerivedLayer => "derived sparse row-compressed float32",
        };
        write!(f, "{label}")
    }
}

/// Comparison failure. Carries the failing field and the check category.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("validation failed for '{field}' ({kind}): {detail}")]
    Mismatch {
        field: &'static str,
        kind: CheckKind,
        detail: String,
    },
}

impl CompareError {
    /// The name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            CompareError::Mismatch { field, .. } => field,
        }
    }

    /// The category of check that failed.
    pub fn kind(&self) -> CheckKind {
        match self {
            CompareError::Mismatch { kind, .. } => *kind,
        }
    }
}

/// Per-call comparison configuration: float tolerance plus the label
/// encoding reconciliation strategy. Never ambient state.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareConfig {
    pub tolerance: Tolerance,
    pub label_codec: LabelCodec,
}

fn mismatch(field: &'static str, kind: CheckKind, detail: String) -> CompareError {
    CompareError::Mismatch {
        field,
        kind,
        detail,
    }
}

fn check_float_dense(
    field: &'static str,
    kind: CheckKind,
    expected: &[f64],
    actual: &[f64],
    tolerance: &Tolerance,
) -> Result<(), CompareError> {
    match tolerance.first_mismatch(expected, actual) {
        None => Ok(()),
        Some(_) if expected.len() != actual.len() => Err(mismatch(
            field,
            kind,
            format!(
                "length mismatch: expected {}, actual {}",
                expected.len(),
                actual.len()
            ),
        )),
        Some(i) => Err(mismatch(
            field,
            kind,
            format!(
                "entry {} out of tolerance: expected {}, actual {}",
                i, expected[i], actual[i]
            ),
        )),
    }
}

fn check_exact<T: PartialEq + core::fmt::Debug>(
    field: &'static str,
    kind: CheckKind,
    expected: &[T],
    actual: &[T],
) -> Result<(), CompareError> {
    if expected.len() != actual.len() {
        return Err(mismatch(
            field,
            kind,
            format!(
                "length mismatch: expected {}, actual {}",
                expected.len(),
                actual.len()
            ),
        ));
    }
    if let Some(i) = expected.iter().zip(actual).position(|(e, a)| e != a) {
        return Err(mismatch(
            field,
            kind,
            format!(
                "entry {} differs: expected {:?}, actual {:?}",
                i, expected[i], actual[i]
            ),
        ));
    }
    Ok(())
}

/// Compare one label pair after reconciling encodings through the codec.
/// Returns a human-readable description of the difference, or `None` if the
/// labels agree.
fn label_difference(
    expected: LabelRef<'_>,
    actual: LabelRef<'_>,
    codec: &LabelCodec,
) -> Option<String> {
    match (expected, actual) {
        (LabelRef::Text(e), LabelRef::Text(a)) => {
            (e != a).then(|| format!("expected {e:?}, actual {a:?}"))
        }
        (LabelRef::Bytes(e), LabelRef::Bytes(a)) => {
            (e != a).then(|| format!("expected {e:?}, actual {a:?}"))
        }
        (LabelRef::Text(e), LabelRef::Bytes(a)) => match codec.to_canonical_text {
            Some(decode) => match decode(a) {
                Some(text) if text == e => None,
                Some(text) => Some(format!("expected {e:?}, actual {text:?}")),
                None => Some(format!("actual bytes {a:?} not decodable to text")),
            },
            None => Some(format!(
                "actual label is byte-encoded ({a:?}) and no decoder was supplied"
            )),
        },
        (LabelRef::Bytes(e), LabelRef::Text(a)) => match codec.from_canonical_text {
            Some(encode) => {
                let encoded = encode(a);
                (encoded != e).then(|| format!("expected bytes {e:?}, actual {encoded:?}"))
            }
            None => Some(format!(
                "expected label is byte-encoded ({e:?}) and no encoder was supplied"
            )),
        },
    }
}

fn check_categorical(
    field: &'static str,
    expected: &Categorical,
    actual: &Categorical,
    codec: &LabelCodec,
) -> Result<(), CompareError> {
    if expected.len() != actual.len() {
        return Err(mismatch(
            field,
            CheckKind::CategoricalLabels,
            format!(
                "length mismatch: expected {}, actual {}",
                expected.len(),
                actual.len()
            ),
        ));
    }
    // Compare decoded labels position by position; integer codes are an
    // artifact of whichever writer assigned them and are deliberately not
    // compared.
    for i in 0..expected.len() {
        if let Some(detail) = label_difference(expected.label_at(i), actual.label_at(i), codec) {
            return Err(mismatch(
                field,
                CheckKind::CategoricalLabels,
                format!("entry {i}: {detail}"),
            ));
        }
    }
    Ok(())
}

fn widen_f32(values: &[f32]) -> Vec<f64> {
    values.iter().map(|&v| f64::from(v)).collect()
}

/// Compare two aggregates field by field, fail-fast, in the fixed order
/// documented at module level.
///
/// Pure and stateless: the result is a function of the two aggregates and
/// the configuration only.
pub fn compare_aggregates(
    expected: &AnnotatedMatrix,
    actual: &AnnotatedMatrix,
    config: &CompareConfig,
) -> Result<(), CompareError> {
    let tol = &config.tolerance;

    // Sparse matrices: densify, then tolerance-compare. The integer-typed
    // var-pair matrix is compared exactly; integers have no round-off.
    check_float_dense(
        "x",
        CheckKind::SparseFloat32,
        &widen_f32(&expected.x().to_dense()),
        &widen_f32(&actual.x().to_dense()),
        tol,
    )?;
    check_float_dense(
        "obs_pairs",
        CheckKind::SparseFloat64,
        &expected.obs_pairs().to_dense(),
        &actual.obs_pairs().to_dense(),
        tol,
    )?;
    check_exact(
        "var_pairs",
        CheckKind::SparseInt16,
        &expected.var_pairs().to_dense(),
        &actual.var_pairs().to_dense(),
    )?;

    // Identifier sequences: exact, order-sensitive.
    check_exact(
        "obs_names",
        CheckKind::Identifiers,
        expected.obs_names(),
        actual.obs_names(),
    )?;
    check_exact(
        "var_names",
        CheckKind::Identifiers,
        expected.var_names(),
        actual.var_names(),
    )?;

    // Categorical: label-level equality with encoding reconciliation.
    check_categorical(
        "cell_type",
        expected.cell_type(),
        actual.cell_type(),
        &config.label_codec,
    )?;

    // Dense integer vectors: exact.
    check_exact(
        "gene_stuff1",
        CheckKind::DenseInt,
        expected.gene_stuff1(),
        actual.gene_stuff1(),
    )?;
    check_exact(
        "gene_stuff2",
        CheckKind::DenseInt,
        expected.gene_stuff2(),
        actual.gene_stuff2(),
    )?;

    // Dense float embeddings: tolerance.
    check_float_dense(
        "obs_umap",
        CheckKind::DenseFloat64,
        expected.obs_umap().values(),
        actual.obs_umap().values(),
        tol,
    )?;
    check_float_dense(
        "var_umap",
        CheckKind::DenseFloat64,
        expected.var_umap().values(),
        actual.var_umap().values(),
        tol,
    )?;

    // Aggregate-level scalar list: exact, order-sensitive.
    check_exact(
        "uns_random",
        CheckKind::ScalarList,
        expected.uns_random(),
        actual.uns_random(),
    )?;

    // Derived layer: same tolerance rule as the other float matrices. Only
    // the round-tripped value is checked against the originally derived one.
    check_float_dense(
        "log_layer",
        CheckKind::DerivedLayer,
        &widen_f32(&expected.log_layer().to_dense()),
        &widen_f32(&actual.log_layer().to_dense()),
        tol,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_matrix::{
        AnnotatedMatrix, Categorical, CscMatrix, CsrMatrix, DenseMatrix, Labels,
    };

    fn tiny() -> AnnotatedMatrix {
        let x = CsrMatrix::from_dense(2, 3, &[1.0f32, 0.0, 2.0, 0.0, 3.0, 0.0]).unwrap();
        let log_layer = x.map(|v| v.ln_1p());
        AnnotatedMatrix::new(
            x,
            CsrMatrix::from_dense(2, 2, &[0.0f64, 1.0, 2.0, 0.0]).unwrap(),
            CscMatrix::from_dense(3, 3, &[0i16, 1, 0, 0, 0, 2, 0, 0, 0]).unwrap(),
            vec!["Cell_0".into(), "Cell_1".into()],
            vec!["Gene_0".into(), "Gene_1".into(), "Gene_2".into()],
            Categorical::from_labels(&["B", "T"]),
            vec![0, 1, 2],
            vec![0, 1, 2],
            DenseMatrix::new(2, 2, vec![0.5, -0.5, 1.5, -1.5]).unwrap(),
            DenseMatrix::new(3, 3, vec![0.0; 9]).unwrap(),
            vec![1, 2, 3],
            log_layer,
        )
        .unwrap()
    }

    #[test]
    fn identical_aggregates_pass() {
        let a = tiny();
        compare_aggregates(&a, &a.clone(), &CompareConfig::default()).unwrap();
    }

    #[test]
    fn perturbation_below_tolerance_passes() {
        let a = tiny();
        let mut dense = a.x().to_dense();
        dense[0] += 1e-7;
        let b = a
            .clone()
            .with_x(CsrMatrix::from_dense(2, 3, &dense).unwrap())
            .unwrap();
        compare_aggregates(&a, &b, &CompareConfig::default()).unwrap();
    }

    #[test]
    fn perturbation_above_tolerance_fails_that_field() {
        let a = tiny();
        let mut dense = a.x().to_dense();
        dense[2] += 0.01;
        let b = a
            .clone()
            .with_x(CsrMatrix::from_dense(2, 3, &dense).unwrap())
            .unwrap();
        let err = compare_aggregates(&a, &b, &CompareConfig::default()).unwrap_err();
        assert_eq!(err.field(), "x");
        assert_eq!(err.kind(), CheckKind::SparseFloat32);
    }

    #[test]
    fn renamed_identifier_fails_identifier_check() {
        let a = tiny();
        let b = a
            .clone()
            .with_obs_names(vec!["Cell_0".into(), "Cell_X".into()])
            .unwrap();
        let err = compare_aggregates(&a, &b, &CompareConfig::default()).unwrap_err();
        assert_eq!(err.field(), "obs_names");
        assert_eq!(err.kind(), CheckKind::Identifiers);
    }

    #[test]
    fn reordered_identifiers_fail_identifier_check() {
        let a = tiny();
        let b = a
            .clone()
            .with_obs_names(vec!["Cell_1".into(), "Cell_0".into()])
            .unwrap();
        let err = compare_aggregates(&a, &b, &CompareConfig::default()).unwrap_err();
        assert_eq!(err.field(), "obs_names");
    }

    #[test]
    fn byte_labels_reconcile_with_utf8_codec() {
        let a = tiny();
        let byte_cat = Categorical::new(
            a.cell_type().codes().to_vec(),
            Labels::Bytes(vec![b"B".to_vec(), b"T".to_vec()]),
        )
        .unwrap();
        let b = a.clone().with_cell_type(byte_cat).unwrap();

        let config = CompareConfig {
            label_codec: LabelCodec::utf8(),
            ..Default::default()
        };
        compare_aggregates(&a, &b, &config).unwrap();
    }

    #[test]
    fn byte_labels_without_decoder_fail() {
        let a = tiny();
        let byte_cat = Categorical::new(
            a.cell_type().codes().to_vec(),
            Labels::Bytes(vec![b"B".to_vec(), b"T".to_vec()]),
        )
        .unwrap();
        let b = a.clone().with_cell_type(byte_cat).unwrap();

        let err = compare_aggregates(&a, &b, &CompareConfig::default()).unwrap_err();
        assert_eq!(err.field(), "cell_type");
        assert_eq!(err.kind(), CheckKind::CategoricalLabels);
    }

    #[test]
    fn code_reassignment_with_same_labels_passes() {
        // Same per-position labels, permuted dictionary and codes. Codes are
        // writer-assigned and must not be compared directly.
        let a = tiny(); // dictionary [B, T], codes [0, 1]
        let permuted = Categorical::new(
            vec![1, 0],
            Labels::Text(vec!["T".into(), "B".into()]),
        )
        .unwrap();
        let b = a.clone().with_cell_type(permuted).unwrap();
        compare_aggregates(&a, &b, &CompareConfig::default()).unwrap();
    }

    #[test]
    fn fail_fast_reports_first_field_in_check_order() {
        // Corrupt both x and obs_names; x is checked first, so the error
        // must name x and say nothing about identifiers.
        let a = tiny();
        let mut dense = a.x().to_dense();
        dense[0] += 1.0;
        let b = a
            .clone()
            .with_x(CsrMatrix::from_dense(2, 3, &dense).unwrap())
            .unwrap()
            .with_obs_names(vec!["Wrong_0".into(), "Wrong_1".into()])
            .unwrap();

        let err = compare_aggregates(&a, &b, &CompareConfig::default()).unwrap_err();
        assert_eq!(err.field(), "x");
        assert!(!err.to_string().contains("obs_names"));
    }

    #[test]
    fn integer_sparse_matrix_requires_exact_match() {
        // An off-by-one in the int16 pair matrix must fail even though the
        // same relative deviation would pass a float tolerance check.
        let a = tiny();
        let mut dense = a.var_pairs().to_dense();
        dense[1] += 1;
        let var_pairs = CscMatrix::from_dense(3, 3, &dense).unwrap();
        let b = AnnotatedMatrix::new(
            a.x().clone(),
            a.obs_pairs().clone(),
            var_pairs,
            a.obs_names().to_vec(),
            a.var_names().to_vec(),
            a.cell_type().clone(),
            a.gene_stuff1().to_vec(),
            a.gene_stuff2().to_vec(),
            a.obs_umap().clone(),
            a.var_umap().clone(),
            a.uns_random().to_vec(),
            a.log_layer().clone(),
        )
        .unwrap();

        let err = compare_aggregates(&a, &b, &CompareConfig::default()).unwrap_err();
        assert_eq!(err.field(), "var_pairs");
        assert_eq!(err.kind(), CheckKind::SparseInt16);
    }

    #[test]
    fn error_message_names_field_and_category() {
        let a = tiny();
        let b = a
            .clone()
            .with_obs_names(vec!["Cell_0".into(), "Cell_X".into()])
            .unwrap();
        let msg = compare_aggregates(&a, &b, &CompareConfig::default())
            .unwrap_err()
            .to_string();
        assert!(msg.contains("obs_names"));
        assert!(msg.contains("identifier sequence"));
    }
}
