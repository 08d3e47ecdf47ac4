//! Property tests for the tolerance comparator: perturbations clearly above
//! the threshold must fail exactly the perturbed field, perturbations
//! clearly below must pass.

use ad_compare::{CompareConfig, Tolerance, compare_aggregates};
use ad_matrix::{
    AnnotatedMatrix, Categorical, CscMatrix, CsrMatrix, DenseMatrix, MatrixError,
};
use proptest::prelude::*;

fn tiny() -> AnnotatedMatrix {
    let x = CsrMatrix::from_dense(2, 3, &[1.0f32, 0.0, 2.0, 0.0, 3.0, 0.0]).unwrap();
    let log_layer = x.map(|v| v.ln_1p());
    AnnotatedMatrix::new(
        x,
        CsrMatrix::from_dense(2, 2, &[0.0f64, 1.0, 2.0, 0.0]).unwrap(),
        CscMatrix::from_dense(3, 3, &[0i16; 9]).unwrap(),
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

fn with_obs_umap_entry(
    agg: &AnnotatedMatrix,
    index: usize,
    delta: f64,
) -> Result<AnnotatedMatrix, MatrixError> {
    let mut values = agg.obs_umap().values().to_vec();
    values[index] += delta;
    AnnotatedMatrix::new(
        agg.x().clone(),
        agg.obs_pairs().clone(),
        agg.var_pairs().clone(),
        agg.obs_names().to_vec(),
        agg.var_names().to_vec(),
        agg.cell_type().clone(),
        agg.gene_stuff1().to_vec(),
        agg.gene_stuff2().to_vec(),
        DenseMatrix::new(2, 2, values)?,
        agg.var_umap().clone(),
        agg.uns_random().to_vec(),
        agg.log_layer().clone(),
    )
}

proptest! {
    #[test]
    fn perturbation_above_threshold_fails_obs_umap(
        index in 0usize..4,
        magnitude in 1e-3f64..1.0,
        negative in any::<bool>(),
    ) {
        let expected = tiny();
        let delta = if negative { -magnitude } else { magnitude };
        let actual = with_obs_umap_entry(&expected, index, delta).unwrap();
        let err = compare_aggregates(&expected, &actual, &CompareConfig::default())
            .unwrap_err();
        prop_assert_eq!(err.field(), "obs_umap");
    }

    #[test]
    fn perturbation_below_threshold_passes(
        index in 0usize..4,
        magnitude in 0.0f64..1e-9,
        negative in any::<bool>(),
    ) {
        let expected = tiny();
        let delta = if negative { -magnitude } else { magnitude };
        let actual = with_obs_umap_entry(&expected, index, delta).unwrap();
        prop_assert!(
            compare_aggregates(&expected, &actual, &CompareConfig::default()).is_ok()
        );
    }

    #[test]
    fn close_is_within_allclose_envelope(a in -1e6f64..1e6) {
        let tol = Tolerance::default();
        // The envelope half-width at b = a.
        let width = tol.atol + tol.rtol * a.abs();
        prop_assert!(tol.close(a + width * 0.5, a));
        prop_assert!(!tol.close(a + width * 4.0 + 1e-7, a));
    }
}
