//! ad-fixture: deterministic fixture generation.
//!
//! Builds the canonical `AnnotatedMatrix` used by the round-trip verifier.
//! Generation is total: the configuration is fixed, there is no I/O, and a
//! fixed seed makes two independent invocations bit-identical.

pub mod rng;

pub use rng::FixtureRng;

use ad_matrix::{
    AnnotatedMatrix, Categorical, CscMatrix, CsrMatrix, DenseMatrix, N_OBS, N_VAR,
};

/// Seed for the canonical fixture.
pub const FIXTURE_SEED: u64 = 42;

/// Cell type labels drawn uniformly for the categorical annotation.
pub const CELL_TYPES: [&str; 3] = ["B", "T", "Monocyte"];

/// Build the canonical test fixture.
///
/// Field values and the draw order are fixed: primary counts, obs-pair
/// counts, var-pair counts, cell-type choices, obs embedding, var embedding.
/// Changing this order changes every downstream value, so treat it as part
/// of the fixture's identity.
pub fn test_fixture() -> AnnotatedMatrix {
    let mut rng = FixtureRng::new(FIXTURE_SEED);

    // Primary matrix: Poisson(1) counts as f32, row-compressed.
    let counts: Vec<f32> = rng
        .poisson_vec(1.0, N_OBS * N_VAR)
        .into_iter()
        .map(|v| v as f32)
        .collect();
    let x = CsrMatrix::from_dense(N_OBS, N_VAR, &counts)
        .expect("fixture primary matrix has a fixed valid shape");

    // Pairwise annotations on each axis.
    let obs_counts: Vec<f64> = rng
        .poisson_vec(1.0, N_OBS * N_OBS)
        .into_iter()
        .map(|v| v as f64)
        .collect();
    let obs_pairs = CsrMatrix::from_dense(N_OBS, N_OBS, &obs_counts)
        .expect("fixture obs-pair matrix has a fixed valid shape");

    let var_counts: Vec<i16> = rng
        .poisson_vec(1.0, N_VAR * N_VAR)
        .into_iter()
        .map(|v| v as i16)
        .collect();
    let var_pairs = CscMatrix::from_dense(N_VAR, N_VAR, &var_counts)
        .expect("fixture var-pair matrix has a fixed valid shape");

    // Unique ordered identifiers for both axes.
    let obs_names: Vec<String> = (0..N_OBS).map(|i| format!("Cell_{i}")).collect();
    let var_names: Vec<String> = (0..N_VAR).map(|i| format!("Gene_{i}")).collect();

    // Uniform categorical over the fixed label set.
    let choices: Vec<&str> = (0..N_OBS)
        .map(|_| CELL_TYPES[rng.choose_index(CELL_TYPES.len())])
        .collect();
    let cell_type = Categorical::from_labels(&choices);

    // Dense per-variable annotations: simple ramps in two integer widths.
    let gene_stuff1: Vec<i32> = (0..N_VAR as i32).collect();
    let gene_stuff2: Vec<i64> = (0..N_VAR as i64).collect();

    // Standard-normal embeddings on both axes.
    let obs_umap = DenseMatrix::new(N_OBS, 2, rng.standard_normal_vec(N_OBS * 2))
        .expect("fixture obs embedding has a fixed valid shape");
    let var_umap = DenseMatrix::new(N_VAR, 3, rng.standard_normal_vec(N_VAR * 3))
        .expect("fixture var embedding has a fixed valid shape");

    // Aggregate-level scalar list.
    let uns_random: Vec<i64> = vec![1, 2, 3];

    // Derived layer: log1p of the primary matrix, same sparsity layout.
    let log_layer = x.map(|v| v.ln_1p());

    AnnotatedMatrix::new(
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
    )
    .expect("fixture aggregate satisfies its own shape invariants")
}
