//! ad-matrix: data model for the annotated matrix round-trip verifier.
//!
//! Defines the sparse and dense matrix representations, categorical vectors,
//! and the `AnnotatedMatrix` aggregate that ties them together. All shape
//! invariants are enforced at construction time, so a value of any of these
//! types is structurally valid by definition.

pub mod aggregate;
pub mod categorical;
pub mod dense;
pub mod error;
pub mod sparse;

pub use aggregate::{AnnotatedMatrix, N_OBS, N_VAR};
pub use categorical::{Categorical, LabelRef, Labels};
pub use dense::DenseMatrix;
pub use error::MatrixError;
pub use sparse::{CscMatrix, CsrMatrix};
