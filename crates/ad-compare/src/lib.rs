//! ad-compare: structural comparison of annotated matrices.
//!
//! Verifies field-by-field equivalence between an expected aggregate and one
//! reconstructed from a container round-trip. Each field category has its
//! own equality rule (floating-point tolerance, exact integer match,
//! order-sensitive identifier equality, label-level categorical equality
//! with optional encoding reconciliation). Comparison is fail-fast: the
//! first violated field aborts the run with an error naming the field and
//! the category of check that failed.

pub mod codec;
pub mod compare;
pub mod tolerance;

pub use codec::LabelCodec;
pub use compare::{CheckKind, CompareConfig, CompareError, compare_aggregates};
pub use tolerance::Tolerance;
