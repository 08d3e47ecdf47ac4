//! Floating-point tolerance comparison.
//!
//! Container round-trips may reformat floats internally, so float-valued
//! fields are never compared bit-exact. The rule is the usual allclose
//! criterion: `|a - b| <= atol + rtol * |b|`, elementwise. Integer-valued
//! fields do not use this module at all; integers have no round-off and are
//! compared exactly.

/// Relative and absolute tolerance for float comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl Tolerance {
    /// True if `a` is within tolerance of `b`. NaN never compares close.
    pub fn close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }

    /// Index of the first pair that is not within tolerance, if any.
    /// Slices of unequal length differ at the shorter length.
    pub fn first_mismatch(&self, a: &[f64], b: &[f64]) -> Option<usize> {
        if a.len() != b.len() {
            return Some(a.len().min(b.len()));
        }
        a.iter()
            .zip(b)
            .position(|(&x, &y)| !self.close(x, y))
    }
}
