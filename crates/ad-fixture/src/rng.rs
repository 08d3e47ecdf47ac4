//! Seeded random number generation for fixture building.
//!
//! Wraps ChaCha8Rng so that two generators built from the same seed produce
//! identical draw sequences. The distribution samplers are implemented
//! directly over the base generator; each consumes a well-defined number of
//! uniform draws, which keeps the overall draw order stable across runs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fixture random number generator.
#[derive(Debug, Clone)]
pub struct FixtureRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl FixtureRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform index in [0, n). Returns 0 if n is 0.
    pub fn choose_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Poisson-distributed draw with rate `lam`, via Knuth's algorithm.
    ///
    /// Suitable for the small rates used here (rate 1); the number of
    /// uniform draws consumed is itself random but fully determined by the
    /// generator state.
    pub fn poisson(&mut self, lam: f64) -> u64 {
        let l = (-lam).exp();
        let mut k = 0u64;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.next_f64();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Standard normal draw (mean 0, std 1), via Box-Muller.
    ///
    /// Consumes exactly two uniform draws and discards the second variate,
    /// so interleaving with other samplers stays deterministic.
    pub fn standard_normal(&mut self) -> f64 {
        let u1: f64 = loop {
            let u = self.next_f64();
            if u > 0.0 {
                break u;
            }
        };
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    /// Fill a vector with `n` Poisson draws.
    pub fn poisson_vec(&mut self, lam: f64, n: usize) -> Vec<u64> {
        (0..n).map(|_| self.poisson(lam)).collect()
    }

    /// Fill a vector with `n` standard-normal draws.
    pub fn standard_normal_vec(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.standard_normal()).collect()
    }
}
