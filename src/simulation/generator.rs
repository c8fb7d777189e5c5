//! Random number capability consumed by the simulation
//!
//! Every stochastic decision in a run goes through one [`Generator`], so a
//! run is reproducible from its seed alone.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for one simulation
pub trait Generator {
    /// Uniform sample in `[0, 1)`
    fn uniform(&mut self) -> f64;

    /// Integer in `[low, high)`
    fn int_range(&mut self, low: usize, high: usize) -> usize {
        debug_assert!(low < high, "empty range {low}..{high}");
        let value = ((high - low) as f64 * self.uniform() + low as f64) as usize;
        value.min(high - 1)
    }

    /// Poisson-distributed count with mean `lambda`
    ///
    /// Multiplies uniform draws until the running product drops to `e^-lambda`
    /// and reports the number of draws minus one.
    fn poisson(&mut self, lambda: f64) -> u32 {
        let limit = (-lambda).exp();
        let mut count = 0;
        let mut product = 1.0;
        loop {
            count += 1;
            product *= self.uniform();
            if product <= limit {
                break;
            }
        }
        count - 1
    }
}

/// [`Generator`] backed by a seeded `StdRng`
pub struct SeededGenerator {
    rng: StdRng,
}

impl SeededGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Generator for SeededGenerator {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
