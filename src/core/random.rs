//! Random source used by the candidate generator.
//!
//! Mutation operators draw through [`RandomSource`] rather than a global
//! generator, so a run can be reproduced from a seed and tests can script
//! exact mutation outcomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the two random decisions the search makes.
pub trait RandomSource {
    /// Uniform index in `[0, bound)`. `bound` is never zero.
    fn index(&mut self, bound: usize) -> usize;

    /// Fair coin flip.
    fn flip(&mut self) -> bool;
}

/// [`RandomSource`] backed by `rand`'s standard generator.
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for StdRandom {
    fn index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }

    fn flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn index(&mut self, bound: usize) -> usize {
        (**self).index(bound)
    }

    fn flip(&mut self) -> bool {
        (**self).flip()
    }
}
