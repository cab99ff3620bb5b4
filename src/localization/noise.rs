//! Seedable Gaussian/uniform noise source.

use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::StandardNormal;

/// Noise generator with configurable seed for reproducibility.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    rng: SmallRng,
}

impl NoiseGenerator {
    /// Create a new noise generator.
    ///
    /// Seed 0 draws entropy for non-deterministic behavior; any other seed
    /// gives a reproducible sequence.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng }
    }

    /// Zero-mean Gaussian sample with the given standard deviation.
    #[inline]
    pub fn gaussian(&mut self, stddev: f32) -> f32 {
        if stddev <= 0.0 {
            return 0.0;
        }
        let n: f32 = self.rng.sample(StandardNormal);
        n * stddev
    }

    /// Gaussian sample around `mean`.
    #[inline]
    pub fn gaussian_about(&mut self, mean: f32, stddev: f32) -> f32 {
        mean + self.gaussian(stddev)
    }

    /// Uniform sample in [0, 1).
    #[inline]
    pub fn uniform(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}
