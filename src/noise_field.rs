//! Seeded coherent noise shared by the terrain and volcano stages.

use noise::{NoiseFn, Perlin};

/// A deterministic 2D gradient noise field.
///
/// Values depend only on the seed and the sample coordinates and always lie
/// in `[-1, 1]`. Integer lattice points sample to exactly zero.
#[derive(Clone, Debug)]
pub struct NoiseField {
    seed: u32,
    perlin: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            perlin: Perlin::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y]).clamp(-1.0, 1.0)
    }
}
