//! Seed management for island generation
//!
//! Each generation stage gets its own seed, derived from the island's master
//! seed. Keeping the stages on separate seeds means volcano settings can be
//! tweaked without disturbing the terrain underneath.

use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// ChaCha stream used for the base terrain noise.
const TERRAIN_STREAM: u64 = 1;
/// ChaCha stream used for the volcano threshold noise.
const VOLCANO_STREAM: u64 = 2;

/// Seeds for all island generation stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IslandSeeds {
    /// Master seed (the one a user types in)
    pub master: u32,
    /// Base height field noise
    pub terrain: u32,
    /// Volcano threshold jitter noise
    pub volcanoes: u32,
}

impl IslandSeeds {
    /// Derive every stage seed from the master seed.
    pub fn from_master(master: u32) -> Self {
        Self {
            master,
            terrain: derive_seed(master, TERRAIN_STREAM),
            volcanoes: derive_seed(master, VOLCANO_STREAM),
        }
    }

    /// Create a builder for overriding individual seeds
    pub fn builder(master: u32) -> IslandSeedsBuilder {
        IslandSeedsBuilder {
            seeds: Self::from_master(master),
        }
    }
}

/// Builder for overriding individual seeds while deriving the rest from master
pub struct IslandSeedsBuilder {
    seeds: IslandSeeds,
}

impl IslandSeedsBuilder {
    /// Override the terrain seed
    pub fn terrain(mut self, seed: u32) -> Self {
        self.seeds.terrain = seed;
        self
    }

    /// Override the volcano seed
    pub fn volcanoes(mut self, seed: u32) -> Self {
        self.seeds.volcanoes = seed;
        self
    }

    pub fn build(self) -> IslandSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from the master seed and a stream id.
///
/// ChaCha output is specified bit-for-bit, so the derived seeds are the same
/// on every platform and toolchain.
fn derive_seed(master: u32, stream: u64) -> u32 {
    let mut rng = ChaCha8Rng::seed_from_u64(master as u64);
    rng.set_stream(stream);
    rng.next_u32()
}

impl std::fmt::Display for IslandSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IslandSeeds {{ master: {}, terrain: {}, volcanoes: {} }}",
            self.master, self.terrain, self.volcanoes,
        )
    }
}
