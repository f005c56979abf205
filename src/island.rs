//! Island assembly
//!
//! Ties the stages together: derive per-stage seeds, build the base height
//! field, then carve volcanoes into the completed terrain.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::IslandError;
use crate::heightmap::{HeightFieldGenerator, TerrainParams};
use crate::seeds::IslandSeeds;
use crate::tilemap::HeightGrid;
use crate::volcanoes::{CarveOutcome, CarveStats, Volcano, VolcanoCarver, VolcanoParams};

/// Everything that determines an island's base terrain
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IslandParams {
    /// Master seed, any value in `[0, 2^32 - 1]`
    pub seed: u32,
    pub terrain: TerrainParams,
}

impl IslandParams {
    pub fn new(seed: u32, terrain: TerrainParams) -> Self {
        Self { seed, terrain }
    }
}

/// A finished island
#[derive(Clone, Debug)]
pub struct Island {
    pub seeds: IslandSeeds,
    pub params: IslandParams,
    pub volcano_params: VolcanoParams,
    /// Final terrain with craters carved
    pub heightmap: HeightGrid,
    /// Volcano centres in row-major order
    pub volcanoes: Vec<Volcano>,
    pub carve_stats: CarveStats,
}

/// Summary statistics for reporting
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Fraction of cells above sea level (height > 0)
    pub land_fraction: f32,
}

impl Island {
    pub fn width(&self) -> usize {
        self.heightmap.width
    }

    pub fn height(&self) -> usize {
        self.heightmap.height
    }

    pub fn height_stats(&self) -> HeightStats {
        let (min, max) = self.heightmap.range();
        let cells = self.heightmap.len() as f64;
        let sum: f64 = self.heightmap.as_slice().iter().map(|&h| h as f64).sum();
        let land = self.heightmap.as_slice().iter().filter(|&&h| h > 0.0).count();
        HeightStats {
            min,
            max,
            mean: (sum / cells) as f32,
            land_fraction: (land as f64 / cells) as f32,
        }
    }
}

/// Validated, reusable island pipeline.
///
/// Holds no mutable state, so one generator can be shared across threads.
#[derive(Clone, Debug)]
pub struct IslandGenerator {
    seeds: IslandSeeds,
    params: IslandParams,
    volcano_params: VolcanoParams,
    terrain: HeightFieldGenerator,
    carver: VolcanoCarver,
}

impl IslandGenerator {
    pub fn new(params: &IslandParams, volcano_params: &VolcanoParams) -> Result<Self, IslandError> {
        Self::with_seeds(IslandSeeds::from_master(params.seed), params, volcano_params)
    }

    /// Build with explicit stage seeds, e.g. from `IslandSeeds::builder`.
    pub fn with_seeds(
        seeds: IslandSeeds,
        params: &IslandParams,
        volcano_params: &VolcanoParams,
    ) -> Result<Self, IslandError> {
        let terrain = HeightFieldGenerator::new(seeds.terrain, &params.terrain)?;
        let carver = VolcanoCarver::new(seeds.volcanoes, volcano_params)?;
        Ok(Self {
            seeds,
            params: params.clone(),
            volcano_params: volcano_params.clone(),
            terrain,
            carver,
        })
    }

    pub fn seeds(&self) -> IslandSeeds {
        self.seeds
    }

    /// Base terrain before any volcano carving.
    pub fn generate_base(&self) -> HeightGrid {
        self.terrain.generate()
    }

    pub fn generate(&self) -> Island {
        let mut heightmap = self.terrain.generate();
        let outcome = self.carver.carve(&mut heightmap);
        self.finish(heightmap, outcome)
    }

    /// Island from the base terrain alone; the carving stage never runs.
    pub fn generate_uncarved(&self) -> Island {
        self.finish(self.terrain.generate(), CarveOutcome::default())
    }

    fn finish(&self, heightmap: HeightGrid, outcome: CarveOutcome) -> Island {
        info!(
            "Island {} assembled: {}x{}, {} volcanoes",
            self.seeds.master,
            heightmap.width,
            heightmap.height,
            outcome.volcanoes.len()
        );

        Island {
            seeds: self.seeds,
            params: self.params.clone(),
            volcano_params: self.volcano_params.clone(),
            heightmap,
            volcanoes: outcome.volcanoes,
            carve_stats: outcome.stats,
        }
    }
}

/// Generate one island.
pub fn assemble(params: &IslandParams, volcano_params: &VolcanoParams) -> Result<Island, IslandError> {
    Ok(IslandGenerator::new(params, volcano_params)?.generate())
}

/// Generate one island per seed in parallel. Output order follows `seeds`.
/// Every seed is validated before any generation starts.
pub fn generate_archipelago(
    seeds: &[u32],
    terrain: &TerrainParams,
    volcano_params: &VolcanoParams,
) -> Result<Vec<Island>, IslandError> {
    let generators = seeds
        .iter()
        .map(|&seed| IslandGenerator::new(&IslandParams::new(seed, terrain.clone()), volcano_params))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(generators.par_iter().map(IslandGenerator::generate).collect())
}
