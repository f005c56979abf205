//! Island generation library
//!
//! Seeded fractal height fields with volcanic craters. Re-exports modules
//! for use by binaries and tools.

pub mod ascii;
pub mod config;
pub mod error;
pub mod export;
pub mod heightmap;
pub mod island;
pub mod noise_field;
pub mod persistence;
pub mod seeds;
pub mod tilemap;
pub mod volcanoes;

pub use error::IslandError;
pub use heightmap::{generate_heightmap, HeightFieldGenerator, HeightMapParams, TerrainParams};
pub use island::{assemble, generate_archipelago, Island, IslandGenerator, IslandParams};
pub use seeds::IslandSeeds;
pub use tilemap::{HeightGrid, Tilemap};
pub use volcanoes::{carve_volcanoes, Volcano, VolcanoCarver, VolcanoParams};
