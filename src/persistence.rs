//! Island dumps.
//!
//! Saves a generated island as versioned JSON holding the seed, the
//! parameters that produced it and the final heights, so it can be reloaded
//! without regenerating or checked against a fresh generation.

use std::fs;
use std::path::Path;

use crate::error::IslandError;
use crate::island::{Island, IslandParams};
use crate::seeds::IslandSeeds;
use crate::tilemap::{HeightGrid, Tilemap};
use crate::volcanoes::{Volcano, VolcanoParams};

/// Format version for forward compatibility
const SAVE_VERSION: u32 = 1;

/// On-disk layout of an island dump.
#[derive(serde::Serialize, serde::Deserialize)]
struct IslandSaveFile {
    version: u32,
    width: usize,
    height: usize,
    seeds: IslandSeeds,
    params: IslandParams,
    volcano_params: VolcanoParams,
    /// Row-major heights
    heights: Vec<f32>,
    volcanoes: Vec<Volcano>,
}

/// An island read back from disk.
pub struct LoadedIsland {
    pub seeds: IslandSeeds,
    pub params: IslandParams,
    pub volcano_params: VolcanoParams,
    pub heightmap: HeightGrid,
    pub volcanoes: Vec<Volcano>,
}

pub fn island_to_json(island: &Island) -> Result<String, IslandError> {
    let save = IslandSaveFile {
        version: SAVE_VERSION,
        width: island.heightmap.width,
        height: island.heightmap.height,
        seeds: island.seeds,
        params: island.params.clone(),
        volcano_params: island.volcano_params.clone(),
        heights: island.heightmap.as_slice().to_vec(),
        volcanoes: island.volcanoes.clone(),
    };

    serde_json::to_string(&save)
        .map_err(|e| IslandError::Persistence(format!("Serialization failed: {}", e)))
}

pub fn island_from_json(json: &str) -> Result<LoadedIsland, IslandError> {
    let save: IslandSaveFile = serde_json::from_str(json)
        .map_err(|e| IslandError::Persistence(format!("Deserialization failed: {}", e)))?;

    if save.version > SAVE_VERSION {
        return Err(IslandError::Persistence(format!(
            "Save file version {} is newer than supported version {}",
            save.version, SAVE_VERSION,
        )));
    }

    let heightmap = Tilemap::from_vec(save.width, save.height, save.heights)?;

    Ok(LoadedIsland {
        seeds: save.seeds,
        params: save.params,
        volcano_params: save.volcano_params,
        heightmap,
        volcanoes: save.volcanoes,
    })
}

/// Save an island dump to `path`.
pub fn save_island(island: &Island, path: &Path) -> Result<(), IslandError> {
    let json = island_to_json(island)?;
    fs::write(path, json)
        .map_err(|e| IslandError::Persistence(format!("failed to write {}: {}", path.display(), e)))
}

/// Load an island dump from `path`.
pub fn load_island(path: &Path) -> Result<LoadedIsland, IslandError> {
    let json = fs::read_to_string(path)
        .map_err(|e| IslandError::Persistence(format!("failed to read {}: {}", path.display(), e)))?;
    island_from_json(&json)
}
