//! TOML configuration for island generation.
//!
//! Every field is optional; anything left out takes the documented default.
//!
//! ```toml
//! seed = 42
//!
//! [terrain]
//! width = 64
//! height = 64
//!
//! [terrain.height_map]
//! octaves = 6
//! amplitude = 12.0
//!
//! [volcanoes]
//! threshold = 3.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IslandError;
use crate::heightmap::TerrainParams;
use crate::island::IslandParams;
use crate::volcanoes::VolcanoParams;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandConfig {
    /// Master seed; callers pick one when absent
    pub seed: Option<u32>,
    pub terrain: TerrainParams,
    pub volcanoes: VolcanoParams,
}

impl IslandConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, IslandError> {
        toml::from_str(contents).map_err(|e| IslandError::Config(e.to_string()))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, IslandError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| IslandError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| IslandError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), IslandError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self).map_err(|e| IslandError::Config(e.to_string()))?;
        fs::write(path, contents)
            .map_err(|e| IslandError::Config(format!("failed to write {}: {}", path.display(), e)))
    }

    /// Resolve into island parameters, using `fallback_seed` when no seed is set.
    pub fn island_params(&self, fallback_seed: u32) -> IslandParams {
        IslandParams::new(self.seed.unwrap_or(fallback_seed), self.terrain.clone())
    }

    pub fn validate(&self) -> Result<(), IslandError> {
        self.terrain.validate()?;
        self.volcanoes.validate()
    }
}
