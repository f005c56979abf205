use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, IslandError};
use crate::noise_field::NoiseField;
use crate::tilemap::{check_dimensions, HeightGrid, Tilemap};

// =============================================================================
// TERRAIN PARAMETERS
// =============================================================================

/// Most noise layers a height field may sum.
pub const MAX_OCTAVES: u32 = 64;

/// Largest noise coordinate any layer may sample (2^52). Beyond this the
/// lattice lookup and interpolation stop producing finite values.
const MAX_SAMPLE_COORD: f64 = 4_503_599_627_370_496.0;

/// Parameters for the fractal height field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightMapParams {
    /// Number of noise layers summed into the height field
    pub octaves: u32,
    /// Sampling scale of the first layer (lower = larger features)
    pub scale: f64,
    /// Each successive layer's weight is divided by this
    pub influence_falloff: f64,
    /// Each successive layer's scale is multiplied by this
    pub scale_falloff: f64,
    /// Peak absolute height of the field
    pub amplitude: f64,
}

impl Default for HeightMapParams {
    fn default() -> Self {
        Self {
            octaves: 8,
            scale: 0.15,
            influence_falloff: 1.9,
            scale_falloff: 1.6,
            amplitude: 10.0,
        }
    }
}

impl HeightMapParams {
    pub fn validate(&self) -> Result<(), IslandError> {
        if self.octaves < 1 {
            return Err(IslandError::invalid("octaves", self.octaves as f64, "must be at least 1"));
        }
        if self.octaves > MAX_OCTAVES {
            return Err(IslandError::ResourceLimitExceeded {
                resource: "octaves",
                requested: self.octaves as usize,
                limit: MAX_OCTAVES as usize,
            });
        }
        ensure_positive("scale", self.scale)?;
        ensure_positive("influence_falloff", self.influence_falloff)?;
        ensure_positive("scale_falloff", self.scale_falloff)?;
        ensure_positive("amplitude", self.amplitude)?;
        Ok(())
    }
}

/// Grid dimensions plus height field settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    pub height_map: HeightMapParams,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            height_map: HeightMapParams::default(),
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<(), IslandError> {
        check_dimensions(self.width, self.height)?;
        self.height_map.validate()
    }
}

// =============================================================================
// HEIGHT FIELD GENERATION
// =============================================================================

/// One layer of the fractal sum.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Octave {
    scale: f64,
    influence: f64,
}

/// Multi-octave noise generator for the base island terrain.
///
/// Construction validates the parameters and precomputes the octave table;
/// generation itself cannot fail.
#[derive(Clone, Debug)]
pub struct HeightFieldGenerator {
    width: usize,
    height: usize,
    amplitude: f64,
    octaves: Vec<Octave>,
    /// Sum of all octave influences, used to normalise weights to 1
    influence_sum: f64,
    noise: NoiseField,
}

impl HeightFieldGenerator {
    pub fn new(seed: u32, params: &TerrainParams) -> Result<Self, IslandError> {
        params.validate()?;
        let hm = &params.height_map;

        let extent = (params.width.max(params.height) - 1) as f64;
        let octaves = build_octaves(hm, extent)?;
        let influence_sum: f64 = octaves.iter().map(|o| o.influence).sum();

        debug!(
            "Height field octaves for seed {}: {:?} (influence sum {:.4})",
            seed, octaves, influence_sum
        );

        Ok(Self {
            width: params.width,
            height: params.height,
            amplitude: hm.amplitude,
            octaves,
            influence_sum,
            noise: NoiseField::new(seed),
        })
    }

    /// Height at arbitrary real coordinates (cell units).
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        for octave in &self.octaves {
            total += octave.influence * self.noise.sample(x * octave.scale, y * octave.scale);
        }
        self.amplitude * (total / self.influence_sum)
    }

    /// Fill a full grid. Rows are computed in parallel; every cell depends
    /// only on its own coordinates, so the result matches a sequential fill.
    pub fn generate(&self) -> HeightGrid {
        let width = self.width;
        let mut heightmap = Tilemap::new_with(self.width, self.height, 0.0f32);

        heightmap
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = self.sample(x as f64, y as f64) as f32;
                }
            });

        let (min_h, max_h) = heightmap.range();
        info!(
            "Generated {}x{} height field ({} octaves), range {:.3} to {:.3}",
            self.width,
            self.height,
            self.octaves.len(),
            min_h,
            max_h
        );

        heightmap
    }
}

/// Octave scales and influences. Influences are relative to the heaviest
/// layer, so the table stays finite for any falloff.
fn build_octaves(hm: &HeightMapParams, extent: f64) -> Result<Vec<Octave>, IslandError> {
    let count = hm.octaves as usize;

    let mut influences = vec![1.0f64; count];
    if hm.influence_falloff >= 1.0 {
        for o in 1..count {
            influences[o] = influences[o - 1] / hm.influence_falloff;
        }
    } else {
        // Later layers are heavier; weigh everything against the last one
        for o in (0..count - 1).rev() {
            influences[o] = influences[o + 1] * hm.influence_falloff;
        }
    }

    let mut octaves = Vec::with_capacity(count);
    let mut scale = hm.scale;
    for influence in influences {
        if !(scale.is_finite() && scale * extent <= MAX_SAMPLE_COORD) {
            let (name, value) = if hm.scale_falloff > 1.0 {
                ("scale_falloff", hm.scale_falloff)
            } else {
                ("scale", hm.scale)
            };
            return Err(IslandError::invalid(name, value, "pushes noise coordinates out of range"));
        }
        octaves.push(Octave { scale, influence });
        scale *= hm.scale_falloff;
    }
    Ok(octaves)
}

/// Generate the base height field for a seed.
pub fn generate_heightmap(seed: u32, params: &TerrainParams) -> Result<HeightGrid, IslandError> {
    Ok(HeightFieldGenerator::new(seed, params)?.generate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(width: usize, height: usize, hm: HeightMapParams) -> TerrainParams {
        TerrainParams { width, height, height_map: hm }
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let p = TerrainParams::default();
        assert_eq!((p.width, p.height), (30, 30));
        assert_eq!(p.height_map.octaves, 8);
        assert_eq!(p.height_map.scale, 0.15);
        assert_eq!(p.height_map.influence_falloff, 1.9);
        assert_eq!(p.height_map.scale_falloff, 1.6);
        assert_eq!(p.height_map.amplitude, 10.0);
        assert!(p.validate().is_ok());
    }

    #[rstest]
    #[case(HeightMapParams { octaves: 0, ..Default::default() }, "octaves")]
    #[case(HeightMapParams { scale: 0.0, ..Default::default() }, "scale")]
    #[case(HeightMapParams { scale: -0.5, ..Default::default() }, "scale")]
    #[case(HeightMapParams { amplitude: 0.0, ..Default::default() }, "amplitude")]
    #[case(HeightMapParams { influence_falloff: 0.0, ..Default::default() }, "influence_falloff")]
    #[case(HeightMapParams { scale_falloff: -1.0, ..Default::default() }, "scale_falloff")]
    #[case(HeightMapParams { amplitude: f64::NAN, ..Default::default() }, "amplitude")]
    fn test_invalid_parameters_rejected(#[case] hm: HeightMapParams, #[case] expected: &str) {
        match HeightFieldGenerator::new(1, &params(4, 4, hm)) {
            Err(IslandError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
            other => panic!("expected InvalidParameter for {}, got {:?}", expected, other),
        }
    }

    #[test]
    fn test_oversized_grid_rejected_before_allocation() {
        let result = HeightFieldGenerator::new(1, &params(usize::MAX, 2, HeightMapParams::default()));
        assert!(matches!(result, Err(IslandError::ResourceLimitExceeded { .. })));
    }

    #[test]
    fn test_octave_table() {
        let hm = HeightMapParams {
            octaves: 3,
            scale: 0.5,
            influence_falloff: 2.0,
            scale_falloff: 3.0,
            amplitude: 1.0,
        };
        let generator = HeightFieldGenerator::new(0, &params(2, 2, hm)).unwrap();
        assert_eq!(
            generator.octaves,
            vec![
                Octave { scale: 0.5, influence: 1.0 },
                Octave { scale: 1.5, influence: 0.5 },
                Octave { scale: 4.5, influence: 0.25 },
            ]
        );
        assert_eq!(generator.influence_sum, 1.75);
    }

    #[rstest]
    #[case(MAX_OCTAVES + 1)]
    #[case(1100)]
    #[case(u32::MAX)]
    fn test_octave_count_limited(#[case] octaves: u32) {
        let hm = HeightMapParams { octaves, ..Default::default() };
        match HeightFieldGenerator::new(1, &params(4, 4, hm)) {
            Err(IslandError::ResourceLimitExceeded { resource, requested, limit }) => {
                assert_eq!(resource, "octaves");
                assert_eq!(requested, octaves as usize);
                assert_eq!(limit, MAX_OCTAVES as usize);
            }
            other => panic!("expected ResourceLimitExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_growing_influence_stays_finite() {
        let hm = HeightMapParams {
            octaves: MAX_OCTAVES,
            scale: 0.15,
            influence_falloff: 0.5,
            scale_falloff: 1.0,
            amplitude: 10.0,
        };
        let generator = HeightFieldGenerator::new(8, &params(16, 16, hm)).unwrap();
        assert_eq!(generator.octaves.last().unwrap().influence, 1.0);
        assert_eq!(generator.octaves[0].influence, 0.5f64.powi(63));
        assert!(generator.influence_sum.is_finite());

        let grid = generator.generate();
        for (x, y, &h) in grid.iter() {
            assert!(h.is_finite(), "height at ({}, {}) is {}", x, y, h);
            assert!((-10.0..=10.0).contains(&h), "height {} out of bounds", h);
        }
    }

    #[test]
    fn test_growing_influence_keeps_relative_weights() {
        let hm = HeightMapParams {
            octaves: 3,
            scale: 0.2,
            influence_falloff: 0.5,
            scale_falloff: 2.0,
            amplitude: 3.0,
        };
        let generator = HeightFieldGenerator::new(21, &params(6, 6, hm)).unwrap();
        let influences: Vec<f64> = generator.octaves.iter().map(|o| o.influence).collect();
        assert_eq!(influences, vec![0.25, 0.5, 1.0]);

        // Same field as the unnormalised weights 1, 2, 4
        let noise = NoiseField::new(21);
        for (x, y, &h) in generator.generate().iter() {
            let (x, y) = (x as f64, y as f64);
            let weighted = noise.sample(x * 0.2, y * 0.2)
                + 2.0 * noise.sample(x * 0.4, y * 0.4)
                + 4.0 * noise.sample(x * 0.8, y * 0.8);
            let expected = 3.0 * weighted / 7.0;
            assert!((h as f64 - expected).abs() < 1e-5, "{} vs {}", h, expected);
        }
    }

    #[test]
    fn test_runaway_scale_rejected() {
        let hm = HeightMapParams {
            octaves: 4,
            scale_falloff: 1e200,
            ..Default::default()
        };
        match HeightFieldGenerator::new(1, &params(8, 8, hm)) {
            Err(IslandError::InvalidParameter { name, .. }) => assert_eq!(name, "scale_falloff"),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_deterministic() {
        let p = params(24, 17, HeightMapParams::default());
        let a = generate_heightmap(42, &p).unwrap();
        let b = generate_heightmap(42, &p).unwrap();
        assert_eq!(a.width, 24);
        assert_eq!(a.height, 17);
        let bits_a: Vec<u32> = a.as_slice().iter().map(|h| h.to_bits()).collect();
        let bits_b: Vec<u32> = b.as_slice().iter().map(|h| h.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }

    #[test]
    fn test_grid_matches_point_samples() {
        let p = params(9, 5, HeightMapParams::default());
        let generator = HeightFieldGenerator::new(3, &p).unwrap();
        let grid = generator.generate();
        for (x, y, &h) in grid.iter() {
            assert_eq!(h, generator.sample(x as f64, y as f64) as f32);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let p = params(16, 16, HeightMapParams::default());
        let a = generate_heightmap(1, &p).unwrap();
        let b = generate_heightmap(2, &p).unwrap();
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_single_octave_amplitude_bound() {
        let hm = HeightMapParams {
            octaves: 1,
            influence_falloff: 1.0,
            scale_falloff: 1.0,
            amplitude: 10.0,
            ..Default::default()
        };
        let grid = generate_heightmap(42, &params(64, 64, hm)).unwrap();
        for (_, _, &h) in grid.iter() {
            assert!((-10.0..=10.0).contains(&h), "height {} out of bounds", h);
        }
    }

    #[test]
    fn test_single_octave_is_scaled_noise() {
        let hm = HeightMapParams {
            octaves: 1,
            scale: 0.15,
            influence_falloff: 1.0,
            scale_falloff: 1.0,
            amplitude: 10.0,
        };
        let grid = generate_heightmap(42, &params(8, 8, hm)).unwrap();
        let noise = NoiseField::new(42);
        for (x, y, &h) in grid.iter() {
            let expected = (10.0 * noise.sample(x as f64 * 0.15, y as f64 * 0.15)) as f32;
            assert_eq!(h, expected);
        }
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(8)]
    #[case(16)]
    fn test_more_octaves_never_exceed_amplitude(#[case] octaves: u32) {
        let hm = HeightMapParams { octaves, amplitude: 4.0, ..Default::default() };
        let grid = generate_heightmap(1234, &params(48, 48, hm)).unwrap();
        let (min_h, max_h) = grid.range();
        assert!(min_h >= -4.0 && max_h <= 4.0, "range {}..{}", min_h, max_h);
    }

    #[test]
    fn test_origin_is_lattice_zero() {
        let grid = generate_heightmap(5, &params(3, 3, HeightMapParams::default())).unwrap();
        assert_eq!(*grid.get(0, 0), 0.0);
    }
}
