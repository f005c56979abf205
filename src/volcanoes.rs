//! Volcano placement and crater carving.
//!
//! Volcanoes form wherever the terrain rises above a threshold that is
//! jittered by a second noise field. Each volcano gets a conical crater
//! stamped into the terrain, deepest at its centre.
//!
//! Candidate selection reads the finished base terrain only, and all craters
//! are accumulated into a scratch delta buffer before being subtracted, so
//! overlapping craters deepen each other and carving order never matters.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, IslandError};
use crate::noise_field::NoiseField;
use crate::tilemap::HeightGrid;

/// Volcano generation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolcanoParams {
    /// Height above which volcanoes form
    pub threshold: f64,
    /// How far the threshold is pushed up or down by noise
    pub threshold_amplitude: f64,
    /// Sampling scale of the threshold noise
    pub threshold_scale: f64,
    /// Depth of a crater at its centre
    pub max_depth: f64,
    /// Crater slope scale; crater radius is `max_depth * crater_scale`
    pub crater_scale: f64,
}

impl Default for VolcanoParams {
    fn default() -> Self {
        Self {
            threshold: 2.5,
            threshold_amplitude: 2.0,
            threshold_scale: 0.2,
            max_depth: 0.5,
            crater_scale: 0.5,
        }
    }
}

impl VolcanoParams {
    pub fn validate(&self) -> Result<(), IslandError> {
        ensure_finite("threshold", self.threshold)?;
        ensure_non_negative("threshold_amplitude", self.threshold_amplitude)?;
        ensure_positive("threshold_scale", self.threshold_scale)?;
        ensure_non_negative("max_depth", self.max_depth)?;
        ensure_positive("crater_scale", self.crater_scale)?;
        Ok(())
    }

    /// Distance from a volcano centre beyond which nothing is carved.
    pub fn crater_radius(&self) -> f64 {
        self.max_depth * self.crater_scale
    }

    /// Crater depth at distance `d` from the centre.
    pub fn crater_depth(&self, d: f64) -> f64 {
        (self.max_depth - d / self.crater_scale).clamp(0.0, self.max_depth)
    }
}

/// A cell that qualified as a volcano centre
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Volcano {
    pub x: usize,
    pub y: usize,
    /// Terrain height at the centre before carving
    pub peak: f32,
    /// Jittered threshold the peak exceeded
    pub threshold: f32,
}

/// Summary of a carving pass
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CarveStats {
    /// Number of volcano centres found
    pub candidates: usize,
    /// Number of cells lowered by at least one crater
    pub cells_carved: usize,
    /// Total height removed over the whole grid
    pub total_removed: f64,
    /// Largest combined depth removed from a single cell
    pub max_removed: f32,
}

/// Result of carving: volcano centres in row-major order plus statistics
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarveOutcome {
    pub volcanoes: Vec<Volcano>,
    pub stats: CarveStats,
}

/// Selects volcano sites and carves craters into a height grid.
#[derive(Clone, Debug)]
pub struct VolcanoCarver {
    params: VolcanoParams,
    noise: NoiseField,
}

impl VolcanoCarver {
    pub fn new(seed: u32, params: &VolcanoParams) -> Result<Self, IslandError> {
        params.validate()?;
        Ok(Self {
            params: params.clone(),
            noise: NoiseField::new(seed),
        })
    }

    /// Jittered threshold a cell must exceed to become a volcano.
    pub fn local_threshold(&self, x: usize, y: usize) -> f64 {
        let scale = self.params.threshold_scale;
        self.params.threshold
            + self.params.threshold_amplitude * self.noise.sample(x as f64 * scale, y as f64 * scale)
    }

    /// Find every cell whose height exceeds its local threshold.
    pub fn find_volcanoes(&self, heightmap: &HeightGrid) -> Vec<Volcano> {
        heightmap
            .as_slice()
            .par_chunks(heightmap.width)
            .enumerate()
            .flat_map_iter(|(y, row)| {
                row.iter().enumerate().filter_map(move |(x, &peak)| {
                    let threshold = self.local_threshold(x, y);
                    if peak as f64 > threshold {
                        Some(Volcano { x, y, peak, threshold: threshold as f32 })
                    } else {
                        None
                    }
                })
            })
            .collect()
    }

    /// Find volcano centres on the finished terrain and carve their craters.
    pub fn carve(&self, heightmap: &mut HeightGrid) -> CarveOutcome {
        if heightmap.is_empty() {
            return CarveOutcome::default();
        }
        let volcanoes = self.find_volcanoes(heightmap);
        let mut stats = CarveStats {
            candidates: volcanoes.len(),
            ..Default::default()
        };

        let crater = CraterBrush::new(&self.params, heightmap.width - 1, heightmap.height - 1);
        debug!(
            "{} volcano candidates, crater brush covers {} cells per quadrant",
            volcanoes.len(),
            crater.len()
        );

        if volcanoes.is_empty() || crater.is_empty() {
            info!("Found {} volcanoes, nothing to carve", volcanoes.len());
            return CarveOutcome { volcanoes, stats };
        }

        // Each row gathers the craters that reach it, so rows own their cells
        let width = heightmap.width;
        let rows: Vec<RowCarve> = heightmap
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .map(|(y, row)| carve_row(y, row, &volcanoes, &crater))
            .collect();

        for row in rows {
            stats.cells_carved += row.cells_carved;
            stats.total_removed += row.removed;
            stats.max_removed = stats.max_removed.max(row.max_removed);
        }

        info!(
            "Carved {} volcanoes: {} cells lowered, {:.3} total depth removed",
            stats.candidates, stats.cells_carved, stats.total_removed
        );

        CarveOutcome { volcanoes, stats }
    }
}

/// Precomputed crater stamp. `rows[dy][dx]` is the depth at offset
/// `(±dx, ±dy)` from the centre; only positive depths are stored, and
/// offsets are capped at what can land on the grid.
#[derive(Clone, Debug)]
struct CraterBrush {
    rows: Vec<Vec<f32>>,
}

impl CraterBrush {
    fn new(params: &VolcanoParams, max_dx: usize, max_dy: usize) -> Self {
        let mut rows = Vec::new();
        if params.crater_radius() <= 0.0 {
            return Self { rows };
        }

        // Depth only falls with distance, so each scan stops at the first zero
        for dy in 0..=max_dy as u64 {
            let mut depths = Vec::new();
            for dx in 0..=max_dx as u64 {
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                let depth = params.crater_depth(d) as f32;
                if depth <= 0.0 {
                    break;
                }
                depths.push(depth);
            }
            if depths.is_empty() {
                break;
            }
            rows.push(depths);
        }
        Self { rows }
    }

    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Furthest vertical offset with a positive depth.
    fn reach(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    fn row(&self, dy: usize) -> &[f32] {
        &self.rows[dy]
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct RowCarve {
    cells_carved: usize,
    removed: f64,
    max_removed: f32,
}

/// Carve every crater that reaches row `y`. Depths are summed per cell in
/// candidate order, then subtracted once.
fn carve_row(y: usize, row: &mut [f32], volcanoes: &[Volcano], crater: &CraterBrush) -> RowCarve {
    let reach = crater.reach();
    let last_x = row.len() - 1;

    // Candidates are in row-major order, so the ones in range are contiguous
    let first = volcanoes.partition_point(|v| v.y + reach < y);
    let mut delta = vec![0.0f32; row.len()];
    for volcano in volcanoes[first..].iter().take_while(|v| v.y <= y + reach) {
        let depths = crater.row(volcano.y.abs_diff(y));
        let span = depths.len() - 1;
        let lo = volcano.x.saturating_sub(span);
        let hi = (volcano.x + span).min(last_x);
        for (x, d) in delta.iter_mut().enumerate().take(hi + 1).skip(lo) {
            *d += depths[volcano.x.abs_diff(x)];
        }
    }

    let mut carved = RowCarve::default();
    for (h, &d) in row.iter_mut().zip(&delta) {
        if d > 0.0 {
            *h -= d;
            carved.cells_carved += 1;
            carved.removed += d as f64;
            carved.max_removed = carved.max_removed.max(d);
        }
    }
    carved
}

/// Carve volcanoes into `heightmap`, returning the volcano centres.
pub fn carve_volcanoes(
    heightmap: &mut HeightGrid,
    seed: u32,
    params: &VolcanoParams,
) -> Result<Vec<Volcano>, IslandError> {
    Ok(VolcanoCarver::new(seed, params)?.carve(heightmap).volcanoes)
}
