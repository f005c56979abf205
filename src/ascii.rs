//! ASCII rendering for islands
//!
//! Quick terminal previews of a generated island.

use crate::island::Island;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Elevation gradient only
    Height,
    /// Elevation gradient with volcano centres drawn as `V`
    Volcanoes,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Height => "Height",
            AsciiMode::Volcanoes => "Volcanoes",
        }
    }
}

/// Character for a height, scaled to the island's amplitude.
pub fn height_char(elevation: f32, amplitude: f32) -> char {
    const CHARS: &[char] = &['~', '.', '-', '=', '+', '*', '#', '%', '^', 'A', 'M'];
    let amplitude = amplitude.max(f32::EPSILON);
    let normalized = ((elevation + amplitude) / (2.0 * amplitude)).clamp(0.0, 1.0);
    let idx = (normalized * (CHARS.len() - 1) as f32) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Render an island as lines of characters, one line per grid row.
pub fn render_ascii_map(island: &Island, mode: AsciiMode) -> String {
    let heightmap = &island.heightmap;
    let amplitude = island.params.terrain.height_map.amplitude as f32;
    let mut chars: Vec<char> = heightmap
        .as_slice()
        .iter()
        .map(|&h| height_char(h, amplitude))
        .collect();

    if mode == AsciiMode::Volcanoes {
        for volcano in &island.volcanoes {
            chars[heightmap.index(volcano.x, volcano.y)] = 'V';
        }
    }

    let mut result = String::with_capacity((heightmap.width + 1) * heightmap.height);
    for row in chars.chunks(heightmap.width) {
        result.extend(row.iter());
        result.push('\n');
    }
    result
}
