use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::IslandError;
use crate::island::Island;
use crate::tilemap::HeightGrid;

/// Colour used to mark volcano centres
const VOLCANO_COLOR: [u8; 3] = [220, 40, 20];

/// Export a heightmap using a spectral colormap, stretched to the grid's own range.
pub fn export_heightmap<P: AsRef<Path>>(heightmap: &HeightGrid, path: P) -> Result<(), IslandError> {
    save(render_heightmap(heightmap), path.as_ref())
}

/// Export an island as a shaded terrain map with volcano centres marked.
pub fn export_island_shaded<P: AsRef<Path>>(island: &Island, path: P) -> Result<(), IslandError> {
    save(render_island_shaded(island), path.as_ref())
}

fn save(img: RgbImage, path: &Path) -> Result<(), IslandError> {
    img.save(path)
        .map_err(|e| IslandError::Export(format!("{}: {}", path.display(), e)))
}

pub fn render_heightmap(heightmap: &HeightGrid) -> RgbImage {
    let normalized = heightmap.normalized();
    let mut img: RgbImage = ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, y, &val) in normalized.iter() {
        img.put_pixel(x as u32, y as u32, Rgb(spectral_colormap(val)));
    }

    img
}

/// Spectral colormap (matplotlib style): dark blue -> green -> yellow -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 7] = [
        [0.37, 0.31, 0.64],  // Dark blue/purple (low)
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.90, 0.96, 0.60],
        [0.99, 0.68, 0.38],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],  // Dark red (high)
    ];

    let t_scaled = t.clamp(0.0, 1.0) * 6.0;
    let idx = (t_scaled as usize).min(5);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

/// Terrain bands relative to sea level (height 0)
#[derive(Clone, Copy, Debug, PartialEq)]
enum Band {
    DeepWater,
    ShallowWater,
    Beach,
    Grass,
    Rock,
    Peak,
}

/// Classify a height into a colour band. `amplitude` is the island's peak height.
fn classify_band(height: f32, amplitude: f32) -> Band {
    let t = height / amplitude.max(f32::EPSILON);
    if t < -0.3 {
        Band::DeepWater
    } else if t < 0.0 {
        Band::ShallowWater
    } else if t < 0.05 {
        Band::Beach
    } else if t < 0.3 {
        Band::Grass
    } else if t < 0.5 {
        Band::Rock
    } else {
        Band::Peak
    }
}

fn band_color(band: Band) -> [u8; 3] {
    match band {
        Band::DeepWater => [20, 50, 110],
        Band::ShallowWater => [60, 110, 170],
        Band::Beach => [210, 190, 140],
        Band::Grass => [80, 150, 60],
        Band::Rock => [120, 110, 100],
        Band::Peak => [90, 70, 65],
    }
}

pub fn render_island_shaded(island: &Island) -> RgbImage {
    let heightmap = &island.heightmap;
    let amplitude = island.params.terrain.height_map.amplitude as f32;
    let mut img: RgbImage = ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    // Light from the northwest, elevated
    let light_dir: [f32; 3] = normalize_vec3(-1.0, -1.0, 2.0);

    for (x, y, &height) in heightmap.iter() {
        let normal = calculate_normal(heightmap, x, y);
        let diffuse = (normal[0] * light_dir[0] + normal[1] * light_dir[1] + normal[2] * light_dir[2])
            .max(0.0);
        let ambient = 0.4;
        let shade = ambient + (1.0 - ambient) * diffuse;

        let base = band_color(classify_band(height, amplitude));
        let r = ((base[0] as f32 * shade).clamp(0.0, 255.0)) as u8;
        let g = ((base[1] as f32 * shade).clamp(0.0, 255.0)) as u8;
        let b = ((base[2] as f32 * shade).clamp(0.0, 255.0)) as u8;

        img.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
    }

    for volcano in &island.volcanoes {
        img.put_pixel(volcano.x as u32, volcano.y as u32, Rgb(VOLCANO_COLOR));
    }

    img
}

/// Surface normal from central differences, clamped at the grid edges.
fn calculate_normal(heightmap: &HeightGrid, x: usize, y: usize) -> [f32; 3] {
    let x_left = x.saturating_sub(1);
    let x_right = (x + 1).min(heightmap.width - 1);
    let y_up = y.saturating_sub(1);
    let y_down = (y + 1).min(heightmap.height - 1);

    let dx = *heightmap.get(x_right, y) - *heightmap.get(x_left, y);
    let dy = *heightmap.get(x, y_down) - *heightmap.get(x, y_up);

    // Screen Y grows downward
    normalize_vec3(-dx, dy, 1.0)
}

fn normalize_vec3(x: f32, y: f32, z: f32) -> [f32; 3] {
    let len = (x * x + y * y + z * z).sqrt();
    [x / len, y / len, z / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::TerrainParams;
    use crate::island::{assemble, IslandParams};
    use crate::tilemap::Tilemap;
    use crate::volcanoes::VolcanoParams;

    #[test]
    fn test_spectral_endpoints() {
        assert_eq!(spectral_colormap(0.0), [94, 79, 163]);
        assert_eq!(spectral_colormap(1.0), [158, 0, 66]);
        // Out-of-range values are clamped
        assert_eq!(spectral_colormap(-3.0), spectral_colormap(0.0));
    }

    #[test]
    fn test_bands() {
        assert_eq!(classify_band(-5.0, 10.0), Band::DeepWater);
        assert_eq!(classify_band(-0.1, 10.0), Band::ShallowWater);
        assert_eq!(classify_band(0.2, 10.0), Band::Beach);
        assert_eq!(classify_band(2.0, 10.0), Band::Grass);
        assert_eq!(classify_band(4.0, 10.0), Band::Rock);
        assert_eq!(classify_band(8.0, 10.0), Band::Peak);
    }

    #[test]
    fn test_flat_normal_points_up() {
        let grid = Tilemap::new_with(3, 3, 1.0f32);
        assert_eq!(calculate_normal(&grid, 0, 0), [0.0, 0.0, 1.0]);
        assert_eq!(calculate_normal(&grid, 2, 2), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_render_marks_volcanoes() {
        let params = IslandParams::new(3, TerrainParams { width: 32, height: 32, ..Default::default() });
        let volcano_params = VolcanoParams {
            threshold: 0.5,
            threshold_amplitude: 0.0,
            ..Default::default()
        };
        let island = assemble(&params, &volcano_params).unwrap();
        let img = render_island_shaded(&island);
        assert_eq!(img.dimensions(), (32, 32));
        for v in &island.volcanoes {
            assert_eq!(img.get_pixel(v.x as u32, v.y as u32), &Rgb(VOLCANO_COLOR));
        }
    }

    #[test]
    fn test_export_heightmap_png() {
        let grid = Tilemap::from_vec(2, 2, vec![-1.0f32, 0.0, 1.0, 2.0]).unwrap();
        let tmp = std::env::temp_dir().join("island_gen_test_heightmap.png");
        export_heightmap(&grid, &tmp).expect("export failed");
        let img = image::open(&tmp).expect("png should load").to_rgb8();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 0), &Rgb(spectral_colormap(0.0)));
        let _ = std::fs::remove_file(&tmp);
    }
}
