use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use island_generator::ascii::{self, AsciiMode};
use island_generator::config::IslandConfig;
use island_generator::{export, island, persistence};

#[derive(Parser, Debug)]
#[command(name = "island_generator")]
#[command(about = "Generate procedural volcanic islands")]
struct Args {
    /// TOML configuration file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Width of the island grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the island grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Number of noise octaves
    #[arg(long)]
    octaves: Option<u32>,

    /// Sampling scale of the first octave
    #[arg(long)]
    scale: Option<f64>,

    /// Peak terrain height
    #[arg(long)]
    amplitude: Option<f64>,

    /// Height above which volcanoes form
    #[arg(long)]
    volcano_threshold: Option<f64>,

    /// Skip volcano carving
    #[arg(long)]
    no_volcanoes: bool,

    /// Export a shaded terrain PNG
    #[arg(long)]
    export_png: Option<PathBuf>,

    /// Export a spectral heightmap PNG
    #[arg(long)]
    export_heightmap: Option<PathBuf>,

    /// Save the generated island as JSON
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print an ASCII preview
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => IslandConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?,
        None => IslandConfig::default(),
    };

    if let Some(seed) = args.seed { config.seed = Some(seed); }
    if let Some(width) = args.width { config.terrain.width = width; }
    if let Some(height) = args.height { config.terrain.height = height; }
    if let Some(octaves) = args.octaves { config.terrain.height_map.octaves = octaves; }
    if let Some(scale) = args.scale { config.terrain.height_map.scale = scale; }
    if let Some(amplitude) = args.amplitude { config.terrain.height_map.amplitude = amplitude; }
    if let Some(threshold) = args.volcano_threshold { config.volcanoes.threshold = threshold; }

    // Interactive runs get a fresh seed; the library itself always takes one explicitly
    let params = config.island_params(rand::random());

    println!("Generating island with seed: {}", params.seed);
    println!("Map size: {}x{}", params.terrain.width, params.terrain.height);

    let generator = island::IslandGenerator::new(&params, &config.volcanoes)
        .context("Invalid island parameters")?;
    println!("Stage seeds: {}", generator.seeds());

    let island = if args.no_volcanoes {
        generator.generate_uncarved()
    } else {
        generator.generate()
    };
    let stats = island.height_stats();
    println!(
        "Height range: {:.2} to {:.2} (mean {:.2}, {:.1}% above sea level)",
        stats.min,
        stats.max,
        stats.mean,
        100.0 * stats.land_fraction
    );
    println!(
        "Volcanoes: {} ({} cells carved, {:.2} total depth removed)",
        island.volcanoes.len(),
        island.carve_stats.cells_carved,
        island.carve_stats.total_removed
    );

    if args.print {
        let mode = if args.no_volcanoes { AsciiMode::Height } else { AsciiMode::Volcanoes };
        println!("\n{} preview:", mode.name());
        print!("{}", ascii::render_ascii_map(&island, mode));
    }

    if let Some(path) = &args.export_png {
        export::export_island_shaded(&island, path)
            .with_context(|| format!("Failed to export terrain to {:?}", path))?;
        println!("Exported terrain to {}", path.display());
    }

    if let Some(path) = &args.export_heightmap {
        export::export_heightmap(&island.heightmap, path)
            .with_context(|| format!("Failed to export heightmap to {:?}", path))?;
        println!("Exported heightmap to {}", path.display());
    }

    if let Some(path) = &args.save {
        persistence::save_island(&island, path)
            .with_context(|| format!("Failed to save island to {:?}", path))?;
        println!("Saved island to {}", path.display());
    }

    Ok(())
}
