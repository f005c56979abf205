//! Profiling tool for the island pipeline stages

use std::time::Instant;

use island_generator::{
    generate_archipelago, HeightFieldGenerator, IslandSeeds, TerrainParams, VolcanoCarver,
    VolcanoParams,
};

fn main() -> Result<(), island_generator::IslandError> {
    let width = 1024;
    let height = 1024;
    let seed = 1337u32;

    println!("=== Performance Profiling ===");
    println!("Map size: {}x{} ({} cells)", width, height, width * height);
    println!();

    let terrain = TerrainParams { width, height, ..Default::default() };
    let volcano_params = VolcanoParams::default();
    let seeds = IslandSeeds::from_master(seed);

    // Profile height field generation
    let start = Instant::now();
    let mut heightmap = HeightFieldGenerator::new(seeds.terrain, &terrain)?.generate();
    let heightmap_time = start.elapsed();
    println!("Height field: {:?}", heightmap_time);

    // Profile volcano carving
    let start = Instant::now();
    let outcome = VolcanoCarver::new(seeds.volcanoes, &volcano_params)?.carve(&mut heightmap);
    let carve_time = start.elapsed();
    println!("Volcano carving: {:?}", carve_time);
    println!("  Volcanoes: {}", outcome.stats.candidates);
    println!("  Cells carved: {}", outcome.stats.cells_carved);

    // Profile a batch of smaller islands
    let batch_terrain = TerrainParams { width: 256, height: 256, ..Default::default() };
    let batch_seeds: Vec<u32> = (0..16).collect();
    let start = Instant::now();
    let islands = generate_archipelago(&batch_seeds, &batch_terrain, &volcano_params)?;
    let batch_time = start.elapsed();
    println!("Archipelago ({} islands of 256x256): {:?}", islands.len(), batch_time);

    // Summary
    let total = heightmap_time + carve_time + batch_time;
    println!("\n=== Summary ===");
    println!("Height field:     {:>8.2}% ({:?})", 100.0 * heightmap_time.as_secs_f64() / total.as_secs_f64(), heightmap_time);
    println!("Carving:          {:>8.2}% ({:?})", 100.0 * carve_time.as_secs_f64() / total.as_secs_f64(), carve_time);
    println!("Archipelago:      {:>8.2}% ({:?})", 100.0 * batch_time.as_secs_f64() / total.as_secs_f64(), batch_time);
    println!("─────────────────────────────────");
    println!("TOTAL:            {:>8}  {:?}", "100%", total);

    Ok(())
}
