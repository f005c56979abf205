//! Criterion benchmarks for the island pipeline.
//!
//! Run with: cargo bench --bench island_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use island_generator::{
    assemble, HeightFieldGenerator, IslandParams, TerrainParams, VolcanoCarver, VolcanoParams,
};

fn terrain(size: usize) -> TerrainParams {
    TerrainParams { width: size, height: size, ..Default::default() }
}

// ---------------------------------------------------------------------------
// Benchmark: height field
// ---------------------------------------------------------------------------

fn bench_height_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("height_field");
    group.sample_size(20);

    for size in [64, 256] {
        let generator = HeightFieldGenerator::new(42, &terrain(size)).expect("valid params");
        group.bench_function(format!("{}x{}", size, size), |b| {
            b.iter(|| black_box(generator.generate()));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: volcano carving on a fixed base terrain
// ---------------------------------------------------------------------------

fn bench_carving(c: &mut Criterion) {
    let mut group = c.benchmark_group("volcano_carving");
    group.sample_size(20);

    let base = HeightFieldGenerator::new(42, &terrain(256)).expect("valid params").generate();
    let params = VolcanoParams { threshold: 1.0, max_depth: 2.0, crater_scale: 2.0, ..Default::default() };
    let carver = VolcanoCarver::new(7, &params).expect("valid params");

    group.bench_function("256x256", |b| {
        b.iter(|| {
            let mut grid = base.clone();
            black_box(carver.carve(&mut grid))
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: full assembly
// ---------------------------------------------------------------------------

fn bench_assemble(c: &mut Criterion) {
    let params = IslandParams::new(42, terrain(128));
    let volcanoes = VolcanoParams::default();
    c.bench_function("assemble_128x128", |b| {
        b.iter(|| black_box(assemble(&params, &volcanoes).expect("valid params")));
    });
}

criterion_group!(benches, bench_height_field, bench_carving, bench_assemble);
criterion_main!(benches);
