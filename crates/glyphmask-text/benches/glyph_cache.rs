//! Benchmarks for cosmic-text glyph rasterization and the glyph cache

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glyphmask_text::{CachedRasterizer, CosmicRasterizer, GlyphRasterizer};

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn bench_cold_render(c: &mut Criterion) {
    let mut raster = CosmicRasterizer::with_system_fonts();
    let mut group = c.benchmark_group("cold_render");

    for size in [16, 40, 80] {
        group.throughput(Throughput::Elements(ALPHABET.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                for ch in ALPHABET.chars() {
                    let _ = black_box(raster.render("default", size, ch));
                }
            });
        });
    }

    group.finish();
}

fn bench_cached_render(c: &mut Criterion) {
    let mut raster = CachedRasterizer::new(CosmicRasterizer::with_system_fonts());
    raster.warm("default", [40], ALPHABET);

    c.bench_function("cached_render_alphabet_40px", |b| {
        b.iter(|| {
            for ch in ALPHABET.chars() {
                let _ = black_box(raster.render("default", 40, ch));
            }
        });
    });
}

criterion_group!(benches, bench_cold_render, bench_cached_render);
criterion_main!(benches);
