//! Atlas slicing and whole-pack conversion benchmarks.
//!
//! Slicing dominates a conversion run: every atlas is decoded once and six
//! faces are cropped and PNG-encoded. These benchmarks track that cost at
//! typical atlas sizes, and the end-to-end cost of a small pack.
//!
//! Run with: `cargo bench --bench atlas_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};

use skypatch_pack::prelude::*;
use skypatch_sky::atlas::{encode_png, slice_atlas};
use skypatch_sky::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn gradient_atlas(scale: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(scale * 3, scale * 2, |x, y| {
        Rgba([x as u8, y as u8, (x ^ y) as u8, 255])
    }))
}

/// A pack with `skies` primary-world skies, each with its own atlas.
fn build_pack(skies: usize, scale: u32) -> MemoryStore {
    let atlas = encode_png(&gradient_atlas(scale)).expect("atlas encodes");
    let mut store = MemoryStore::new();
    for i in 0..skies {
        let base = format!("optifine/sky/world0/sky{i}");
        store.insert(
            ResourceKind::Assets,
            ResourceId::new("minecraft", format!("{base}.properties")),
            b"startFadeIn=18:00\nendFadeIn=19:00\nendFadeOut=06:00\nrotate=true\n".to_vec(),
        );
        store.insert(
            ResourceKind::Assets,
            ResourceId::new("minecraft", format!("{base}.png")),
            atlas.clone(),
        );
    }
    store
}

// ---------------------------------------------------------------------------
// Benchmark 1: Slicing one atlas at several sizes
// ---------------------------------------------------------------------------

fn bench_slice_atlas(c: &mut Criterion) {
    let config = SkyConfig::default();
    let texture = ResourceId::new("minecraft", "optifine/sky/world0/sky1.png");
    let mut group = c.benchmark_group("slice_atlas");

    for scale in [64u32, 256, 512] {
        let atlas = gradient_atlas(scale);
        group.bench_with_input(BenchmarkId::from_parameter(scale), &atlas, |b, atlas| {
            b.iter(|| {
                let cache = OutputCache::new();
                let sliced = slice_atlas(atlas, &texture, &cache, &config).expect("slices");
                black_box(sliced);
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark 2: Converting a small pack end to end
// ---------------------------------------------------------------------------

fn bench_convert_pack(c: &mut Criterion) {
    let input = build_pack(16, 128);

    c.bench_function("convert_16_skies_128px", |b| {
        b.iter(|| {
            let mut converter = SkyConverter::new(SkyConfig::default());
            let report = converter.convert(&input);
            let mut output = MemoryStore::new();
            let written = converter.close(&mut output).expect("memory store accepts writes");
            black_box((report, written));
        });
    });
}

criterion_group!(benches, bench_slice_atlas, bench_convert_pack);
criterion_main!(benches);
