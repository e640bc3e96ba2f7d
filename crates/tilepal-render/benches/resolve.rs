//! Benchmarks for the CPU lookup chain

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tilepal_render::{
    ChainConfig, ColorResolver, GlyphUv, IndexedLookup, Size, UnitPos, render_fullscreen,
};
use tilepal_test_utils::fixtures;

fn lookup() -> IndexedLookup {
    IndexedLookup::from_config(fixtures::diagonal_tables(), &ChainConfig::default())
}

fn bench_single_fragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_fragment");
    let lookup = lookup();
    let uv = GlyphUv::new(0.3, 0.7);
    let pos = UnitPos::new(0.6, 0.2);

    group.bench_function("float_trace", |b| {
        b.iter(|| black_box(lookup.resolve(black_box(uv), black_box(pos))))
    });

    group.bench_function("integer_select", |b| {
        b.iter(|| black_box(lookup.resolve_exact(black_box(uv), black_box(pos))))
    });

    group.finish();
}

fn bench_fullscreen(c: &mut Criterion) {
    let mut group = c.benchmark_group("fullscreen");
    let lookup = lookup();

    for (width, height) in [(64u32, 60u32), (256, 240)] {
        let size = Size::new(width, height);
        group.throughput(Throughput::Elements(size.area() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &size,
            |b, &size| b.iter(|| black_box(render_fullscreen(size, &lookup))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_fragment, bench_fullscreen);
criterion_main!(benches);
