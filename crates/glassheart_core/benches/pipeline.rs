use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glassheart_core::{FilterCache, FilterParameters};
use std::time::Instant;

fn bench_filter_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_pipeline");

    for &(width, height, aberration) in &[(200, 50, 0.0), (200, 50, 5.0), (1280, 720, 5.0)] {
        let params = FilterParameters::new(width, height, 25.0, 8.0, 100.0, aberration);
        let label = format!("{width}x{height}_c{aberration}");

        group.bench_with_input(BenchmarkId::new("generate", &label), &params, |b, p| {
            b.iter(|| black_box(p).build_filter())
        });

        let mut cache = FilterCache::new();
        let now = Instant::now();
        cache.put_at(&params, params.build_filter(), now);

        group.bench_with_input(BenchmarkId::new("cache_hit", &label), &params, |b, p| {
            b.iter(|| cache.get_at(black_box(p), now))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter_pipeline);
criterion_main!(benches);
