//! Benchmarks for the edge-collapse skeletonization pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use curveskel_algorithms::{skeletonize, SkeletonizeParams};
use curveskel_core::primitives;

fn bench_skeletonize(c: &mut Criterion) {
    let sizes = [8usize, 16, 24];

    let mut group = c.benchmark_group("skeletonize");
    for &segments in &sizes {
        let mesh = primitives::cylinder(segments, segments, 1.0, 10.0)
            .expect("cylinder parameters are valid");
        group.bench_with_input(
            BenchmarkId::new("cylinder", segments),
            &mesh,
            |b, mesh| {
                b.iter(|| skeletonize(black_box(mesh), &SkeletonizeParams::new()).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_skeletonize);
criterion_main!(benches);
