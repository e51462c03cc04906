//! Benchmarks for the pallet loading solver.
//!
//! Measures full `pack` calls on instances of increasing raster density.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use palletpack_core::pack;

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");
    group.sample_size(20);

    for &(l, w, bl, bw) in &[(10, 10, 3, 2), (22, 16, 5, 3), (30, 22, 5, 3)] {
        group.bench_with_input(
            BenchmarkId::new("instance", format!("{l}x{w}-{bl}x{bw}")),
            &(l, w, bl, bw),
            |b, &(l, w, bl, bw)| {
                b.iter(|| {
                    let result = pack(black_box(l), black_box(w), black_box(bl), black_box(bw));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pack);
criterion_main!(benches);
