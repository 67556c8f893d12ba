use cdc_cluster::graph::build_neighbor_table;
use cdc_cluster::{Cdc, CdcConfig, NeighborSearch};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{concatenate, Array2, Axis};
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn gaussian_blobs(per_blob: usize, dims: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let a = Array2::random_using((per_blob, dims), normal, &mut rng);
    let b = Array2::random_using((per_blob, dims), normal, &mut rng) + 20.0;
    concatenate![Axis(0), a, b]
}

fn bench_neighbor_search(c: &mut Criterion) {
    let x = gaussian_blobs(2_500, 2, 1);
    let mut group = c.benchmark_group("neighbor_table_5000x2_k20");
    for search in [NeighborSearch::BruteForce, NeighborSearch::KdTree] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{search:?}")),
            &search,
            |b, &search| {
                b.iter(|| black_box(build_neighbor_table(x.view(), 20, search, true).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_fit_2d(c: &mut Criterion) {
    let x = gaussian_blobs(1_000, 2, 2);
    let cdc = Cdc::new(CdcConfig::new(20, 0.9));

    c.bench_function("cdc_fit_2000x2_k20", |b| {
        b.iter(|| black_box(cdc.fit(black_box(x.view())).unwrap()));
    });
}

fn bench_fit_3d(c: &mut Criterion) {
    let x = gaussian_blobs(500, 3, 3);
    let cdc = Cdc::new(CdcConfig::new(10, 0.7));

    c.bench_function("cdc_fit_1000x3_k10", |b| {
        b.iter(|| black_box(cdc.fit(black_box(x.view())).unwrap()));
    });
}

criterion_group!(benches, bench_neighbor_search, bench_fit_2d, bench_fit_3d);
criterion_main!(benches);
