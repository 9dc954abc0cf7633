//! Benchmarks for the exact search engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use exact_search::prelude::*;
use rand::prelude::*;

fn generate_dataset(n: usize, dim: usize, seed: u64) -> DenseDataset<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<Vec<f32>> = (0..n)
        .map(|_| (0..dim).map(|_| rng.gen::<f32>()).collect())
        .collect();
    DenseDataset::from_vecs(data).unwrap()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    let queries = generate_dataset(100, 64, 123);
    for &n in &[1000, 5000] {
        let data = generate_dataset(n, 64, 42);

        for (parallel, label) in [(false, "sequential"), (true, "parallel")] {
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| {
                    let mut engine = ExactSearchEngine::new(&data, &queries, 10, 1.0).unwrap();
                    engine.set_parallel(parallel);
                    engine.set_parallel_threshold(1);
                    engine.compute_all_distances(&DistanceMeasure::SquaredL2).unwrap();
                    black_box(engine.is_built())
                })
            });
        }
    }

    group.finish();
}

fn benchmark_cached_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached");

    let data = generate_dataset(5000, 32, 42);
    let queries = generate_dataset(100, 32, 123);
    let l2 = DistanceMeasure::L2;
    let mut engine = ExactSearchEngine::new(&data, &queries, 10, 1.0).unwrap();
    engine.compute_all_distances(&l2).unwrap();

    group.bench_function("nearest_one", |b| {
        b.iter(|| black_box(engine.nearest_one(&l2).unwrap()))
    });

    for &n in &[1usize, 10, 50] {
        engine.set_num_neighbors(n);
        group.bench_with_input(BenchmarkId::new("top_n", n), &n, |b, _| {
            b.iter(|| black_box(engine.top_n(&l2).unwrap()))
        });
    }

    group.bench_function("range_query", |b| {
        b.iter(|| black_box(engine.range_query(&l2).unwrap()))
    });

    group.finish();
}

fn benchmark_distance_measures(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_measures");

    let dim = 128;
    let a = Datapoint::dense((0..dim).map(|i| i as f32 / dim as f32).collect::<Vec<_>>());
    let b = Datapoint::dense((0..dim).map(|i| (dim - i) as f32 / dim as f32).collect::<Vec<_>>());

    for measure in [
        DistanceMeasure::SquaredL2,
        DistanceMeasure::L2,
        DistanceMeasure::L1,
        DistanceMeasure::Cosine,
        DistanceMeasure::Chebyshev,
    ] {
        group.bench_function(measure.name(), |bench| {
            bench.iter(|| black_box(measure.distance(&a.as_ptr(), &b.as_ptr())))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_build,
    benchmark_cached_queries,
    benchmark_distance_measures
);
criterion_main!(benches);
