use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use transit_core::{generate_network, GeneratorConfig, Point, RegionGrid, StationPool};

fn synthetic_points(side: i32) -> Vec<Point> {
    (0..side)
        .flat_map(|x| {
            (0..side).map(move |y| {
                let value = 1.0 + f64::from((x * 31 + y * 17) % 97) / 20.0;
                Point::new(x, y, value)
            })
        })
        .collect()
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for size in [16i32, 32, 64] {
        group.bench_with_input(BenchmarkId::new("grid", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let points = synthetic_points(size);
                    let config = GeneratorConfig {
                        route_count: 20,
                        ..GeneratorConfig::default()
                    };
                    let grid = RegionGrid::from_points(points.iter().copied());
                    let pool = StationPool::filter_and_sort(points, config.min_station_size);
                    (grid, pool, config)
                },
                |(mut grid, pool, config)| generate_network(&mut grid, &pool, &config),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(generation_benches, bench_generation);
criterion_main!(generation_benches);
