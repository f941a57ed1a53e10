//! Benchmark repeated A* queries on one engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gridstar_core::{Grid, Point};
use gridstar_paths::{AStar, Heuristic, SearchConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Square grid with roughly one wall in five, corners kept open.
fn create_grid(size: usize, seed: u64) -> Grid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows: Vec<Vec<i32>> = (0..size)
        .map(|_| {
            (0..size)
                .map(|_| i32::from(rng.random_range(0..5) == 0))
                .collect()
        })
        .collect();
    rows[0][0] = 0;
    rows[size - 1][size - 1] = 0;
    Grid::new(rows)
}

fn bench_corner_to_corner(c: &mut Criterion) {
    let mut group = c.benchmark_group("corner_to_corner");

    for size in [32usize, 128, 256].iter() {
        let grid = create_grid(*size, 42);
        let goal = Point::new(*size as i32 - 1, *size as i32 - 1);

        for heuristic in [Heuristic::Manhattan, Heuristic::Octile] {
            let cfg = SearchConfig::default().with_heuristic(heuristic);
            let Ok(mut astar) = AStar::with_config(grid.clone(), cfg) else {
                continue;
            };
            let id = BenchmarkId::new(format!("{heuristic:?}"), size);
            group.bench_with_input(id, size, |b, _| {
                b.iter(|| black_box(astar.find_path(Point::ZERO, goal)))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_corner_to_corner);
criterion_main!(benches);
