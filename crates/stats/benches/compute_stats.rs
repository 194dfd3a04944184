//! Benchmarks for history aggregation
//!
//! Run with: cargo bench --package stats
//!
//! Histories are synthetic and seeded so runs are comparable.

use chrono::{DateTime, Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use data_loader::WatchRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stats::compute_stats_in;

const GENRES: [&str; 8] = [
    "Action",
    "Comedy",
    "Drama",
    "Horror",
    "Romance",
    "Science Fiction",
    "Thriller",
    "Animation",
];

fn synthetic_history(len: usize) -> Vec<WatchRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    let start = DateTime::<Utc>::from_timestamp(1_577_836_800, 0).unwrap_or_default();

    (0..len)
        .map(|i| {
            let genre_count = rng.random_range(0..4);
            let genres = (0..genre_count)
                .map(|_| GENRES[rng.random_range(0..GENRES.len())].to_string())
                .collect();
            // Roughly one in twenty records has no usable date
            let watched_at = if rng.random_range(0..20) == 0 {
                None
            } else {
                Some(start + Duration::minutes(rng.random_range(0..2_000_000)))
            };
            WatchRecord {
                title: Some(format!("Movie {}", i)),
                genres,
                runtime: Some(rng.random_range(70..200)),
                watched_at,
                ..WatchRecord::new(i as u64)
            }
        })
        .collect()
}

fn bench_compute_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_stats");
    for len in [100, 1_000, 10_000] {
        let history = synthetic_history(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &history, |b, history| {
            b.iter(|| {
                let stats = compute_stats_in(black_box(history), &Utc);
                black_box(stats)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute_stats);
criterion_main!(benches);
