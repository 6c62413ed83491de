use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use vacancy_geo::algorithms::fuzzy::{find_best_match, ratio};
use vacancy_geo::algorithms::geodesy::geodesic_distance_km;
use vacancy_geo::algorithms::matching::match_distinct_names;
use vacancy_geo::algorithms::Scorer;
use vacancy_geo::core::domain::{Gazetteer, GazetteerEntry};

const CITIES: [&str; 12] = [
    "berlin", "hamburg", "muenchen", "koeln", "frankfurt am main", "stuttgart", "duesseldorf",
    "leipzig", "dortmund", "essen", "bremen", "dresden",
];

fn synthetic_gazetteer(size: usize) -> Gazetteer {
    (0..size)
        .map(|i| {
            let base = CITIES[i % CITIES.len()];
            GazetteerEntry::new(
                format!("{} {}", base, i / CITIES.len()),
                47.0 + (i % 80) as f64 * 0.1,
                6.0 + (i % 90) as f64 * 0.1,
            )
        })
        .collect()
}

fn bench_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("ratio");

    group.bench_function("short_names", |b| {
        b.iter(|| ratio(black_box("muenchen"), black_box("munchen")));
    });

    group.bench_function("long_names", |b| {
        b.iter(|| {
            ratio(
                black_box("frankfurt am main hoechst"),
                black_box("frankfurt (oder) am main"),
            )
        });
    });

    group.finish();
}

fn bench_best_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_best_match");

    for size in [100usize, 1_000, 10_000] {
        let gazetteer = synthetic_gazetteer(size);
        let names = gazetteer.names();
        group.bench_with_input(BenchmarkId::from_parameter(size), &names, |b, names| {
            b.iter(|| find_best_match(black_box("duesseldorf 3"), names));
        });
    }

    group.finish();
}

fn bench_distinct_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_distinct_names");
    group.sample_size(20);

    let gazetteer = synthetic_gazetteer(2_000);
    let names: Vec<String> = (0..200)
        .map(|i| format!("{} {}", CITIES[i % CITIES.len()], i % 7))
        .collect();

    for parallel in [false, true] {
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| match_distinct_names(black_box(&names), &gazetteer, Scorer::Ratio, parallel));
        });
    }

    group.finish();
}

fn bench_geodesic(c: &mut Criterion) {
    let mut group = c.benchmark_group("geodesic_distance");

    group.bench_function("berlin_munich", |b| {
        b.iter(|| {
            geodesic_distance_km(
                black_box(52.52),
                black_box(13.405),
                black_box(48.1351),
                black_box(11.582),
            )
        });
    });

    group.bench_function("batch_1000", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let offset = i as f64 * 0.001;
                black_box(geodesic_distance_km(52.52, 13.405, 48.0 + offset, 11.0 + offset).ok());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ratio,
    bench_best_match,
    bench_distinct_names,
    bench_geodesic
);
criterion_main!(benches);
