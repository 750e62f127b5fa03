// Criterion benchmarks for Dealflow

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use dealflow::core::CandidateListStore;
use dealflow::models::{CandidateMatch, ListId, MatchBand};

fn create_candidate(id: usize) -> CandidateMatch {
    CandidateMatch {
        id: format!("startup-{}", id),
        name: format!("Startup {}", id),
        sector: Some(if id % 2 == 0 { "Fintech" } else { "HealthTech" }.to_string()),
        stage: Some("Seed".to_string()),
        band: if id % 3 == 0 { MatchBand::High } else { MatchBand::Medium },
        match_reason: "Strong fit for Fintech".to_string(),
        visible_risk: None,
        fit_score: (id % 100) as f64 / 100.0,
    }
}

fn create_candidates(count: usize) -> Vec<CandidateMatch> {
    (0..count).map(create_candidate).collect()
}

fn loaded_store(count: usize) -> CandidateListStore {
    let mut store = CandidateListStore::new();
    store.load(ListId::Curated, create_candidates(count));
    store.load(ListId::Search, create_candidates(count / 2));
    store
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for count in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter_batched(
                || create_candidates(count),
                |records| {
                    let mut store = CandidateListStore::new();
                    black_box(store.load(ListId::Curated, records))
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_remove_and_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_and_restore");

    for count in [10, 100, 1000].iter() {
        let target = format!("startup-{}", count / 4);

        group.bench_with_input(BenchmarkId::new("remove_from_all", count), count, |b, &count| {
            b.iter_batched(
                || loaded_store(count),
                |mut store| black_box(store.remove_from_all(black_box(&target))),
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("rollback", count), count, |b, &count| {
            b.iter_batched(
                || {
                    let mut store = loaded_store(count);
                    let snapshot = store.remove_from_all(&target);
                    (store, snapshot)
                },
                |(mut store, snapshot)| black_box(store.restore(snapshot)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_remove_and_restore);
criterion_main!(benches);
