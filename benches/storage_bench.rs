//! Benchmarks for the CSV load/save path and the in-memory sort.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tempfile::tempdir;

use fixlet_manager::{Fixlet, MalformedRowPolicy, records, storage};

/// Synthetic dataset with counts that are not already sorted.
fn make_fixlets(count: usize) -> Vec<Fixlet> {
    (0..count)
        .map(|i| {
            Fixlet::new(
                (i % 17) as i64,
                i as i64,
                format!("Security Update {i}"),
                if i % 3 == 0 { "High" } else { "Low" },
                ((i * 7919) % 1000) as u64,
            )
        })
        .collect()
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_save");
    for size in [100_usize, 10_000] {
        let fixlets = make_fixlets(size);
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("fixlets.csv");
        group.bench_with_input(BenchmarkId::from_parameter(size), &fixlets, |b, fixlets| {
            b.iter(|| storage::save(&path, fixlets).expect("save"));
        });
    }
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_load");
    for size in [100_usize, 10_000] {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("fixlets.csv");
        storage::save(&path, &make_fixlets(size)).expect("seed");
        group.bench_with_input(BenchmarkId::from_parameter(size), &path, |b, path| {
            b.iter(|| storage::load(path, MalformedRowPolicy::Skip).expect("load"));
        });
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let fixlets = make_fixlets(10_000);
    c.bench_function("sort_by_computer_count_10k", |b| {
        b.iter_batched(
            || fixlets.clone(),
            |mut batch| records::sort_by_computer_count(&mut batch),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_save, bench_load, bench_sort);
criterion_main!(benches);
