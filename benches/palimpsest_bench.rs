//! Performance benchmarks for palimpsest
//!
//! Tracks the cost of the two index structures and of the end-to-end
//! edit/snapshot/rollback cycle.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use palimpsest::{ChainedIndex, EditMode, PalimpsestBuilder, SelectionHeap, DEFAULT_BUCKETS};
use std::hint::black_box;
use std::time::Duration;

/// Benchmark index insert+find at healthy and degraded load factors
fn bench_chained_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("chained_index");
    group.measurement_time(Duration::from_secs(2));

    for buckets in [DEFAULT_BUCKETS, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(buckets),
            &buckets,
            |b, &buckets| {
                b.iter(|| {
                    let mut index: ChainedIndex<u64, u64> = ChainedIndex::with_buckets(buckets);
                    for i in 0..1000u64 {
                        index.insert(i, i);
                    }
                    for i in 0..1000u64 {
                        black_box(index.find(&i));
                    }
                });
            },
        );
    }
    group.finish();
}

/// Benchmark the push-all-then-pop-K selection pattern
fn bench_selection_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection_heap");
    group.measurement_time(Duration::from_secs(2));

    for n in [100usize, 1000, 10000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let labels: Vec<String> = (0..n).map(|i| format!("file-{}", i)).collect();
            b.iter(|| {
                let mut heap = SelectionHeap::new();
                for (i, label) in labels.iter().enumerate() {
                    heap.push(label.clone(), (i as i64 * 7919) % 1000);
                }
                black_box(heap.drain_top(10));
            });
        });
    }
    group.finish();
}

/// Benchmark the full edit/snapshot/rollback cycle through the store
fn bench_edit_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_cycle");
    group.measurement_time(Duration::from_secs(2));
    group.sample_size(20);

    group.bench_function("fork_snapshot_rollback_x100", |b| {
        b.iter(|| {
            let mut store = PalimpsestBuilder::new().build();
            store.create_file("bench.txt").unwrap();
            for i in 0..100 {
                store.input("bench.txt", "content", EditMode::Replace).unwrap();
                store.snapshot("bench.txt", "checkpoint").unwrap();
                if i % 10 == 0 {
                    store.rollback("bench.txt", Some(0)).unwrap();
                }
            }
            black_box(store.history("bench.txt").unwrap());
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_chained_index,
    bench_selection_heap,
    bench_edit_cycle
);
criterion_main!(benches);
