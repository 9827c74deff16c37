//! Performance benchmark for the in-memory record store
//!
//! Measures append and snapshot cost with concurrent writers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use destination_testkit::{RecordMessage, RecordStore, StreamIdentity};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn create_test_batch(stream: &StreamIdentity, num_records: usize) -> Vec<RecordMessage> {
    (0..num_records)
        .map(|i| RecordMessage {
            stream: stream.name.clone(),
            namespace: stream.namespace.clone(),
            data: json!({ "id": i, "name": format!("name_{}", i) }),
            emitted_at: i as i64,
        })
        .collect()
}

fn bench_concurrent_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_store_insert");

    for writers in [1usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(writers), &writers, |b, &writers| {
            b.iter(|| {
                let store = Arc::new(RecordStore::new());
                let handles: Vec<_> = (0..writers)
                    .map(|w| {
                        let store = Arc::clone(&store);
                        thread::spawn(move || {
                            let stream = StreamIdentity::new(Some("bench"), &format!("s{}", w % 2));
                            for _ in 0..100 {
                                store.insert_for(&stream, create_test_batch(&stream, 10));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
                black_box(store.keys().len())
            });
        });
    }

    group.finish();
}

fn bench_read_file(c: &mut Criterion) {
    let store = RecordStore::new();
    let stream = StreamIdentity::new(Some("bench"), "read");
    store.insert_for(&stream, create_test_batch(&stream, 10_000));

    c.bench_function("record_store_read_10k", |b| {
        b.iter(|| black_box(store.read_stream(&stream).len()))
    });
}

criterion_group!(benches, bench_concurrent_insert, bench_read_file);
criterion_main!(benches);
