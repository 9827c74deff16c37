//! Integration tests for the in-memory record store

mod common;

use common::create_test_record;
use destination_testkit::record::parse_messages;
use destination_testkit::{RecordStore, StreamIdentity};
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn test_unwritten_key_reads_empty() {
    let store = RecordStore::new();
    assert!(store.read_file("ns1.stream1").is_empty());
    assert!(store.keys().is_empty());
}

#[test]
fn test_example_append_and_isolation() {
    let store = RecordStore::new();
    let stream = StreamIdentity::new(Some("ns1"), "stream1");
    let record_a = create_test_record(&stream, 1);
    let record_b = create_test_record(&stream, 2);

    store.insert("ns1.stream1", vec![record_a.clone()]);
    store.insert("ns1.stream1", vec![record_b.clone()]);

    assert_eq!(store.read_file("ns1.stream1"), vec![record_a, record_b]);
    assert!(store.read_file("ns2.stream1").is_empty());
}

#[test]
fn test_stream_keyed_access_matches_raw_key() {
    let store = RecordStore::new();
    let stream = StreamIdentity::new(Some("public"), "users");
    store.insert_for(&stream, vec![create_test_record(&stream, 7)]);

    assert_eq!(store.read_file("public.users").len(), 1);
    assert_eq!(store.read_stream(&stream), store.read_file("public.users"));
    assert_eq!(store.record_count("public.users"), 1);
}

#[test]
fn test_concurrent_inserts_keep_batches_contiguous() {
    let store = Arc::new(RecordStore::new());
    let stream = StreamIdentity::new(Some("ns"), "shared");
    let num_threads = 8;
    let batches_per_thread = 50;
    let batch_size = 3;

    let mut handles = vec![];
    for thread_id in 0..num_threads {
        let store = Arc::clone(&store);
        let stream = stream.clone();
        handles.push(thread::spawn(move || {
            for batch_id in 0..batches_per_thread {
                let batch = (0..batch_size).map(|seq| {
                    let mut record = create_test_record(&stream, seq);
                    record.data = json!({ "thread": thread_id, "batch": batch_id, "seq": seq });
                    record
                });
                store.insert_for(&stream, batch);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("insert thread panicked");
    }

    let records = store.read_stream(&stream);
    assert_eq!(
        records.len(),
        (num_threads * batches_per_thread * batch_size) as usize
    );

    for chunk in records.chunks(batch_size as usize) {
        let thread_id = &chunk[0].data["thread"];
        let batch_id = &chunk[0].data["batch"];
        for (seq, record) in chunk.iter().enumerate() {
            assert_eq!(&record.data["thread"], thread_id);
            assert_eq!(&record.data["batch"], batch_id);
            assert_eq!(record.data["seq"], json!(seq));
        }
    }

    // per-thread order survives interleaving
    for thread_id in 0..num_threads {
        let batches: Vec<i64> = records
            .iter()
            .filter(|r| r.data["thread"] == json!(thread_id) && r.data["seq"] == json!(0))
            .map(|r| r.data["batch"].as_i64().unwrap())
            .collect();
        let expected: Vec<i64> = (0..batches_per_thread).collect();
        assert_eq!(batches, expected);
    }
}

#[test]
fn test_concurrent_new_keys_are_not_lost() {
    let store = Arc::new(RecordStore::new());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let stream = StreamIdentity::new(Some("ns"), &format!("stream{}", i));
                store.insert_for(&stream, vec![create_test_record(&stream, i)]);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.keys().len(), 16);
    for i in 0..16 {
        assert_eq!(store.record_count(&format!("ns.stream{}", i)), 1);
    }
}

#[test]
fn test_write_messages_from_jsonl() {
    let input = r#"{"type":"RECORD","record":{"stream":"users","namespace":"public","data":{"id":1},"emitted_at":1}}
{"type":"STATE","state":{"type":"STREAM","stream":{"stream_descriptor":{"name":"users"}}}}
{"type":"RECORD","record":{"stream":"orders","data":{"id":2},"emitted_at":2}}
{"type":"LOG","log":{"level":"INFO","message":"done"}}
"#;
    let store = RecordStore::new();
    let stored = store.write_messages(parse_messages(input).unwrap());

    assert_eq!(stored, 2);
    assert_eq!(store.keys(), vec!["orders".to_string(), "public.users".to_string()]);
    assert_eq!(store.read_file("public.users")[0].data, json!({"id": 1}));
}
