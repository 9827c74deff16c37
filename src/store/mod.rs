//! In-memory record store
//!
//! Simulates a destination backend: records are appended under a key
//! derived from their stream and can be read back at any time.
//!
//! A store is an ordinary value. Share it between the code under test and
//! the assertions with an `Arc`; each test run should own its own store so
//! parallel runs using the same stream names cannot observe each other.

use crate::record::{Message, MessageType, RecordMessage, StreamIdentity};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

type RecordLog = Arc<Mutex<Vec<RecordMessage>>>;

/// Keyed, append-only collection of record sequences
///
/// Safe to use from many threads at once without external locking.
#[derive(Debug, Default)]
pub struct RecordStore {
    files: RwLock<HashMap<String, RecordLog>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record log for `key`, creating it if absent
    fn log_for(&self, key: &str) -> RecordLog {
        {
            let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(log) = files.get(key) {
                return Arc::clone(log);
            }
        }

        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(files.entry(key.to_string()).or_default())
    }

    /// Append records to the sequence stored under `key`
    ///
    /// All records from one call end up contiguous and in iteration order,
    /// even when other threads append to the same key concurrently.
    pub fn insert<I>(&self, key: &str, records: I)
    where
        I: IntoIterator<Item = RecordMessage>,
    {
        let batch: Vec<RecordMessage> = records.into_iter().collect();
        if batch.is_empty() {
            return;
        }

        let log = self.log_for(key);
        let mut entries = log.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(key, appended = batch.len(), "Appending records to in-memory store");
        entries.extend(batch);
    }

    /// Snapshot of every record stored under `key`
    ///
    /// Returns an empty vector for keys that were never written.
    pub fn read_file(&self, key: &str) -> Vec<RecordMessage> {
        let log = {
            let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
            match files.get(key) {
                Some(log) => Arc::clone(log),
                None => return Vec::new(),
            }
        };
        let entries = log.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clone()
    }

    pub fn insert_for<I>(&self, stream: &StreamIdentity, records: I)
    where
        I: IntoIterator<Item = RecordMessage>,
    {
        self.insert(&stream.store_key(), records);
    }

    pub fn read_stream(&self, stream: &StreamIdentity) -> Vec<RecordMessage> {
        self.read_file(&stream.store_key())
    }

    /// Sorted keys of every sequence created so far
    pub fn keys(&self) -> Vec<String> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = files.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn record_count(&self, key: &str) -> usize {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        files
            .get(key)
            .map(|log| log.lock().unwrap_or_else(PoisonError::into_inner).len())
            .unwrap_or(0)
    }

    /// Consume protocol messages the way a destination would
    ///
    /// Record messages are appended under their stream's key, consecutive
    /// records of the same stream in one insert. Every other message type is
    /// ignored. Returns the number of records stored.
    pub fn write_messages<I>(&self, messages: I) -> usize
    where
        I: IntoIterator<Item = Message>,
    {
        let mut stored = 0;
        let mut pending: Vec<RecordMessage> = Vec::new();
        let mut pending_key: Option<String> = None;

        for message in messages {
            if message.message_type != MessageType::Record {
                continue;
            }
            let Some(record) = message.record else {
                continue;
            };

            let key = record.stream_identity().store_key();
            if pending_key.as_deref() != Some(key.as_str()) {
                if let Some(previous) = pending_key.take() {
                    stored += pending.len();
                    self.insert(&previous, pending.drain(..));
                }
                pending_key = Some(key);
            }
            pending.push(record);
        }

        if let Some(key) = pending_key {
            stored += pending.len();
            self.insert(&key, pending);
        }

        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(stream: &str, id: i64) -> RecordMessage {
        RecordMessage {
            stream: stream.to_string(),
            namespace: Some("ns1".to_string()),
            data: json!({ "id": id }),
            emitted_at: id,
        }
    }

    #[test]
    fn test_read_unknown_key_is_empty() {
        let store = RecordStore::new();
        assert!(store.read_file("ns1.missing").is_empty());
        assert_eq!(store.record_count("ns1.missing"), 0);
    }

    #[test]
    fn test_appends_preserve_order() {
        let store = RecordStore::new();
        store.insert("ns1.stream1", vec![record("stream1", 1)]);
        store.insert("ns1.stream1", vec![record("stream1", 2)]);

        let records = store.read_file("ns1.stream1");
        assert_eq!(records, vec![record("stream1", 1), record("stream1", 2)]);
        assert!(store.read_file("ns2.stream1").is_empty());
    }

    #[test]
    fn test_empty_insert_does_not_create_key() {
        let store = RecordStore::new();
        store.insert("ns1.stream1", Vec::new());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_write_messages_groups_by_stream() {
        let store = RecordStore::new();
        let messages = vec![
            Message::record(record("a", 1)),
            Message::state(json!({"cursor": 1})),
            Message::record(record("b", 2)),
            Message::record(record("a", 3)),
        ];

        assert_eq!(store.write_messages(messages), 3);
        assert_eq!(store.keys(), vec!["ns1.a".to_string(), "ns1.b".to_string()]);
        assert_eq!(
            store.read_file("ns1.a"),
            vec![record("a", 1), record("a", 3)]
        );
    }
}
