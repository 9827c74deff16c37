//! Record and message types
//!
//! The line-delimited JSON messages a destination consumes, and the stream
//! identity used to key records written by those messages.

use crate::error::TestkitError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Logical stream a record belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
}

impl StreamIdentity {
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Key under which this stream's records are stored
    ///
    /// `"{namespace}.{name}"`, or just `"{name}"` for streams without a
    /// namespace. Two identities whose dotted forms coincide share a key.
    pub fn store_key(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}.{}", namespace, self.name),
            None => self.name.clone(),
        }
    }
}

impl std::fmt::Display for StreamIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.store_key())
    }
}

/// A single output record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMessage {
    pub stream: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub data: Value,
    /// Emission time in epoch milliseconds
    pub emitted_at: i64,
}

impl RecordMessage {
    /// Create a record stamped with the current time
    pub fn new(stream: &StreamIdentity, data: Value) -> Self {
        Self {
            stream: stream.name.clone(),
            namespace: stream.namespace.clone(),
            data,
            emitted_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn stream_identity(&self) -> StreamIdentity {
        StreamIdentity {
            namespace: self.namespace.clone(),
            name: self.stream.clone(),
        }
    }
}

/// Message type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Record,
    State,
    Log,
    Trace,
    Control,
    Spec,
    ConnectionStatus,
    Catalog,
}

/// Protocol message envelope
///
/// Only the payload matching `type` is expected to be set. State, log and
/// trace payloads are kept opaque since destinations under test never
/// interpret them here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Value>,
}

impl Message {
    pub fn record(record: RecordMessage) -> Self {
        Self {
            message_type: MessageType::Record,
            record: Some(record),
            state: None,
            log: None,
            trace: None,
        }
    }

    pub fn state(state: Value) -> Self {
        Self {
            message_type: MessageType::State,
            record: None,
            state: Some(state),
            log: None,
            trace: None,
        }
    }

    /// Serialize to a single JSON line, without a trailing newline
    pub fn to_json_line(&self) -> Result<String, TestkitError> {
        serde_json::to_string(self).map_err(|e| {
            TestkitError::MessageError(format!("Failed to serialize message: {}", e))
        })
    }
}

/// Parse line-delimited JSON messages
///
/// Blank lines are skipped. The first malformed line fails the whole parse,
/// reporting its 1-based line number.
pub fn parse_messages(input: &str) -> Result<Vec<Message>, TestkitError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| {
                TestkitError::MessageError(format!(
                    "Invalid message on line {}: {}",
                    idx + 1,
                    e
                ))
            })
        })
        .collect()
}
