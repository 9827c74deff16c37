//! Common test utilities
//!
//! Shared fixtures for the integration tests: base destination configs and
//! record builders.

#![allow(dead_code)]

use destination_testkit::{RecordMessage, StreamIdentity};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Route testkit logs to the test output
pub fn init_test_logging() {
    destination_testkit::logging::init_logging("debug");
}

/// Base config staging through GCS
pub fn gcs_base_config() -> Value {
    json!({
        "project_id": "test-project",
        "dataset_id": "base_dataset",
        "dataset_location": "EU",
        "credentials_json": "",
        "transformation_priority": "batch",
        "loading_method": {
            "method": "GCS Staging",
            "gcs_bucket_name": "test-bucket",
            "gcs_bucket_path": "base/path",
            "credential": {
                "credential_type": "HMAC_KEY",
                "hmac_key_access_id": "id",
                "hmac_key_secret": "secret"
            },
            "keep_files_in_gcs-bucket": "Delete all tmp files from GCS"
        }
    })
}

/// Base config using standard inserts
pub fn standard_base_config() -> Value {
    json!({
        "project_id": "test-project",
        "dataset_id": "base_dataset",
        "dataset_location": "US",
        "loading_method": {
            "method": "Standard",
            "gcs_bucket_path": "untouched/path"
        }
    })
}

/// Write a config value to `dir/config.json`
pub fn write_config(dir: &Path, config: &Value) -> PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(config).unwrap()).unwrap();
    path
}

/// Build a record for `stream` with an integer payload
pub fn create_test_record(stream: &StreamIdentity, id: i64) -> RecordMessage {
    RecordMessage {
        stream: stream.name.clone(),
        namespace: stream.namespace.clone(),
        data: json!({ "id": id }),
        emitted_at: 1_700_000_000_000 + id,
    }
}
