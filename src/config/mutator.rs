//! Per-test config patching
//!
//! Produces a copy of a base destination config with the dataset id (and,
//! for GCS staging, the staging path) replaced by test-specific values.

use crate::config::loader::load_destination_config;
use crate::config::types::{
    UploadingMethod, CONFIG_DATASET_ID, GCS_BUCKET_PATH, LOADING_METHOD, METHOD,
};
use crate::error::TestkitError;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Read `base_path` and return it with test-specific identifiers injected
///
/// `dataset_id` always replaces the top-level `dataset_id`. `staging_path`
/// replaces `loading_method.gcs_bucket_path` only when the config uses GCS
/// staging; `None` leaves the existing path in place. Uniqueness of the
/// supplied values is up to the caller.
pub fn create_config<P: AsRef<Path>>(
    base_path: P,
    dataset_id: &str,
    staging_path: Option<&str>,
) -> Result<Value, TestkitError> {
    let base = load_destination_config(base_path)?;
    create_config_value(base, dataset_id, staging_path)
}

/// Same as [`create_config`], applied to an already loaded config value
pub fn create_config_value(
    mut config: Value,
    dataset_id: &str,
    staging_path: Option<&str>,
) -> Result<Value, TestkitError> {
    let root = config.as_object_mut().ok_or_else(|| {
        TestkitError::ConfigurationError("Destination config must be a JSON object".to_string())
    })?;

    root.insert(
        CONFIG_DATASET_ID.to_string(),
        Value::String(dataset_id.to_string()),
    );

    let Some(staging_path) = staging_path else {
        return Ok(config);
    };

    if let Some(loading) = root.get_mut(LOADING_METHOD).and_then(Value::as_object_mut) {
        let method = loading.get(METHOD).and_then(Value::as_str);
        if UploadingMethod::from_method(method) == UploadingMethod::Gcs {
            debug!(staging_path, "Overriding GCS staging path");
            loading.insert(
                GCS_BUCKET_PATH.to_string(),
                Value::String(staging_path.to_string()),
            );
        }
    }

    Ok(config)
}
