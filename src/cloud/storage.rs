//! GCS staging store
//!
//! Builds the object store that backs a destination's GCS staging area.

use crate::config::{DestinationConfig, TestkitConfiguration};
use crate::error::TestkitError;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::ObjectStore;
use std::sync::Arc;
use tracing::info;

/// Create the staging object store for a destination config
///
/// Returns `Ok(None)` when the config does not stage through GCS or names
/// no bucket path to stage under. The
/// destination's `credentials_json` service-account key is used when
/// present, then the settings' `service_account_path`, then the ambient
/// credentials `object_store` discovers on its own.
pub fn create_staging_store(
    config: &DestinationConfig,
    settings: &TestkitConfiguration,
) -> Result<Option<Arc<dyn ObjectStore>>, TestkitError> {
    let Some((bucket, _)) = config.staging_location() else {
        return Ok(None);
    };

    let mut builder = GoogleCloudStorageBuilder::new().with_bucket_name(bucket);

    if let Some(key) = config.credentials_json.as_deref().filter(|k| !k.trim().is_empty()) {
        builder = builder.with_service_account_key(key);
    } else if let Some(path) = &settings.service_account_path {
        builder = builder.with_service_account_path(path.to_string_lossy());
    }

    let store = builder.build().map_err(|e| {
        TestkitError::ConfigurationError(format!(
            "Failed to build GCS store for bucket {}: {}",
            bucket, e
        ))
    })?;

    info!(bucket, "Created GCS staging store");
    Ok(Some(Arc::new(store)))
}
