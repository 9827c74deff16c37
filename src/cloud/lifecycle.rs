//! Scratch resource lifecycle
//!
//! Create-or-fetch of the per-test dataset, and best-effort teardown of the
//! dataset and of staged objects. Teardown never fails a test: every
//! outcome, including failure, is returned as a [`TeardownOutcome`].

use crate::cloud::bigquery::{BigQueryClient, Dataset};
use crate::config::DestinationConfig;
use crate::error::TestkitError;
use futures::TryStreamExt;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use tracing::{error, info, warn};

/// Result of a best-effort cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// Nothing to do: missing client/handle, or not applicable to the config
    Skipped,
    /// The dataset was deleted
    Deleted,
    /// The dataset was already gone
    NotFound,
    /// Staged objects were removed
    Cleaned { deleted: usize },
    /// Cleanup failed; the failure has been logged
    Failed(String),
}

impl TeardownOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TeardownOutcome::Failed(_))
    }
}

/// Create the dataset, or fetch it if it already exists
///
/// The dataset is created in `config.dataset_location`. Any failure other
/// than a create conflict is returned to the caller.
pub async fn create_or_get_dataset(
    client: &BigQueryClient,
    config: &DestinationConfig,
    dataset_id: &str,
) -> Result<Dataset, TestkitError> {
    match client
        .create_dataset(dataset_id, &config.dataset_location)
        .await
    {
        Ok(dataset) => Ok(dataset),
        Err(e) if e.is_already_exists() => {
            info!(dataset_id, "Dataset already exists, reusing it");
            client.get_dataset(dataset_id).await
        }
        Err(e) => {
            error!(dataset_id, error = %e, "Failed to create dataset");
            Err(e)
        }
    }
}

/// Delete a dataset and everything in it
///
/// A missing client or dataset handle is a no-op.
pub async fn tear_down_dataset(
    client: Option<&BigQueryClient>,
    dataset: Option<&Dataset>,
) -> TeardownOutcome {
    let (Some(client), Some(dataset)) = (client, dataset) else {
        return TeardownOutcome::Skipped;
    };

    let dataset_id = dataset.dataset_id();
    match client.delete_dataset(dataset_id, true).await {
        Ok(true) => {
            info!(dataset_id, "BigQuery dataset deleted");
            TeardownOutcome::Deleted
        }
        Ok(false) => {
            warn!(dataset_id, "BigQuery dataset cleanup found nothing to delete");
            TeardownOutcome::NotFound
        }
        Err(e) => {
            error!(dataset_id, error = %e, "Failed to remove BigQuery resources after the test");
            TeardownOutcome::Failed(e.to_string())
        }
    }
}

/// Remove every staged object under the config's bucket path
///
/// Only acts when a store is given and the config stages through GCS with
/// a non-empty bucket path; the bucket root is never listed. Objects are
/// deleted one at a time since GCS offers no multi-object delete.
pub async fn tear_down_staging(
    store: Option<&dyn ObjectStore>,
    config: &DestinationConfig,
) -> TeardownOutcome {
    let Some(store) = store else {
        return TeardownOutcome::Skipped;
    };
    let Some((bucket, path)) = config.staging_location() else {
        if config.is_gcs_staging() {
            warn!("GCS staging config has no bucket path, leaving the bucket untouched");
        }
        return TeardownOutcome::Skipped;
    };

    match delete_prefix(store, path).await {
        Ok(0) => TeardownOutcome::Cleaned { deleted: 0 },
        Ok(deleted) => {
            info!(bucket, path, deleted, "Deleted staged file(s)");
            TeardownOutcome::Cleaned { deleted }
        }
        Err(e) => {
            error!(bucket, path, error = %e, "Failed to remove GCS resources after the test");
            TeardownOutcome::Failed(e.to_string())
        }
    }
}

async fn delete_prefix(store: &dyn ObjectStore, path: &str) -> Result<usize, TestkitError> {
    let prefix = ObjectPath::from(path);
    let objects: Vec<_> = store.list(Some(&prefix)).try_collect().await?;
    if objects.is_empty() {
        return Ok(0);
    }

    info!(path, count = objects.len(), "Tearing down staging path");
    for meta in &objects {
        store.delete(&meta.location).await?;
    }
    Ok(objects.len())
}
