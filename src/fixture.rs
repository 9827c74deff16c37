//! Per-test-run context
//!
//! Bundles the random identifiers, the patched destination config and a
//! record store owned by one test run.

use crate::config::loader::write_destination_config;
use crate::config::naming::{random_dataset_id, random_staging_path};
use crate::config::{create_config, DestinationConfig};
use crate::dumper::DataDumper;
use crate::error::TestkitError;
use crate::store::RecordStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// File name used by [`TestRun::write_config`]
pub const CONFIG_FILE_NAME: &str = "destination_config.json";

/// Everything one test run needs to stay isolated from other runs
#[derive(Debug, Clone)]
pub struct TestRun {
    dataset_id: String,
    staging_path: String,
    config: serde_json::Value,
    store: Arc<RecordStore>,
}

impl TestRun {
    /// Prepare a run from a base destination config
    ///
    /// A fresh dataset id and staging path (under `staging_prefix`) are
    /// generated and injected into a copy of the base config.
    pub fn prepare<P: AsRef<Path>>(base_config: P, staging_prefix: &str) -> Result<Self, TestkitError> {
        let dataset_id = random_dataset_id();
        let staging_path = random_staging_path(staging_prefix);
        let config = create_config(base_config, &dataset_id, Some(&staging_path))?;

        info!(dataset_id = %dataset_id, staging_path = %staging_path, "Prepared test run");

        Ok(Self {
            dataset_id,
            staging_path,
            config,
            store: Arc::new(RecordStore::new()),
        })
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Generated staging path; only injected into GCS staging configs
    pub fn staging_path(&self) -> &str {
        &self.staging_path
    }

    pub fn config(&self) -> &serde_json::Value {
        &self.config
    }

    pub fn destination_config(&self) -> Result<DestinationConfig, TestkitError> {
        DestinationConfig::from_value(&self.config)
    }

    pub fn store(&self) -> Arc<RecordStore> {
        Arc::clone(&self.store)
    }

    /// Dumper reading from this run's store
    pub fn store_dumper(&self) -> DataDumper {
        DataDumper::store_backed(self.store())
    }

    /// Persist the patched config into `dir` and return its path
    pub fn write_config<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, TestkitError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        write_destination_config(&path, &self.config)?;
        Ok(path)
    }
}
