//! Cloud access for test scratch resources
//!
//! BigQuery datasets over REST, GCS staging objects via `object_store`.

pub mod auth;
pub mod bigquery;
pub mod lifecycle;
pub mod storage;

pub use bigquery::{BigQueryClient, Dataset, DatasetReference};
pub use lifecycle::{create_or_get_dataset, tear_down_dataset, tear_down_staging, TeardownOutcome};
