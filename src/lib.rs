//! Destination Testkit
//!
//! Test-support utilities for data-warehouse destination connectors.
//! Provides per-test config patching, BigQuery dataset and GCS staging
//! scratch resources, and in-memory record stores that let a test read back
//! what a destination wrote.
//!
//! # Features
//!
//! - Randomized dataset ids and staging paths injected into a base config
//! - Create-or-fetch of a scratch BigQuery dataset
//! - Best-effort teardown of datasets and staged GCS objects
//! - Thread-safe in-memory record store keyed by stream
//! - Data dumpers that distinguish "no data" from "not readable"
//!
//! # Example
//!
//! ```no_run
//! use destination_testkit::{DataDumper, StreamIdentity, TestRun};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), destination_testkit::TestkitError> {
//! let run = TestRun::prepare("secrets/config.json", "test_staging")?;
//! let dumper = run.store_dumper();
//! let stream = StreamIdentity::new(Some("public"), "users");
//! let records = dumper
//!     .dump_records(Path::new("secrets/config.json"), &stream)
//!     .into_records()?;
//! assert!(records.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod cloud;
pub mod config;
pub mod dumper;
pub mod error;
pub mod fixture;
pub mod logging;
pub mod record;
pub mod store;

pub use config::{DestinationConfig, TestkitConfiguration};
pub use dumper::{DataDumper, DumpOutcome};
pub use error::TestkitError;
pub use fixture::TestRun;
pub use record::{Message, MessageType, RecordMessage, StreamIdentity};
pub use store::RecordStore;
