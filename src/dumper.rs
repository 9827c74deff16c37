//! Data dumpers
//!
//! A dumper reads back the records visible at a destination for one
//! stream. Which variant applies depends on the destination under test;
//! there is no default.

use crate::error::TestkitError;
use crate::record::{RecordMessage, StreamIdentity};
use crate::store::RecordStore;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Read-back capability for one destination
#[derive(Debug, Clone)]
pub enum DataDumper {
    /// Reads from an in-memory record store
    StoreBacked(Arc<RecordStore>),
    /// The destination discards its input, so nothing can be read back
    Unsupported { destination: String },
}

/// Outcome of a dump
#[derive(Debug, Clone, PartialEq)]
pub enum DumpOutcome {
    Records(Vec<RecordMessage>),
    NotApplicable { destination: String },
}

impl DumpOutcome {
    /// Convert into the stored records, failing for `NotApplicable`
    pub fn into_records(self) -> Result<Vec<RecordMessage>, TestkitError> {
        match self {
            DumpOutcome::Records(records) => Ok(records),
            DumpOutcome::NotApplicable { destination } => Err(TestkitError::NotApplicable(
                format!("destination '{}' does not support reading records back", destination),
            )),
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, DumpOutcome::Records(_))
    }
}

impl DataDumper {
    pub fn store_backed(store: Arc<RecordStore>) -> Self {
        DataDumper::StoreBacked(store)
    }

    pub fn unsupported(destination: impl Into<String>) -> Self {
        DataDumper::Unsupported {
            destination: destination.into(),
        }
    }

    /// Return the records visible at the destination for `stream`
    ///
    /// `config_location` identifies the destination configuration the test
    /// ran with. The store-backed variant keys purely on the stream.
    pub fn dump_records(&self, config_location: &Path, stream: &StreamIdentity) -> DumpOutcome {
        match self {
            DataDumper::StoreBacked(store) => {
                let records = store.read_stream(stream);
                debug!(
                    config = %config_location.display(),
                    stream = %stream,
                    count = records.len(),
                    "Dumped records from in-memory store"
                );
                DumpOutcome::Records(records)
            }
            DataDumper::Unsupported { destination } => DumpOutcome::NotApplicable {
                destination: destination.clone(),
            },
        }
    }
}
