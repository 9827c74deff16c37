//! Configuration module for the destination testkit
//!
//! Destination config documents, per-test patching, and the toolkit's own
//! settings.

pub mod loader;
pub mod mutator;
pub mod naming;
pub mod types;

pub use mutator::{create_config, create_config_value};
pub use types::{DestinationConfig, LoadingMethod, TestkitConfiguration, UploadingMethod};
