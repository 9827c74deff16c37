//! Configuration loader for the destination testkit
//!
//! Loads destination config documents (JSON) and the toolkit's own settings
//! from YAML files or environment variables.

use crate::config::TestkitConfiguration;
use crate::error::TestkitError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// YAML settings structure (for deserialization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsYaml {
    pub bigquery_endpoint: Option<String>,
    pub token_url: Option<String>,
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub service_account_path: Option<String>,
    pub log_level: Option<String>,
}

/// Read a destination config document
///
/// # Errors
///
/// Returns `IoError` if the file cannot be read and `ConfigurationError`
/// if it is not a JSON object.
pub fn load_destination_config<P: AsRef<Path>>(path: P) -> Result<serde_json::Value, TestkitError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        TestkitError::IoError(format!(
            "Failed to read config file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;

    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        TestkitError::ConfigurationError(format!(
            "Failed to parse config file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;

    if !value.is_object() {
        return Err(TestkitError::ConfigurationError(format!(
            "Config file {} must contain a JSON object",
            path.as_ref().display()
        )));
    }

    Ok(value)
}

/// Write a config document as pretty-printed JSON
pub fn write_destination_config<P: AsRef<Path>>(
    path: P,
    config: &serde_json::Value,
) -> Result<(), TestkitError> {
    let content = serde_json::to_string_pretty(config).map_err(|e| {
        TestkitError::ConfigurationError(format!("Failed to serialize config: {}", e))
    })?;
    std::fs::write(path.as_ref(), content).map_err(|e| {
        TestkitError::IoError(format!(
            "Failed to write config file {}: {}",
            path.as_ref().display(),
            e
        ))
    })
}

/// Load toolkit settings from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<TestkitConfiguration, TestkitError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        TestkitError::IoError(format!(
            "Failed to read settings file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;

    let yaml: SettingsYaml = serde_yaml::from_str(&content)
        .map_err(|e| TestkitError::ConfigurationError(format!("Failed to parse YAML: {}", e)))?;

    let mut config = TestkitConfiguration::new();

    if let Some(endpoint) = yaml.bigquery_endpoint {
        config = config.with_bigquery_endpoint(endpoint);
    }
    if let Some(token_url) = yaml.token_url {
        config = config.with_token_url(token_url);
    }
    if let Some(token) = yaml.access_token {
        config = config.with_access_token(token);
    }
    // Partial refresh credentials must reach validate()
    config.client_id = yaml.client_id.map(SecretString::new);
    config.client_secret = yaml.client_secret.map(SecretString::new);
    config.refresh_token = yaml.refresh_token.map(SecretString::new);
    if let Some(path) = yaml.service_account_path {
        config = config.with_service_account_path(PathBuf::from(path));
    }
    if let Some(level) = yaml.log_level {
        config = config.with_log_level(level);
    }

    config.validate()?;
    Ok(config)
}

/// Load toolkit settings from environment variables
///
/// Every variable is optional:
/// - `BIGQUERY_ENDPOINT`, `GOOGLE_TOKEN_URL`
/// - `GOOGLE_OAUTH_ACCESS_TOKEN`
/// - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, `GOOGLE_REFRESH_TOKEN`
/// - `GOOGLE_APPLICATION_CREDENTIALS`
/// - `TESTKIT_LOG_LEVEL`
pub fn load_from_env() -> Result<TestkitConfiguration, TestkitError> {
    let mut config = TestkitConfiguration::new();

    if let Ok(endpoint) = std::env::var("BIGQUERY_ENDPOINT") {
        config = config.with_bigquery_endpoint(endpoint);
    }
    if let Ok(token_url) = std::env::var("GOOGLE_TOKEN_URL") {
        config = config.with_token_url(token_url);
    }
    if let Ok(token) = std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN") {
        config = config.with_access_token(token);
    }
    config.client_id = std::env::var("GOOGLE_CLIENT_ID").ok().map(SecretString::new);
    config.client_secret = std::env::var("GOOGLE_CLIENT_SECRET").ok().map(SecretString::new);
    config.refresh_token = std::env::var("GOOGLE_REFRESH_TOKEN").ok().map(SecretString::new);
    if let Ok(path) = std::env::var("GOOGLE_APPLICATION_CREDENTIALS") {
        config = config.with_service_account_path(PathBuf::from(path));
    }
    if let Ok(level) = std::env::var("TESTKIT_LOG_LEVEL") {
        config = config.with_log_level(level);
    }

    config.validate()?;
    Ok(config)
}
