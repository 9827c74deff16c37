//! Configuration types for the destination testkit
//!
//! This module defines the typed view of a destination configuration
//! document and the settings the toolkit itself runs with.

use crate::error::TestkitError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_PROJECT_ID: &str = "project_id";
pub const CONFIG_DATASET_ID: &str = "dataset_id";
pub const CONFIG_DATASET_LOCATION: &str = "dataset_location";
pub const CONFIG_CREDENTIALS: &str = "credentials_json";
pub const LOADING_METHOD: &str = "loading_method";
pub const METHOD: &str = "method";
pub const GCS_BUCKET_NAME: &str = "gcs_bucket_name";
pub const GCS_BUCKET_PATH: &str = "gcs_bucket_path";

/// `loading_method.method` value selecting object-store staging
pub const GCS_STAGING: &str = "GCS Staging";

pub const DEFAULT_BIGQUERY_ENDPOINT: &str = "https://bigquery.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// How the destination uploads data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadingMethod {
    /// Direct inserts into the warehouse
    Standard,
    /// Files staged in a GCS bucket, then bulk loaded
    Gcs,
}

impl UploadingMethod {
    pub fn from_method(method: Option<&str>) -> Self {
        match method {
            Some(m) if m.eq_ignore_ascii_case(GCS_STAGING) => UploadingMethod::Gcs,
            _ => UploadingMethod::Standard,
        }
    }
}

/// `loading_method` section of a destination config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadingMethod {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub gcs_bucket_name: Option<String>,
    #[serde(default)]
    pub gcs_bucket_path: Option<String>,
    /// HMAC or other credential block, kept opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<serde_json::Value>,
    #[serde(
        rename = "keep_files_in_gcs-bucket",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub keep_files_in_gcs_bucket: Option<String>,
}

impl LoadingMethod {
    pub fn uploading_method(&self) -> UploadingMethod {
        UploadingMethod::from_method(self.method.as_deref())
    }
}

/// Typed view of a destination configuration document
///
/// Unknown fields are kept in `extra` so a parsed config can be written
/// back without losing connector-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(default)]
    pub project_id: Option<String>,
    pub dataset_id: String,
    #[serde(default = "default_dataset_location")]
    pub dataset_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_method: Option<LoadingMethod>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_dataset_location() -> String {
    "US".to_string()
}

impl DestinationConfig {
    /// Parse the typed view out of a JSON config value
    pub fn from_value(value: &serde_json::Value) -> Result<Self, TestkitError> {
        serde_json::from_value(value.clone()).map_err(|e| {
            TestkitError::ConfigurationError(format!("Invalid destination config: {}", e))
        })
    }

    pub fn uploading_method(&self) -> UploadingMethod {
        self.loading_method
            .as_ref()
            .map(LoadingMethod::uploading_method)
            .unwrap_or(UploadingMethod::Standard)
    }

    pub fn is_gcs_staging(&self) -> bool {
        self.uploading_method() == UploadingMethod::Gcs
    }

    /// Bucket name and path prefix of the staging area, if staging is used
    ///
    /// A missing, blank or root (`/`) bucket path yields `None`: the bucket
    /// root is never treated as a staging prefix.
    pub fn staging_location(&self) -> Option<(&str, &str)> {
        if !self.is_gcs_staging() {
            return None;
        }
        let loading = self.loading_method.as_ref()?;
        let bucket = loading.gcs_bucket_name.as_deref()?;
        let path = loading.gcs_bucket_path.as_deref()?.trim_matches('/');
        if path.trim().is_empty() {
            return None;
        }
        Some((bucket, path))
    }
}

/// Settings for the toolkit's own cloud access and logging
#[derive(Debug, Clone)]
pub struct TestkitConfiguration {
    /// BigQuery REST endpoint (default: `https://bigquery.googleapis.com`)
    pub bigquery_endpoint: String,
    /// OAuth2 token endpoint (default: `https://oauth2.googleapis.com/token`)
    pub token_url: String,
    /// Pre-issued access token; takes precedence over the refresh grant
    pub access_token: Option<SecretString>,
    pub client_id: Option<SecretString>,
    pub client_secret: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
    /// Service account key file used for GCS when the destination config
    /// carries no `credentials_json`
    pub service_account_path: Option<PathBuf>,
    /// Log level filter (default: "info")
    pub log_level: String,
}

impl Default for TestkitConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl TestkitConfiguration {
    pub fn new() -> Self {
        Self {
            bigquery_endpoint: DEFAULT_BIGQUERY_ENDPOINT.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            access_token: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            service_account_path: None,
            log_level: "info".to_string(),
        }
    }

    pub fn with_bigquery_endpoint(mut self, endpoint: String) -> Self {
        self.bigquery_endpoint = endpoint;
        self
    }

    pub fn with_token_url(mut self, token_url: String) -> Self {
        self.token_url = token_url;
        self
    }

    pub fn with_access_token(mut self, token: String) -> Self {
        self.access_token = Some(SecretString::new(token));
        self
    }

    /// Set OAuth2 refresh-grant credentials
    pub fn with_refresh_credentials(
        mut self,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    ) -> Self {
        self.client_id = Some(SecretString::new(client_id));
        self.client_secret = Some(SecretString::new(client_secret));
        self.refresh_token = Some(SecretString::new(refresh_token));
        self
    }

    pub fn with_service_account_path(mut self, path: PathBuf) -> Self {
        self.service_account_path = Some(path);
        self
    }

    pub fn with_log_level(mut self, level: String) -> Self {
        self.log_level = level;
        self
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if:
    /// - an endpoint is not an `http://` or `https://` URL
    /// - only part of the refresh-grant credentials is set
    /// - `log_level` is not a valid log level
    pub fn validate(&self) -> Result<(), TestkitError> {
        validate_http_url("bigquery_endpoint", &self.bigquery_endpoint)?;
        validate_http_url("token_url", &self.token_url)?;

        let refresh_parts = [
            self.client_id.is_some(),
            self.client_secret.is_some(),
            self.refresh_token.is_some(),
        ];
        if refresh_parts.iter().any(|p| *p) && !refresh_parts.iter().all(|p| *p) {
            return Err(TestkitError::ConfigurationError(
                "client_id, client_secret and refresh_token must be set together".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(TestkitError::ConfigurationError(format!(
                "log_level must be one of {:?}, got: '{}'",
                valid_levels, self.log_level
            )));
        }

        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), TestkitError> {
    let parsed = url::Url::parse(value).map_err(|e| {
        TestkitError::ConfigurationError(format!("{} is not a valid URL '{}': {}", field, value, e))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(TestkitError::ConfigurationError(format!(
            "{} must use http or https, got scheme '{}'",
            field, scheme
        ))),
    }
}
