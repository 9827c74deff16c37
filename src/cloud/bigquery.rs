//! BigQuery dataset client
//!
//! Thin client over the BigQuery REST API v2 covering the dataset calls the
//! lifecycle helpers need. Each call is a single attempt.

use crate::cloud::auth::AccessToken;
use crate::error::TestkitError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fully qualified dataset reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    pub project_id: String,
    pub dataset_id: String,
}

/// Dataset resource as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub dataset_reference: DatasetReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// Creation time in epoch milliseconds, string-encoded by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

impl Dataset {
    pub fn dataset_id(&self) -> &str {
        &self.dataset_reference.dataset_id
    }
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
}

/// Client for one project's datasets
#[derive(Debug, Clone)]
pub struct BigQueryClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    token: AccessToken,
}

impl BigQueryClient {
    /// Create a client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - REST root, e.g. `https://bigquery.googleapis.com`
    /// * `project_id` - Project owning the datasets
    /// * `token` - Bearer token sent with every call
    pub fn new(endpoint: &str, project_id: &str, token: AccessToken) -> Result<Self, TestkitError> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            TestkitError::ConfigurationError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            token,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn datasets_url(&self) -> String {
        format!(
            "{}/bigquery/v2/projects/{}/datasets",
            self.endpoint, self.project_id
        )
    }

    fn dataset_url(&self, dataset_id: &str) -> String {
        format!("{}/{}", self.datasets_url(), dataset_id)
    }

    /// Create a dataset in `location`
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` when the dataset is already there.
    pub async fn create_dataset(
        &self,
        dataset_id: &str,
        location: &str,
    ) -> Result<Dataset, TestkitError> {
        let body = Dataset {
            dataset_reference: DatasetReference {
                project_id: self.project_id.clone(),
                dataset_id: dataset_id.to_string(),
            },
            location: Some(location.to_string()),
            id: None,
            self_link: None,
            creation_time: None,
        };

        info!(dataset_id, location, "Creating BigQuery dataset");

        let response = self
            .http
            .post(self.datasets_url())
            .bearer_auth(self.token.secret())
            .json(&body)
            .send()
            .await?;

        let response = check_status(response, dataset_id).await?;
        parse_dataset(response).await
    }

    /// Fetch an existing dataset
    pub async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset, TestkitError> {
        debug!(dataset_id, "Fetching BigQuery dataset");

        let response = self
            .http
            .get(self.dataset_url(dataset_id))
            .bearer_auth(self.token.secret())
            .send()
            .await?;

        let response = check_status(response, dataset_id).await?;
        parse_dataset(response).await
    }

    /// Delete a dataset
    ///
    /// Returns `Ok(false)` when there was no dataset to delete. With
    /// `delete_contents`, contained tables are dropped along with it.
    pub async fn delete_dataset(
        &self,
        dataset_id: &str,
        delete_contents: bool,
    ) -> Result<bool, TestkitError> {
        info!(dataset_id, delete_contents, "Deleting BigQuery dataset");

        let response = self
            .http
            .delete(self.dataset_url(dataset_id))
            .query(&[("deleteContents", delete_contents)])
            .bearer_auth(self.token.secret())
            .send()
            .await?;

        match check_status(response, dataset_id).await {
            Ok(_) => Ok(true),
            Err(TestkitError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

async fn check_status(
    response: reqwest::Response,
    dataset_id: &str,
) -> Result<reqwest::Response, TestkitError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);

    Err(match status.as_u16() {
        409 => TestkitError::AlreadyExists(format!("dataset {}: {}", dataset_id, message)),
        404 => TestkitError::NotFound(format!("dataset {}: {}", dataset_id, message)),
        401 | 403 => TestkitError::AuthenticationError(message),
        code => TestkitError::ApiError {
            status: code,
            message,
        },
    })
}

async fn parse_dataset(response: reqwest::Response) -> Result<Dataset, TestkitError> {
    response.json().await.map_err(|e| TestkitError::ApiError {
        status: 200,
        message: format!("Failed to parse dataset response: {}", e),
    })
}
