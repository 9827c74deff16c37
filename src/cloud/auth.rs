//! Authentication and token refresh
//!
//! This module obtains OAuth2 access tokens for BigQuery REST calls.

use crate::config::TestkitConfiguration;
use crate::error::TestkitError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// OAuth2 token response
#[derive(Debug, Serialize, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: Option<String>,
    expires_in: Option<u64>,
    scope: Option<String>,
}

/// Bearer token for cloud API calls
#[derive(Debug, Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: String) -> Self {
        Self(SecretString::new(token))
    }

    pub fn secret(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Refresh an access token using the OAuth2 refresh-token grant
///
/// # Errors
///
/// Returns `TokenRefreshError` if the request fails or the endpoint answers
/// with a non-success status.
pub async fn refresh_access_token(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<AccessToken, TestkitError> {
    info!("Refreshing access token from {}", token_url);

    let client = reqwest::Client::builder().build().map_err(|e| {
        TestkitError::TokenRefreshError(format!("Failed to create HTTP client: {}", e))
    })?;

    let params = [
        ("grant_type", "refresh_token"),
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("refresh_token", refresh_token),
    ];

    let response = client
        .post(token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| {
            TestkitError::TokenRefreshError(format!("Failed to send token refresh request: {}", e))
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        warn!("Token refresh failed with status {}: {}", status, error_text);

        return Err(TestkitError::TokenRefreshError(format!(
            "Token refresh failed with status {}: {}",
            status, error_text
        )));
    }

    let token_response: TokenResponse = response.json().await.map_err(|e| {
        TestkitError::TokenRefreshError(format!("Failed to parse token response: {}", e))
    })?;

    debug!(
        "Token refresh successful, expires_in: {:?}",
        token_response.expires_in
    );

    Ok(AccessToken::new(token_response.access_token))
}

/// Pick an access token from the toolkit settings
///
/// A configured static token wins; otherwise the refresh grant is used.
pub async fn resolve_access_token(
    settings: &TestkitConfiguration,
) -> Result<AccessToken, TestkitError> {
    if let Some(token) = &settings.access_token {
        return Ok(AccessToken::new(token.expose_secret().clone()));
    }

    match (
        &settings.client_id,
        &settings.client_secret,
        &settings.refresh_token,
    ) {
        (Some(id), Some(secret), Some(refresh)) => {
            refresh_access_token(
                &settings.token_url,
                id.expose_secret(),
                secret.expose_secret(),
                refresh.expose_secret(),
            )
            .await
        }
        _ => Err(TestkitError::ConfigurationError(
            "no access token or refresh credentials configured".to_string(),
        )),
    }
}
