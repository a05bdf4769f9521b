//! HTTP client for the Nivaran API.
//!
//! Provides a minimal client with optional Bearer auth, generic GET/POST
//! helpers, and domain methods (signup, login, report submission with the
//! signed-URL upload pipeline). The mobile app and dashboard tooling use
//! this client directly.

pub mod api;
pub mod upload;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use api::{CreateReportResponse, ReportDraft, ReportEnvelope, ReportListEnvelope, SubmitError};
pub use nivaran_core::models::{
    AuthResponse, FileSpec, ReportResponse, SignupRequest, UploadSlot, UploadUrlsRequest,
    UploadUrlsResponse, UserResponse,
};
pub use upload::{LocalFile, UploadError};

/// HTTP client for the Nivaran API with optional Bearer auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create an authenticated client from an existing token.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let mut client = Self::new(base_url)?;
        client.token = Some(token.into());
        Ok(client)
    }

    /// Create client from environment: NIVARAN_API_URL (or API_URL) and an
    /// optional JWT_TOKEN.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("NIVARAN_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        let mut client = Self::new(base_url)?;
        client.token = std::env::var("JWT_TOKEN").ok().filter(|t| !t.is_empty());
        Ok(client)
    }

    /// Install the bearer token returned by signup/login.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        request = self.apply_auth(request);

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);
        let request = self.apply_auth(request);

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// Raw client for custom requests (direct-to-storage PUTs). Signed URLs
    /// carry their own authorization; no Bearer header is applied.
    pub(crate) fn raw_client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.build_url("/api/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
    }

    #[test]
    fn test_token_installation() {
        let mut client = ApiClient::new("http://localhost:5000").unwrap();
        assert!(client.token.is_none());
        client.set_token("jwt-token");
        assert_eq!(client.token.as_deref(), Some("jwt-token"));
    }
}
