//! Authenticated HTTP client shared by the Supabase stores

use reqwest::{Method, RequestBuilder, StatusCode};
use std::time::Duration;

use crate::error::{AppError, Result};

/// Supabase project client
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Client {
    /// Create a client for the project at `base_url`
    ///
    /// # Arguments
    /// - base_url: project URL, e.g. `https://xyz.supabase.co`
    /// - api_key: anon or service key, sent as both `apikey` and bearer token
    /// - timeout: per-request timeout
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/storage/v1/{suffix}`
    pub fn storage_url(&self, suffix: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, suffix.trim_start_matches('/'))
    }

    /// `{base}/rest/v1/{table}`
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Request builder carrying the project credentials
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Map a non-success status to an `AppError`
    pub async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("{} failed: {}", action, body)));
        }
        Err(AppError::Storage(format!(
            "{} failed: [{}] {}",
            action,
            status.as_u16(),
            body
        )))
    }
}

/// Percent-encode each segment of an object path
pub fn encode_object_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
