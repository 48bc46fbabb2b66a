use axum::body::Bytes;
use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    Client, StatusCode,
};
use thiserror::Error;

use crate::config::Settings;

pub const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("no upstream API key configured")]
    MissingCredential,
    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("upstream answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("reading upstream body failed: {0}")]
    Body(#[source] reqwest::Error),
}

/// A successful upstream answer, untouched.
#[derive(Debug, Clone)]
pub struct UpstreamBody {
    pub content_type: Option<HeaderValue>,
    pub bytes: Bytes,
}

#[derive(Clone)]
pub struct ApiContext {
    http: Client,
    upstream_url: String,
    api_key: Option<String>,
}

impl ApiContext {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.upstream_timeout())
            .build()?;
        Ok(Self::with_client(
            http,
            settings.upstream_url.clone(),
            settings.upstream_api_key.clone(),
        ))
    }

    pub fn with_client(http: Client, upstream_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            upstream_url,
            api_key,
        }
    }

    /// Forwards one request upstream and returns its body byte for byte.
    pub async fn fetch_quotes(&self) -> Result<UpstreamBody, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredential)?;

        let response = self
            .http
            .get(&self.upstream_url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(UpstreamError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let bytes = response.bytes().await.map_err(UpstreamError::Body)?;
        Ok(UpstreamBody {
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
