use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

/// Where quote payloads come from. Implementations return the raw body;
/// shape validation happens in the controller.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self) -> Result<Value, FetchError>;
}

pub struct HttpQuoteSource {
    http: Client,
    url: String,
}

impl HttpQuoteSource {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(Client::builder().build()?, url))
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpError {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport_error)?;
        // A body that is not JSON cannot be a quote list; Null is rejected
        // downstream as an empty payload.
        Ok(serde_json::from_slice(&body).unwrap_or_else(|err| {
            debug!(%err, url = %self.url, "quote response body is not JSON");
            Value::Null
        }))
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::NetworkFailure(err.to_string())
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
