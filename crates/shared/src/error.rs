use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body returned by the proxy whenever the upstream call fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Reasons an upstream payload cannot yield a quote.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("no quote data received")]
    EmptyPayload,
    #[error("invalid quote format: `{field}` is missing or blank")]
    InvalidQuoteShape { field: &'static str },
}
