use shared::error::ShapeError;
use thiserror::Error;

pub const FETCH_ERROR_MESSAGE: &str = "Failed to load quote. Please try again.";
pub const TIMEOUT_MESSAGE: &str = "Request timeout. Check your connection.";
pub const NETWORK_MESSAGE: &str = "Network error. Check your internet.";

/// Every way a single quote fetch can fail. None of these outlive the
/// trigger that caused them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {status}")]
    HttpError { status: u16 },
    #[error("no quote data received")]
    EmptyPayload,
    #[error("invalid quote format: `{field}` is missing or blank")]
    InvalidQuoteShape { field: &'static str },
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Timeout => TIMEOUT_MESSAGE,
            Self::NetworkFailure(_) => NETWORK_MESSAGE,
            Self::HttpError { .. } | Self::EmptyPayload | Self::InvalidQuoteShape { .. } => {
                FETCH_ERROR_MESSAGE
            }
        }
    }
}

impl From<ShapeError> for FetchError {
    fn from(value: ShapeError) -> Self {
        match value {
            ShapeError::EmptyPayload => Self::EmptyPayload,
            ShapeError::InvalidQuoteShape { field } => Self::InvalidQuoteShape { field },
        }
    }
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("required surface `{0}` was not provided")]
    MissingSurface(&'static str),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
