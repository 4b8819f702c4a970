use serde::{Deserialize, Serialize};
use thiserror::Error;

// Mirror server models
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenExchangeRequest {
    pub code: String,
    pub code_verifier: String,
}

/// Error body relayed by the proxy: provider error code plus optional
/// human-readable message and hint.
#[derive(Debug, Deserialize)]
pub struct ExchangeErrorBody {
    pub error: String,
    pub message: Option<String>,
    #[allow(dead_code)]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyClientError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    InvalidResponse(String),

    #[error("{0}")]
    OAuth(String),
}

impl From<reqwest::Error> for ProxyClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
