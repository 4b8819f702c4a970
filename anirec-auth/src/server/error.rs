use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Provider answered the token exchange with an error; relayed to the
    /// caller with the provider's status code and fields.
    #[error("Provider error: {error}")]
    Provider {
        status: StatusCode,
        error: String,
        message: Option<String>,
        hint: Option<String>,
    },

    /// Provider returned something that is not JSON (typically an HTML
    /// error page). Carries a truncated excerpt for diagnostics.
    #[error("Invalid response type")]
    InvalidResponseType { message: String, details: String },

    /// Resource fetch failed upstream; the status code is relayed.
    #[error("MyAnimeList API error: {status}")]
    Upstream { status: StatusCode },

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Anything internal. The message is already safe to show; causes are
    /// logged where the error is constructed, never echoed.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ServerError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ServerError::Provider {
                status,
                error,
                message,
                hint,
            } => {
                // Absent provider fields stay absent, they are not nulled.
                let mut body = serde_json::Map::new();
                body.insert("error".to_string(), json!(error));
                if let Some(message) = message {
                    body.insert("message".to_string(), json!(message));
                }
                if let Some(hint) = hint {
                    body.insert("hint".to_string(), json!(hint));
                }
                (status, serde_json::Value::Object(body))
            }
            ServerError::InvalidResponseType { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Invalid response type",
                    "message": message,
                    "details": details,
                }),
            ),
            ServerError::Upstream { status } => (
                status,
                json!({ "error": format!("MyAnimeList API error: {}", status.as_u16()) }),
            ),
            ServerError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": msg }),
            ),
            ServerError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": msg }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(err: config::ConfigError) -> Self {
        ServerError::Configuration(format!("Configuration error: {}", err))
    }
}
