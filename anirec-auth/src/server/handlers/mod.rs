mod anime_list;
mod token;
mod user;

pub use anime_list::get_anime_list;
pub use token::exchange_token;
pub use user::get_user;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::server::error::ServerError;
use crate::server::models::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Pull the bearer token out of the Authorization header; 401 without it.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<String, ServerError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ServerError::Unauthorized("No access token provided".to_string()))
}

/// Map an upstream API failure to the relayed status or a generic 500.
pub(crate) fn map_upstream_error(err: mal_api::MalApiError, fallback: &str) -> ServerError {
    match err.status() {
        Some(status) => ServerError::Upstream {
            status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
        },
        None => {
            tracing::error!("upstream request failed: {}", err);
            ServerError::Internal(fallback.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extracts_value() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let headers = HeaderMap::new();
        let err = bearer_token(&headers).unwrap_err();
        assert!(matches!(err, ServerError::Unauthorized(_)));
    }

    #[test]
    fn empty_token_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());
    }
}
