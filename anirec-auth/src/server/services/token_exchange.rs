use axum::http::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::common::TokenPair;
use crate::server::config::MalConfiguration;
use crate::server::error::ServerError;

const MAL_TOKEN_URL: &str = "https://myanimelist.net/v1/oauth2/token";

// How much of a non-JSON provider body to keep: enough to diagnose, short
// enough to never leak a full page into a response.
const DETAILS_EXCERPT_LEN: usize = 100;
const LOG_EXCERPT_LEN: usize = 200;

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: Option<String>,
    message: Option<String>,
    hint: Option<String>,
}

/// Exchanges authorization codes with the MyAnimeList token endpoint.
/// This is where the client secret lives; it is sent to the provider and
/// nowhere else.
pub struct TokenExchangeClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl TokenExchangeClient {
    pub fn new(config: &MalConfiguration) -> Self {
        Self::with_token_url(config, MAL_TOKEN_URL)
    }

    pub fn with_token_url(config: &MalConfiguration, token_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: token_url.into(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// Exchange an authorization code (plus its PKCE verifier) for a token
    /// pair, relaying provider errors with their original status.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenPair, ServerError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("token endpoint request failed: {}", e);
                ServerError::Internal("Internal server error during token exchange".to_string())
            })?;

        let status = response.status();

        // Guard against HTML error pages before touching the JSON parser.
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                excerpt = %excerpt(&body, LOG_EXCERPT_LEN),
                "non-JSON response from token endpoint"
            );
            return Err(ServerError::InvalidResponseType {
                message: "The authentication server returned an invalid response".to_string(),
                details: excerpt(&body, DETAILS_EXCERPT_LEN),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            tracing::error!("failed to read token endpoint body: {}", e);
            ServerError::Internal("Internal server error during token exchange".to_string())
        })?;

        if !status.is_success() {
            let err: ProviderErrorBody =
                serde_json::from_value(body).unwrap_or(ProviderErrorBody {
                    error: None,
                    message: None,
                    hint: None,
                });
            tracing::warn!(
                status = %status,
                error = err.error.as_deref().unwrap_or("unknown"),
                "token exchange rejected by provider"
            );
            return Err(ServerError::Provider {
                status: StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                error: err
                    .error
                    .unwrap_or_else(|| "Failed to exchange code for token".to_string()),
                message: err.message,
                hint: err.hint,
            });
        }

        serde_json::from_value(body).map_err(|e| {
            tracing::error!("malformed token response: {}", e);
            ServerError::Internal("Internal server error during token exchange".to_string())
        })
    }
}

/// First `len` characters of `s` with an ellipsis, char-boundary safe.
fn excerpt(s: &str, len: usize) -> String {
    let mut out: String = s.chars().take(len).collect();
    if s.chars().count() > len {
        out.push_str("...");
    }
    out
}
