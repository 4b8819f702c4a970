use axum::{extract::State, Json};

use crate::common::TokenPair;
use crate::server::{error::ServerError, models::TokenExchangeRequest, AppState};

/// Token-exchange proxy. The browser-side flow sends `{code, codeVerifier}`;
/// the client secret is attached here, server-side only.
pub async fn exchange_token(
    State(state): State<AppState>,
    Json(req): Json<TokenExchangeRequest>,
) -> Result<Json<TokenPair>, ServerError> {
    let code = req
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Missing authorization code".to_string()))?;
    let code_verifier = req.code_verifier.unwrap_or_default();

    let span = tracing::info_span!("exchange_token", code = %redact(&code));
    let _enter = span.enter();

    tracing::info!(verifier = %redact(&code_verifier), "attempting token exchange");

    let tokens = state.token_client.exchange_code(&code, &code_verifier).await?;

    tracing::info!("token exchange successful");

    Ok(Json(tokens))
}

/// First few characters only; codes and verifiers never hit the logs whole.
fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(5).collect();
    format!("{}...", prefix)
}
