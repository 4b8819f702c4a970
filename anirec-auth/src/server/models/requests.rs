use serde::{Deserialize, Serialize};

// POST /auth/token
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenExchangeRequest {
    pub code: Option<String>,
    #[serde(default)]
    pub code_verifier: Option<String>,
}

// Health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
