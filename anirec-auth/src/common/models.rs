use chrono::{serde::ts_seconds_option, DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token pair as returned by the token-exchange proxy, relayed verbatim
/// from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// Persisted form of the token pair, with the expiry resolved to an
/// absolute timestamp at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(with = "ts_seconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
}

// Treat tokens as expired slightly early so a fetch issued right at the
// boundary doesn't fail mid-flight.
const EXPIRY_BUFFER: Duration = Duration::minutes(5);

impl StoredToken {
    /// Whether the token should be considered unusable. Tokens without a
    /// known expiry are assumed live until the provider rejects them.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= Utc::now() + EXPIRY_BUFFER,
            None => false,
        }
    }
}

impl From<TokenPair> for StoredToken {
    fn from(tokens: TokenPair) -> Self {
        let expires_at = tokens
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs as i64));
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at,
        }
    }
}
