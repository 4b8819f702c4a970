mod models;

pub use models::ProxyClientError;
use models::*;
use reqwest::Client;
use std::time::Duration;

use crate::client::callback::TokenExchange;
use crate::common::TokenPair;

/// HTTP client for the server-side token-exchange proxy. The proxy holds
/// the client secret; this client only ever sends the code and verifier.
pub struct ProxyClient {
    http_client: Client,
    server_url: String,
}

impl ProxyClient {
    pub fn new(server_url: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            server_url,
        }
    }

    pub async fn exchange_token(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenPair, ProxyClientError> {
        let url = format!("{}/auth/token", self.server_url);
        let req = TokenExchangeRequest {
            code: code.to_string(),
            code_verifier: code_verifier.to_string(),
        };

        let response = self.http_client.post(&url).json(&req).send().await?;
        let status = response.status();

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                excerpt = %body.chars().take(200).collect::<String>(),
                "non-JSON response from token proxy"
            );
            return Err(ProxyClientError::InvalidResponse(
                "Server returned invalid response format".to_string(),
            ));
        }

        if !status.is_success() {
            let body: ExchangeErrorBody = response.json().await?;
            return Err(ProxyClientError::OAuth(
                body.message.unwrap_or(body.error),
            ));
        }

        Ok(response.json().await?)
    }
}

impl TokenExchange for ProxyClient {
    async fn exchange(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenPair, ProxyClientError> {
        self.exchange_token(code, code_verifier).await
    }
}
