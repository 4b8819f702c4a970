//! Bearer-authenticated fetches against the proxy server. The access token
//! goes to our proxy only, never directly to MyAnimeList from here.

use std::time::Duration;

use anirec_auth::FlowError;
use mal_api::models::{AnimeListPage, UserProfile};
use reqwest::Client;

pub struct ProxyApi {
    http_client: Client,
    server_url: String,
}

impl ProxyApi {
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

    pub async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, FlowError> {
        let url = format!("{}/mal/user", self.server_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| FlowError::UpstreamFetch(format!("Failed to fetch user data: {}", e)))?;

        if !response.status().is_success() {
            return Err(FlowError::UpstreamFetch(format!(
                "Failed to fetch user data: {}",
                response.status().as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FlowError::UpstreamFetch(format!("Failed to fetch user data: {}", e)))
    }

    pub async fn fetch_anime_list(&self, access_token: &str) -> Result<AnimeListPage, FlowError> {
        let url = format!("{}/mal/anime-list", self.server_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| FlowError::UpstreamFetch(format!("Failed to fetch anime list: {}", e)))?;

        if !response.status().is_success() {
            return Err(FlowError::UpstreamFetch(format!(
                "Failed to fetch anime list: {}",
                response.status().as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FlowError::UpstreamFetch(format!("Failed to fetch anime list: {}", e)))
    }
}
