pub mod list;
pub mod models;

mod error;

pub use crate::error::MalApiError;
use crate::models::{AnimeListPage, UserProfile};

const BASE_URL: &str = "https://api.myanimelist.net/v2";

// Fixed single-page fetch; no pagination beyond this.
const ANIME_LIST_LIMIT: u32 = 150;
const ANIME_LIST_FIELDS: &str = "list_status,num_episodes,mean,media_type,main_picture";

/// Thin client for the MyAnimeList v2 API. Bearer tokens are supplied per
/// call, so one client serves every caller.
pub struct MalClient {
    http: reqwest::Client,
    base_url: String,
}

impl MalClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the authenticated user's profile.
    pub async fn get_me(&self, access_token: &str) -> Result<UserProfile, MalApiError> {
        let url = format!("{}/users/@me", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MalApiError::Status(status));
        }

        Ok(response.json().await?)
    }

    /// Fetch one page of the authenticated user's anime list.
    pub async fn get_anime_list(&self, access_token: &str) -> Result<AnimeListPage, MalApiError> {
        let url = format!("{}/users/@me/animelist", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("limit", ANIME_LIST_LIMIT.to_string()),
                ("fields", ANIME_LIST_FIELDS.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MalApiError::Status(status));
        }

        Ok(response.json().await?)
    }
}

impl Default for MalClient {
    fn default() -> Self {
        Self::new()
    }
}
