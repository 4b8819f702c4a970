//! Client side of the external recommendation service. The service's
//! internals are not part of this repository; only the request/response
//! contract is.

use mal_api::models::AnimeListEntry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimeRating {
    pub anime_id: u64,
    pub rating: u8,
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub user_id: u64,
    pub anime_ratings: Vec<AnimeRating>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub session_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Failed to generate recommendations: {0}")]
    Http(String),

    #[error("{0}")]
    Service(String),

    #[error("No session ID received from recommendation service")]
    MissingSessionId,
}

/// Only rated entries are sent; a zero score means unrated on MyAnimeList.
pub fn prepare_ratings(entries: &[AnimeListEntry]) -> Vec<AnimeRating> {
    entries
        .iter()
        .filter(|entry| entry.list_status.score > 0)
        .map(|entry| AnimeRating {
            anime_id: entry.node.id,
            rating: entry.list_status.score,
        })
        .collect()
}

/// Ask the recommender to build a recommendation session for this user.
/// Returns the session id to look results up with.
pub async fn generate_recommendations(
    http_client: &reqwest::Client,
    recommender_url: &str,
    user_id: u64,
    ratings: Vec<AnimeRating>,
) -> Result<String, RecommendError> {
    let url = format!("{}/recommendations/generate", recommender_url);
    let request = GenerateRequest {
        user_id,
        anime_ratings: ratings,
    };

    let response = http_client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| RecommendError::Http(e.to_string()))?;

    if !response.status().is_success() {
        let body: GenerateResponse = response
            .json()
            .await
            .unwrap_or(GenerateResponse {
                session_id: None,
                error: None,
            });
        return Err(RecommendError::Service(
            body.error
                .unwrap_or_else(|| "Failed to generate recommendations".to_string()),
        ));
    }

    let body: GenerateResponse = response
        .json()
        .await
        .map_err(|e| RecommendError::Http(e.to_string()))?;

    body.session_id.ok_or(RecommendError::MissingSessionId)
}
