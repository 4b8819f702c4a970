use axum::{extract::State, http::HeaderMap, Json};
use mal_api::models::UserProfile;

use crate::server::{
    error::ServerError,
    handlers::{bearer_token, map_upstream_error},
    AppState,
};

/// Profile proxy: relays `/users/@me` for the caller's bearer token.
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, ServerError> {
    let token = bearer_token(&headers)?;

    let span = tracing::info_span!("get_user");
    let _enter = span.enter();

    let profile = state
        .mal_client
        .get_me(&token)
        .await
        .map_err(|e| map_upstream_error(e, "Failed to fetch user data from MyAnimeList"))?;

    tracing::debug!(user = %profile.name, "fetched user profile");

    Ok(Json(profile))
}
