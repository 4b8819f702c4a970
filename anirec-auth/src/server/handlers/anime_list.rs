use axum::{extract::State, http::HeaderMap, Json};
use mal_api::models::AnimeListPage;

use crate::server::{
    error::ServerError,
    handlers::{bearer_token, map_upstream_error},
    AppState,
};

/// Watch-list proxy: relays one fixed-size page of `/users/@me/animelist`.
pub async fn get_anime_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AnimeListPage>, ServerError> {
    let token = bearer_token(&headers)?;

    let span = tracing::info_span!("get_anime_list");
    let _enter = span.enter();

    let page = state
        .mal_client
        .get_anime_list(&token)
        .await
        .map_err(|e| map_upstream_error(e, "Failed to fetch anime list from MyAnimeList"))?;

    tracing::debug!(entries = page.data.len(), "fetched anime list page");

    Ok(Json(page))
}
