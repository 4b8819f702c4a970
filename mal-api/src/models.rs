use serde::{Deserialize, Serialize};

/// Profile of the authenticated user, as returned by `/users/@me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
}

/// The five watch-list buckets MyAnimeList supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    Watching,
    Completed,
    OnHold,
    Dropped,
    PlanToWatch,
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WatchStatus::Watching => "Watching",
            WatchStatus::Completed => "Completed",
            WatchStatus::OnHold => "On Hold",
            WatchStatus::Dropped => "Dropped",
            WatchStatus::PlanToWatch => "Plan To Watch",
        };
        f.write_str(name)
    }
}

/// Per-entry list status (`list_status` in the API response).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeStatus {
    pub status: WatchStatus,
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub num_episodes_watched: u32,
    #[serde(default)]
    pub is_rewatching: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainPicture {
    pub medium: String,
    pub large: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeDetails {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_picture: Option<MainPicture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_episodes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeListEntry {
    pub node: AnimeDetails,
    pub list_status: AnimeStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

/// One page of the user's anime list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeListPage {
    pub data: Vec<AnimeListEntry>,
    #[serde(default)]
    pub paging: Paging,
}
