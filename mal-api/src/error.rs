use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MalApiError {
    /// MyAnimeList answered with a non-success status. The code is kept so
    /// callers can relay it.
    #[error("MyAnimeList API error: {0}")]
    Status(StatusCode),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl MalApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            MalApiError::Status(code) => Some(*code),
            MalApiError::Http(_) => None,
        }
    }
}
