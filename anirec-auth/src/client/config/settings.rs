use config::{Config, ConfigError, File};
use serde::Deserialize;

/// Client-side settings. Only public values live here; the client secret
/// is configured on the proxy server alone.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// MyAnimeList application client id (public).
    pub client_id: String,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Base URL of the external recommendation service, if any.
    pub recommender_url: Option<String>,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:3000/auth/callback".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("ANIREC_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("ANIREC").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server_url.is_empty() {
            return Err("server_url is required".to_string());
        }
        if !self.server_url.starts_with("http") {
            return Err("server_url must be a valid HTTP(S) URL".to_string());
        }
        if self.client_id.is_empty() {
            return Err("client_id is required".to_string());
        }
        if self.redirect_uri.is_empty() {
            return Err("redirect_uri is required".to_string());
        }
        Ok(())
    }
}
