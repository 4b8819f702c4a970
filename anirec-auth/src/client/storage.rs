use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::client::pkce::FlowSession;
use crate::common::StoredToken;

const KEY_STATE: &str = "oauthState";
const KEY_VERIFIER: &str = "codeVerifier";
const KEY_ACCESS_TOKEN: &str = "malAccessToken";
const KEY_REFRESH_TOKEN: &str = "malRefreshToken";
const KEY_TOKEN_EXPIRES_AT: &str = "malTokenExpiresAt";

/// Key-value store for the flow session and token pair.
///
/// Values live in memory and are mirrored to a JSON file in the user cache
/// directory. Persistence is best-effort: if a write fails the flow keeps
/// going with the in-memory values for the current process lifetime, it
/// just loses cross-invocation recovery.
pub struct TokenStore {
    path: Option<PathBuf>,
    values: Mutex<BTreeMap<String, String>>,
}

impl TokenStore {
    /// Open the default store under the user cache directory. Never fails:
    /// with no usable cache directory the store is memory-only.
    pub fn open() -> Self {
        let path = dirs::cache_dir().map(|dir| dir.join("anirec").join("session.json"));
        if path.is_none() {
            tracing::warn!("no cache directory available, session store is memory-only");
        }
        Self::at(path)
    }

    /// Open a store backed by an explicit file.
    pub fn with_path(path: PathBuf) -> Self {
        Self::at(Some(path))
    }

    /// A purely in-memory store.
    pub fn in_memory() -> Self {
        Self::at(None)
    }

    fn at(path: Option<PathBuf>) -> Self {
        let values = path
            .as_deref()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn save_session(&self, session: &FlowSession) {
        self.update(|values| {
            values.insert(KEY_STATE.to_string(), session.state.clone());
            values.insert(KEY_VERIFIER.to_string(), session.code_verifier.clone());
        });
    }

    pub fn load_session(&self) -> Option<FlowSession> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Some(FlowSession {
            state: values.get(KEY_STATE)?.clone(),
            code_verifier: values.get(KEY_VERIFIER)?.clone(),
        })
    }

    /// Remove the state and verifier, leaving any stored tokens intact.
    pub fn clear_session(&self) {
        self.update(|values| {
            values.remove(KEY_STATE);
            values.remove(KEY_VERIFIER);
        });
    }

    pub fn save_tokens(&self, token: &StoredToken) {
        self.update(|values| {
            values.insert(KEY_ACCESS_TOKEN.to_string(), token.access_token.clone());
            match &token.refresh_token {
                Some(refresh) => {
                    values.insert(KEY_REFRESH_TOKEN.to_string(), refresh.clone());
                }
                None => {
                    values.remove(KEY_REFRESH_TOKEN);
                }
            }
            match token.expires_at {
                Some(at) => {
                    values.insert(KEY_TOKEN_EXPIRES_AT.to_string(), at.timestamp().to_string());
                }
                None => {
                    values.remove(KEY_TOKEN_EXPIRES_AT);
                }
            }
        });
    }

    pub fn load_tokens(&self) -> Option<StoredToken> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        let access_token = values.get(KEY_ACCESS_TOKEN)?.clone();
        let refresh_token = values.get(KEY_REFRESH_TOKEN).cloned();
        let expires_at = values
            .get(KEY_TOKEN_EXPIRES_AT)
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0));
        Some(StoredToken {
            access_token,
            refresh_token,
            expires_at,
        })
    }

    pub fn clear_tokens(&self) {
        self.update(|values| {
            values.remove(KEY_ACCESS_TOKEN);
            values.remove(KEY_REFRESH_TOKEN);
            values.remove(KEY_TOKEN_EXPIRES_AT);
        });
    }

    fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let snapshot = {
            let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
            mutate(&mut values);
            values.clone()
        };
        if let Err(e) = self.persist(&snapshot) {
            tracing::warn!("failed to persist session store, continuing in memory: {}", e);
        }
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(values)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, json)?;

        // 0600: the file holds tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }
}
