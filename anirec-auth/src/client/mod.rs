pub mod callback;
mod config;
mod initiator;
mod pkce;
mod proxy_client;
mod storage;

pub use callback::{CallbackHandler, CallbackParams, FlowError, FlowState, TokenExchange};
pub use config::Settings;
pub use initiator::build_authorization_url;
pub use pkce::{code_challenge, generate_code_verifier, generate_state, FlowSession};
pub use proxy_client::{ProxyClient, ProxyClientError};
pub use storage::TokenStore;

use crate::common::StoredToken;
use crate::error::AuthError;

/// Run the full interactive login flow from a terminal and return a usable
/// token. Reuses a stored token when one is still valid.
pub async fn authenticate(settings: &Settings) -> Result<StoredToken, AuthError> {
    settings.validate().map_err(|e| {
        eprintln!("Configuration validation failed: {}", e);
        AuthError::Configuration(e)
    })?;

    let token_store = TokenStore::open();

    // Check for an existing token
    if let Some(token) = token_store.load_tokens() {
        if !token.is_expired() {
            return Ok(token);
        }
        // No refresh flow; an expired token means logging in again.
        println!("Stored token has expired, please log in again.");
        token_store.clear_tokens();
    }

    login(settings, &token_store).await
}

/// Always run the login flow, ignoring any stored token.
pub async fn login(settings: &Settings, token_store: &TokenStore) -> Result<StoredToken, AuthError> {
    let session = FlowSession::generate();
    token_store.save_session(&session);

    let auth_url = build_authorization_url(&settings.client_id, &settings.redirect_uri, &session);

    println!("\n=== MyAnimeList Authentication Required ===\n");
    println!("This will open your browser to authorize the application.");

    if let Err(e) = open::that(&auth_url) {
        eprintln!("Failed to open browser automatically: {}", e);
        eprintln!("\nPlease open this URL in your browser:");
        eprintln!("{}\n", auth_url);
    } else {
        println!("Browser opened. Please authorize the application...");
        println!("\nYou can also open this URL directly in your browser:");
        println!("{}\n", auth_url);
    }

    println!("After authorizing, paste the full redirect URL here and press Enter:");
    let mut redirect_url = String::new();
    std::io::stdin().read_line(&mut redirect_url)?;

    let params = CallbackParams::from_redirect_url(&redirect_url)
        .map_err(|e| AuthError::Configuration(format!("Could not parse redirect URL: {}", e)))?;

    let mut handler = CallbackHandler::new(token_store);
    if let FlowState::Failed(e) = handler.receive(&params) {
        return Err(AuthError::Flow(e.clone()));
    }

    // Explicit confirmation gates the token exchange
    println!("MyAnimeList connected. Press Enter to continue...");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let proxy = ProxyClient::new(settings.server_url.clone());
    match handler.confirm(&proxy).await {
        FlowState::Succeeded => {
            let token = token_store
                .load_tokens()
                .ok_or_else(|| AuthError::Flow(FlowError::NoToken))?;
            println!("✓ Authentication successful!\n");
            Ok(token)
        }
        FlowState::Failed(e) => Err(AuthError::Flow(e.clone())),
        state => Err(AuthError::Configuration(format!(
            "Unexpected flow state after confirm: {:?}",
            state
        ))),
    }
}
