use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
use rand::Rng;

/// The state/verifier pair for one in-flight authorization attempt.
///
/// Created at flow start, persisted alongside (see `TokenStore`), and
/// consumed by the callback handler once the redirect comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSession {
    pub state: String,
    pub code_verifier: String,
}

impl FlowSession {
    pub fn generate() -> Self {
        Self {
            state: generate_state(),
            code_verifier: generate_code_verifier(),
        }
    }
}

/// Random anti-CSRF state token: 32 random bytes, URL-safe base64.
pub fn generate_state() -> String {
    random_token(32)
}

/// Random PKCE code verifier. 64 random bytes encode to 86 characters,
/// inside the 43..=128 range the PKCE spec requires, using only URL-safe
/// characters.
pub fn generate_code_verifier() -> String {
    random_token(64)
}

/// MyAnimeList only accepts the `plain` challenge method, so the challenge
/// is the verifier itself.
pub fn code_challenge(verifier: &str) -> &str {
    verifier
}

fn random_token(num_bytes: usize) -> String {
    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..num_bytes).map(|_| rng.random()).collect();
    BASE64_URL_SAFE_NO_PAD.encode(&random_bytes)
}
