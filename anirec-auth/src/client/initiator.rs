use url::form_urlencoded;

use crate::client::pkce::{code_challenge, FlowSession};

const MAL_AUTHORIZE_URL: &str = "https://myanimelist.net/v1/oauth2/authorize";

/// Build the MyAnimeList authorization URL for a flow session.
///
/// Pure construction; navigating to it is up to the caller so the user
/// explicitly initiates the redirect.
pub fn build_authorization_url(client_id: &str, redirect_uri: &str, session: &FlowSession) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("state", &session.state)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("code_challenge", code_challenge(&session.code_verifier))
        .append_pair("code_challenge_method", "plain")
        .finish();

    format!("{}?{}", MAL_AUTHORIZE_URL, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> FlowSession {
        FlowSession {
            state: "test-state".to_string(),
            code_verifier: "test-verifier-test-verifier-test-verifier-abc".to_string(),
        }
    }

    #[test]
    fn url_carries_all_oauth_parameters() {
        let url = build_authorization_url(
            "client123",
            "http://localhost:3000/auth/callback",
            &test_session(),
        );

        assert!(url.starts_with("https://myanimelist.net/v1/oauth2/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client123"));
        assert!(url.contains("state=test-state"));
        assert!(url.contains("code_challenge_method=plain"));
    }

    #[test]
    fn redirect_uri_is_url_encoded() {
        let url = build_authorization_url(
            "client123",
            "http://localhost:3000/auth/callback",
            &test_session(),
        );
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback"));
    }

    #[test]
    fn plain_challenge_matches_verifier() {
        let session = test_session();
        let url = build_authorization_url("c", "http://localhost/cb", &session);
        assert!(url.contains(&format!("code_challenge={}", session.code_verifier)));
    }
}
