use thiserror::Error;
use url::Url;

use crate::client::pkce::FlowSession;
use crate::client::proxy_client::ProxyClientError;
use crate::client::storage::TokenStore;
use crate::common::{StoredToken, TokenPair};

/// Everything that can terminate the flow unsuccessfully. Variants carry
/// the user-facing message; recovery is always "go back to login".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Authentication failed: {0}")]
    Provider(String),

    #[error("No authorization code received from MyAnimeList")]
    MissingCode,

    #[error("Invalid state parameter, possible security issue")]
    StateMismatch,

    #[error("Code verifier not found, cannot complete authentication")]
    MissingVerifier,

    #[error("Token exchange failed: {0}")]
    Exchange(String),

    #[error("{0}")]
    UpstreamFetch(String),

    #[error("No access token found. Please log in again.")]
    NoToken,
}

/// Query parameters of the provider's redirect back to us.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse the parameters out of a full redirect URL.
    pub fn from_redirect_url(redirect_url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(redirect_url.trim())?;
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "state" => params.state = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Pending,
    Validated { code: String },
    Exchanging,
    Succeeded,
    Failed(FlowError),
}

/// The token-exchange dependency of the callback handler, kept behind a
/// trait so transitions are testable without a running proxy.
#[allow(async_fn_in_trait)]
pub trait TokenExchange {
    async fn exchange(&self, code: &str, code_verifier: &str)
        -> Result<TokenPair, ProxyClientError>;
}

/// Drives the redirect half of the authorization flow:
/// `Pending -> Validated -> Exchanging -> {Succeeded, Failed}`.
///
/// The session context is owned explicitly (loaded from the store at
/// construction) and dropped on terminal transitions. The jump from
/// `Validated` to `Exchanging` is gated on the caller invoking `confirm`,
/// which is where the user's explicit "continue" action lands.
pub struct CallbackHandler<'a> {
    store: &'a TokenStore,
    session: Option<FlowSession>,
    state: FlowState,
}

impl<'a> CallbackHandler<'a> {
    pub fn new(store: &'a TokenStore) -> Self {
        Self {
            store,
            session: store.load_session(),
            state: FlowState::Pending,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Entry: inspect the redirect parameters and validate the state value
    /// against the stored one. Exact, case-sensitive comparison; this is
    /// the CSRF check and is never skipped.
    pub fn receive(&mut self, params: &CallbackParams) -> &FlowState {
        if !matches!(self.state, FlowState::Pending) {
            return &self.state;
        }

        if let Some(error) = &params.error {
            tracing::warn!(error = %error, "provider returned an error on the redirect");
            return self.fail(FlowError::Provider(error.clone()));
        }

        let Some(code) = &params.code else {
            return self.fail(FlowError::MissingCode);
        };

        let expected = self.session.as_ref().map(|s| s.state.as_str());
        if expected.is_none() || params.state.as_deref() != expected {
            tracing::warn!("state parameter mismatch on redirect");
            return self.fail(FlowError::StateMismatch);
        }

        self.state = FlowState::Validated { code: code.clone() };
        &self.state
    }

    /// The user confirmed; exchange the code for tokens. On success the
    /// token pair is stored and the session (state + verifier) cleared.
    pub async fn confirm<E: TokenExchange>(&mut self, exchange: &E) -> &FlowState {
        let FlowState::Validated { code } = &self.state else {
            return &self.state;
        };
        let code = code.clone();

        let Some(verifier) = self.session.as_ref().map(|s| s.code_verifier.clone()) else {
            return self.fail(FlowError::MissingVerifier);
        };

        self.state = FlowState::Exchanging;
        match exchange.exchange(&code, &verifier).await {
            Ok(tokens) => {
                self.store.save_tokens(&StoredToken::from(tokens));
                self.store.clear_session();
                self.session = None;
                tracing::info!("token exchange succeeded");
                self.state = FlowState::Succeeded;
            }
            Err(e) => {
                return self.fail(FlowError::Exchange(e.to_string()));
            }
        }
        &self.state
    }

    fn fail(&mut self, error: FlowError) -> &FlowState {
        // Terminal: drop the session context. The persisted keys stay so a
        // page reload before retry still sees them; login regenerates both.
        self.session = None;
        self.state = FlowState::Failed(error);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubExchange {
        result: Result<TokenPair, String>,
    }

    impl StubExchange {
        fn ok() -> Self {
            Self {
                result: Ok(TokenPair {
                    access_token: "access".to_string(),
                    refresh_token: Some("refresh".to_string()),
                    expires_in: Some(3600),
                }),
            }
        }

        fn err(msg: &str) -> Self {
            Self {
                result: Err(msg.to_string()),
            }
        }
    }

    impl TokenExchange for StubExchange {
        async fn exchange(
            &self,
            _code: &str,
            _code_verifier: &str,
        ) -> Result<TokenPair, ProxyClientError> {
            self.result
                .clone()
                .map_err(ProxyClientError::OAuth)
        }
    }

    fn seeded_store() -> (TokenStore, FlowSession) {
        let store = TokenStore::in_memory();
        let session = FlowSession::generate();
        store.save_session(&session);
        (store, session)
    }

    fn params(code: Option<&str>, state: Option<&str>, error: Option<&str>) -> CallbackParams {
        CallbackParams {
            code: code.map(String::from),
            state: state.map(String::from),
            error: error.map(String::from),
        }
    }

    #[test]
    fn matching_state_validates() {
        let (store, session) = seeded_store();
        let mut handler = CallbackHandler::new(&store);
        let state = handler.receive(&params(Some("abc"), Some(&session.state), None));
        assert_eq!(
            state,
            &FlowState::Validated {
                code: "abc".to_string()
            }
        );
    }

    #[test]
    fn mismatched_state_fails_even_with_valid_code() {
        let (store, _) = seeded_store();
        let mut handler = CallbackHandler::new(&store);
        let state = handler.receive(&params(Some("abc"), Some("tampered"), None));
        assert_eq!(state, &FlowState::Failed(FlowError::StateMismatch));
    }

    #[test]
    fn missing_stored_state_fails_closed() {
        let store = TokenStore::in_memory();
        let mut handler = CallbackHandler::new(&store);
        let state = handler.receive(&params(Some("abc"), Some("anything"), None));
        assert_eq!(state, &FlowState::Failed(FlowError::StateMismatch));
    }

    #[test]
    fn provider_error_wins_and_code_is_never_inspected() {
        let (store, session) = seeded_store();
        let mut handler = CallbackHandler::new(&store);
        let state = handler.receive(&params(
            Some("abc"),
            Some(&session.state),
            Some("access_denied"),
        ));
        let FlowState::Failed(FlowError::Provider(msg)) = state else {
            panic!("expected provider failure, got {:?}", state);
        };
        assert!(msg.contains("access_denied"));
    }

    #[test]
    fn missing_code_fails() {
        let (store, session) = seeded_store();
        let mut handler = CallbackHandler::new(&store);
        let state = handler.receive(&params(None, Some(&session.state), None));
        assert_eq!(state, &FlowState::Failed(FlowError::MissingCode));
    }

    #[tokio::test]
    async fn confirm_stores_tokens_and_clears_session() {
        let (store, session) = seeded_store();
        let mut handler = CallbackHandler::new(&store);
        handler.receive(&params(Some("abc"), Some(&session.state), None));

        let state = handler.confirm(&StubExchange::ok()).await;
        assert_eq!(state, &FlowState::Succeeded);

        let tokens = store.load_tokens().expect("tokens stored");
        assert_eq!(tokens.access_token, "access");
        assert_eq!(store.load_session(), None);
    }

    #[tokio::test]
    async fn confirm_without_verifier_fails() {
        let (store, session) = seeded_store();
        let mut handler = CallbackHandler::new(&store);
        handler.receive(&params(Some("abc"), Some(&session.state), None));

        // Simulate the verifier vanishing between validation and confirm.
        handler.session = None;

        let state = handler.confirm(&StubExchange::ok()).await;
        assert_eq!(state, &FlowState::Failed(FlowError::MissingVerifier));
    }

    #[tokio::test]
    async fn failed_exchange_surfaces_provider_text() {
        let (store, session) = seeded_store();
        let mut handler = CallbackHandler::new(&store);
        handler.receive(&params(Some("abc"), Some(&session.state), None));

        let state = handler.confirm(&StubExchange::err("invalid_grant")).await;
        let FlowState::Failed(FlowError::Exchange(msg)) = state else {
            panic!("expected exchange failure, got {:?}", state);
        };
        assert!(msg.contains("invalid_grant"));
        assert_eq!(store.load_tokens(), None);
    }

    #[tokio::test]
    async fn confirm_is_a_no_op_outside_validated() {
        let (store, _) = seeded_store();
        let mut handler = CallbackHandler::new(&store);
        let state = handler.confirm(&StubExchange::ok()).await;
        assert_eq!(state, &FlowState::Pending);
    }

    #[test]
    fn params_parse_from_redirect_url() {
        let parsed = CallbackParams::from_redirect_url(
            "http://localhost:3000/auth/callback?code=abc&state=xyz",
        )
        .unwrap();
        assert_eq!(parsed.code.as_deref(), Some("abc"));
        assert_eq!(parsed.state.as_deref(), Some("xyz"));
        assert_eq!(parsed.error, None);
    }
}
