// Common types shared between client and server
pub mod common;

// Client library (public API for anirec)
mod client;
mod error;

pub use client::{
    authenticate, build_authorization_url, code_challenge, generate_code_verifier, generate_state,
    login, CallbackHandler, CallbackParams, FlowError, FlowSession, FlowState, ProxyClient,
    ProxyClientError, Settings, TokenExchange, TokenStore,
};
pub use common::{StoredToken, TokenPair};
pub use error::AuthError;

// Server modules (public for binary, internal for library)
#[cfg(feature = "server")]
pub mod server;
