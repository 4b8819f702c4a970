pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Configuration;
pub use error::ServerError;

use axum::{
    routing::{get, post},
    Router,
};
use services::TokenExchangeClient;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub token_client: Arc<TokenExchangeClient>,
    pub mal_client: Arc<mal_api::MalClient>,
}

/// The proxy surface: token exchange plus the two read-only resource
/// relays. Browser callers are cross-origin, hence the permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/auth/token", post(handlers::exchange_token))
        .route("/mal/user", get(handlers::get_user))
        .route("/mal/anime-list", get(handlers::get_anime_list))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::MalConfiguration;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_config() -> MalConfiguration {
        MalConfiguration {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/auth/callback".to_string(),
        }
    }

    fn test_app() -> Router {
        router(AppState {
            token_client: Arc::new(TokenExchangeClient::new(&test_config())),
            mal_client: Arc::new(mal_api::MalClient::new()),
        })
    }

    // An HTML error page well over the 100-character excerpt limit.
    const HTML_ERROR_PAGE: &str = "<!DOCTYPE html><html><head><title>502 Bad Gateway</title>\
        </head><body><h1>Bad Gateway</h1><p>The server was acting as a gateway or proxy and \
        received an invalid response from the upstream server.</p></body></html>";

    /// Stub token endpoint that answers every POST with an HTML page.
    async fn spawn_html_upstream() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route(
            "/token",
            post(|| async { axum::response::Html(HTML_ERROR_PAGE) }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/token", addr)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn exchange_without_code_is_bad_request() {
        let response = test_app()
            .oneshot(
                Request::post("/auth/token")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"codeVerifier": "v"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing authorization code");
    }

    #[tokio::test]
    async fn exchange_with_empty_code_is_bad_request() {
        let response = test_app()
            .oneshot(
                Request::post("/auth/token")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"code": "", "codeVerifier": "v"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn user_without_bearer_is_unauthorized() {
        let response = test_app()
            .oneshot(Request::get("/mal/user").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No access token provided");
    }

    #[tokio::test]
    async fn anime_list_without_bearer_is_unauthorized() {
        let response = test_app()
            .oneshot(Request::get("/mal/anime-list").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No access token provided");
    }

    #[tokio::test]
    async fn html_upstream_is_reported_as_invalid_response_type() {
        let token_url = spawn_html_upstream().await;
        let app = router(AppState {
            token_client: Arc::new(TokenExchangeClient::with_token_url(
                &test_config(),
                token_url,
            )),
            mal_client: Arc::new(mal_api::MalClient::new()),
        });

        let response = app
            .oneshot(
                Request::post("/auth/token")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"code": "abc", "codeVerifier": "v"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid response type");
        assert_eq!(
            body["message"],
            "The authentication server returned an invalid response"
        );

        // Diagnostic excerpt is truncated, not the whole page.
        let details = body["details"].as_str().unwrap();
        assert!(details.starts_with("<!DOCTYPE html>"));
        assert!(details.ends_with("..."));
        assert_eq!(details.chars().count(), 103);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }
}
