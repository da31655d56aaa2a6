//! HTTP adapters - REST API implementations.
//!
//! The wallet module exposes the four card endpoints; `middleware` holds the
//! cross-cutting layers applied by [`api_app`].

pub mod middleware;
pub mod wallet;


use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use middleware::cors_layer;
pub use wallet::{wallet_router, WalletApiError, WalletAppState};

/// Build the complete application router with middleware applied.
///
/// Layers, outermost first: CORS, tracing, request timeout.
pub fn api_app(state: WalletAppState, server: &ServerConfig) -> Router {
    wallet_router()
        .with_state(state)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origins_list()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::firebase::InMemoryDocumentStore;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::wallet::Currency;

    fn state() -> WalletAppState {
        WalletAppState {
            payment_provider: Arc::new(MockPaymentProvider::new()),
            document_store: Arc::new(InMemoryDocumentStore::new()),
            default_currency: Currency::eur(),
        }
    }

    #[tokio::test]
    async fn preflight_is_answered() {
        let app = api_app(state(), &ServerConfig::default());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/pay-with-saved-card")
            .header(header::ORIGIN, "https://shop.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = api_app(state(), &ServerConfig::default());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/refund")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
