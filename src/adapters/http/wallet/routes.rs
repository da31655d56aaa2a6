//! Axum router configuration for wallet endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    create_setup_intent, delete_card, pay_with_saved_card, store_payment_method, WalletAppState,
};

/// Create the wallet API routes.
///
/// # Routes
/// - `POST /create-setup-intent` - Find or create the customer, open a setup intent
/// - `POST /store-payment-method` - Save card display fields
/// - `POST /pay-with-saved-card` - Off-session charge of a saved card
/// - `POST /delete-card` - Remove a saved card
pub fn wallet_routes() -> Router<WalletAppState> {
    Router::new()
        .route("/create-setup-intent", post(create_setup_intent))
        .route("/store-payment-method", post(store_payment_method))
        .route("/pay-with-saved-card", post(pay_with_saved_card))
        .route("/delete-card", post(delete_card))
}

/// Wallet routes mounted under `/api`.
///
/// # Example
///
/// ```ignore
/// let app = wallet_router().with_state(state);
/// ```
pub fn wallet_router() -> Router<WalletAppState> {
    Router::new().nest("/api", wallet_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::firebase::InMemoryDocumentStore;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::foundation::{PaymentMethodId, UserId};
    use crate::domain::wallet::{Currency, DatabaseUrl, DocumentPath};

    const DB: &str = "https://demo.firebaseio.com";

    fn app(provider: &MockPaymentProvider, store: &InMemoryDocumentStore) -> Router {
        let state = WalletAppState {
            payment_provider: Arc::new(provider.clone()),
            document_store: Arc::new(store.clone()),
            default_currency: Currency::new("eur").unwrap(),
        };
        wallet_router().with_state(state)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn card_path(uid: &str, pm: &str) -> DocumentPath {
        DocumentPath::card(&UserId::new(uid).unwrap(), &PaymentMethodId::new(pm).unwrap())
    }

    #[tokio::test]
    async fn create_setup_intent_returns_secret_and_customer() {
        let provider = MockPaymentProvider::new();
        let store = InMemoryDocumentStore::new();

        let (status, body) = post_json(
            app(&provider, &store),
            "/api/create-setup-intent",
            json!({ "email": "a@b.com", "firebaseDbUrl": DB, "uid": "u1" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["clientSecret"].as_str().unwrap().contains("secret"));
        assert!(body["stripeId"].as_str().unwrap().starts_with("cus_"));
    }

    #[tokio::test]
    async fn create_setup_intent_without_uid_is_rejected() {
        let provider = MockPaymentProvider::new();
        let store = InMemoryDocumentStore::new();

        let (status, body) = post_json(
            app(&provider, &store),
            "/api/create-setup-intent",
            json!({ "email": "a@b.com", "firebaseDbUrl": DB }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["details"]["field"], "uid");
        assert_eq!(provider.customer_count(), 0);
    }

    #[tokio::test]
    async fn store_payment_method_writes_card_entry() {
        let provider = MockPaymentProvider::new();
        provider.add_card("pm_1", "visa", "4242", 12, 2030);
        let store = InMemoryDocumentStore::new();

        let (status, body) = post_json(
            app(&provider, &store),
            "/api/store-payment-method",
            json!({ "uid": "u1", "paymentMethodId": "pm_1", "firebaseDbUrl": DB }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "saved": true }));

        let db = DatabaseUrl::parse(DB).unwrap();
        let stored = store.value_at(&db, &card_path("u1", "pm_1")).await.unwrap();
        assert_eq!(
            stored,
            json!({ "brand": "visa", "last4": "4242", "expMonth": 12, "expYear": 2030 })
        );
    }

    #[tokio::test]
    async fn pay_with_saved_card_reports_status() {
        let provider = MockPaymentProvider::new();
        provider.add_customer("cus_1");
        provider.add_card("pm_1", "visa", "4242", 12, 2030);
        let store = InMemoryDocumentStore::new();

        let (status, body) = post_json(
            app(&provider, &store),
            "/api/pay-with-saved-card",
            json!({ "customerId": "cus_1", "paymentMethodId": "pm_1", "amount": 1500 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "succeeded");
        assert!(body.get("clientSecret").is_none());
    }

    #[tokio::test]
    async fn pay_with_fractional_amount_is_rejected() {
        let provider = MockPaymentProvider::new();
        let store = InMemoryDocumentStore::new();

        let (status, body) = post_json(
            app(&provider, &store),
            "/api/pay-with-saved-card",
            json!({ "customerId": "cus_1", "paymentMethodId": "pm_1", "amount": 12.5 }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "amount");
        assert!(!provider.was_called("create_payment_intent"));
    }

    #[tokio::test]
    async fn delete_card_removes_entry() {
        let provider = MockPaymentProvider::new();
        provider.add_customer("cus_1");
        provider.add_card("pm_1", "visa", "4242", 12, 2030);
        provider.attach_to("pm_1", "cus_1");
        let store = InMemoryDocumentStore::new();
        let db = DatabaseUrl::parse(DB).unwrap();
        store
            .seed(&db, &card_path("u1", "pm_1"), json!({ "brand": "visa" }))
            .await;

        let (status, body) = post_json(
            app(&provider, &store),
            "/api/delete-card",
            json!({ "uid": "u1", "paymentMethodId": "pm_1", "firebaseDbUrl": DB }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "deleted": true }));
        assert!(store.value_at(&db, &card_path("u1", "pm_1")).await.is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_failure() {
        let provider = MockPaymentProvider::new();
        let store = InMemoryDocumentStore::new();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/delete-card")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(&provider, &store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_is_not_allowed() {
        let provider = MockPaymentProvider::new();
        let store = InMemoryDocumentStore::new();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/delete-card")
            .body(Body::empty())
            .unwrap();

        let response = app(&provider, &store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
