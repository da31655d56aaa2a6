//! Contract tests for FirebaseDocumentStore against a mocked Realtime Database.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET | `/{path}.json` | `get_*` |
//! | PUT | `/{path}.json` | `put_*` |
//! | PUT + if-match | `/{path}.json` | `put_if_match_*` |
//! | DELETE | `/{path}.json` | `delete_*` |

use card_relay::adapters::firebase::{FirebaseConfig, FirebaseDocumentStore};
use card_relay::domain::foundation::{PaymentMethodId, UserId};
use card_relay::domain::wallet::{DatabaseUrl, DocumentPath};
use card_relay::ports::{ConditionalWrite, DocumentStore, StoreError};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store() -> FirebaseDocumentStore {
    FirebaseDocumentStore::new(FirebaseConfig::new()).unwrap()
}

fn db(server: &MockServer) -> DatabaseUrl {
    DatabaseUrl::parse(&server.uri()).unwrap()
}

fn customer_path() -> DocumentPath {
    DocumentPath::customer_record(&UserId::new("user-1").unwrap())
}

fn card_path() -> DocumentPath {
    DocumentPath::card(
        &UserId::new("user-1").unwrap(),
        &PaymentMethodId::new("pm_1").unwrap(),
    )
}

// ── GET ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_returns_value_and_etag() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/user-1/stripe/user.json"))
        .and(header("x-firebase-etag", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "etag-1")
                .set_body_json(json!({ "stripeId": "cus_1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = store().get(&db(&server), &customer_path()).await.unwrap();

    assert_eq!(snapshot.value, Some(json!({ "stripeId": "cus_1" })));
    assert_eq!(snapshot.etag.as_deref(), Some("etag-1"));
}

#[tokio::test]
async fn get_of_missing_document_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/user-1/stripe/user.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "null_etag")
                .set_body_string("null"),
        )
        .mount(&server)
        .await;

    let snapshot = store().get(&db(&server), &customer_path()).await.unwrap();

    assert!(snapshot.value.is_none());
    assert_eq!(snapshot.etag.as_deref(), Some("null_etag"));
}

#[tokio::test]
async fn get_rejected_by_rules_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Permission denied" })),
        )
        .mount(&server)
        .await;

    let err = store()
        .get(&db(&server), &customer_path())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Status { status: 401, .. }));
    assert!(err.is_status());
}

#[tokio::test]
async fn get_with_garbage_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = store()
        .get(&db(&server), &customer_path())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Malformed { .. }));
}

fn store_with_token_for(database: DatabaseUrl) -> FirebaseDocumentStore {
    let config = FirebaseConfig::new()
        .with_auth_token(SecretString::new("db-secret".to_string()), database);
    FirebaseDocumentStore::new(config).unwrap()
}

#[tokio::test]
async fn auth_token_is_sent_to_its_database_and_kept_out_of_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("auth", "db-secret"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with_token_for(db(&server));

    let err = store.get(&db(&server), &card_path()).await.unwrap_err();

    assert!(matches!(err, StoreError::Status { status: 403, .. }));
    assert!(!err.to_string().contains("db-secret"));
}

#[tokio::test]
async fn auth_token_is_never_sent_to_another_database() {
    let caller_named = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&caller_named)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&caller_named)
        .await;

    let store =
        store_with_token_for(DatabaseUrl::parse("https://shop.firebaseio.com").unwrap());

    store.get(&db(&caller_named), &customer_path()).await.unwrap();
    store
        .put(&db(&caller_named), &card_path(), &json!({ "brand": "visa" }))
        .await
        .unwrap();

    let received = caller_named.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    for request in received {
        assert_eq!(request.url.query(), None);
    }
}

#[tokio::test]
async fn unreachable_database_is_network_error() {
    let db = DatabaseUrl::parse("http://127.0.0.1:9").unwrap();

    let err = store().get(&db, &customer_path()).await.unwrap_err();

    assert!(matches!(err, StoreError::Network { .. }));
}

// ── PUT ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_writes_json_body() {
    let server = MockServer::start().await;
    let card = json!({ "brand": "visa", "last4": "4242", "expMonth": 12, "expYear": 2030 });

    Mock::given(method("PUT"))
        .and(path("/users/user-1/stripe/cards/pm_1.json"))
        .and(body_json(card.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(card.clone()))
        .expect(1)
        .mount(&server)
        .await;

    store().put(&db(&server), &card_path(), &card).await.unwrap();
}

#[tokio::test]
async fn put_if_match_success_is_written() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/users/user-1/stripe/user.json"))
        .and(header("if-match", "null_etag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "stripeId": "cus_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = store()
        .put_if_match(
            &db(&server),
            &customer_path(),
            &json!({ "stripeId": "cus_1" }),
            "null_etag",
        )
        .await
        .unwrap();

    assert_eq!(outcome, ConditionalWrite::Written);
}

#[tokio::test]
async fn put_if_match_precondition_failure_returns_current_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/users/user-1/stripe/user.json"))
        .respond_with(
            ResponseTemplate::new(412)
                .insert_header("ETag", "etag-winner")
                .set_body_json(json!({ "stripeId": "cus_winner" })),
        )
        .mount(&server)
        .await;

    let outcome = store()
        .put_if_match(
            &db(&server),
            &customer_path(),
            &json!({ "stripeId": "cus_mine" }),
            "null_etag",
        )
        .await
        .unwrap();

    match outcome {
        ConditionalWrite::Conflict(current) => {
            assert_eq!(current.value, Some(json!({ "stripeId": "cus_winner" })));
            assert_eq!(current.etag.as_deref(), Some("etag-winner"));
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

// ── DELETE ────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_document() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/user-1/stripe/cards/pm_1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    store().delete(&db(&server), &card_path()).await.unwrap();
}

#[tokio::test]
async fn delete_failure_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = store()
        .delete(&db(&server), &card_path())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        StoreError::Status {
            path: "users/user-1/stripe/cards/pm_1".to_string(),
            status: 500
        }
    );
}
