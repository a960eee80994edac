//! Wiremock tests for the Firestore backend.

use quoteoff_core::store::{FieldUpdate, QuoteStore, SortDirection};
use quoteoff_types::StoreError;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::FirestoreStore;
use crate::types::{FirestoreConfig, RetryConfig};

const RUN_QUERY_PATH: &str = "/projects/test-project/databases/(default)/documents:runQuery";
const COMMIT_PATH: &str = "/projects/test-project/databases/(default)/documents:commit";

fn test_store(server: &MockServer, max_retries: usize) -> FirestoreStore {
    FirestoreStore::new(FirestoreConfig {
        base_url: server.uri(),
        project_id: "test-project".to_string(),
        retry: RetryConfig { max_retries, base_delay_ms: 1, max_delay_ms: 10 },
        ..FirestoreConfig::default()
    })
    .unwrap()
}

fn document(doc_key: &str, fields: Value) -> Value {
    json!({
        "document": {
            "name": format!(
                "projects/test-project/databases/(default)/documents/quotes/{doc_key}"
            ),
            "fields": fields,
        },
        "readTime": "2025-01-01T00:00:00Z",
    })
}

async fn sent_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn test_query_by_field_sends_equality_filter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"readTime": "t"}])))
        .mount(&server)
        .await;

    let store = test_store(&server, 0);
    store.query_by_field("id", 7, 1).await.unwrap();

    let body = sent_body(&server).await;
    let query = &body["structuredQuery"];
    assert_eq!(query["from"], json!([{"collectionId": "quotes"}]));
    assert_eq!(query["where"]["fieldFilter"]["field"]["fieldPath"], "id");
    assert_eq!(query["where"]["fieldFilter"]["op"], "EQUAL");
    assert_eq!(query["where"]["fieldFilter"]["value"]["integerValue"], "7");
    assert_eq!(query["limit"], 1);
}

#[tokio::test]
async fn test_query_decodes_documents_with_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            document("q-1", json!({
                "id": {"integerValue": "7"},
                "displayText": {"stringValue": "hello"},
            })),
            {"readTime": "t"},
        ])))
        .mount(&server)
        .await;

    let store = test_store(&server, 0);
    let quotes = store.query_by_field("id", 7, 1).await.unwrap();

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].doc_key, "q-1");
    assert_eq!(quotes[0].quote_id, 7);
    assert_eq!(quotes[0].display_text, "hello");
    assert_eq!(quotes[0].rating, 1000);
    assert_eq!(quotes[0].vote_count, 0);
}

#[tokio::test]
async fn test_query_ordered_sends_descending_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            document("q-a", json!({
                "id": {"integerValue": "1"},
                "displayText": {"stringValue": "top"},
                "rating": {"integerValue": "1400"},
            })),
            document("q-b", json!({
                "id": {"integerValue": "2"},
                "displayText": {"stringValue": "second"},
                "rating": {"integerValue": "1100"},
            })),
        ])))
        .mount(&server)
        .await;

    let store = test_store(&server, 0);
    let quotes = store.query_ordered("rating", SortDirection::Descending, 10).await.unwrap();

    let body = sent_body(&server).await;
    let query = &body["structuredQuery"];
    assert_eq!(query["orderBy"][0]["field"]["fieldPath"], "rating");
    assert_eq!(query["orderBy"][0]["direction"], "DESCENDING");
    assert_eq!(query["limit"], 10);

    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].rating, 1400);
}

#[tokio::test]
async fn test_update_fields_commits_set_and_increment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMMIT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"writeResults": []})))
        .mount(&server)
        .await;

    let store = test_store(&server, 0);
    store
        .update_fields(
            "q-9",
            &[FieldUpdate::set("rating", 1016), FieldUpdate::increment("voteCount", 1)],
        )
        .await
        .unwrap();

    let body = sent_body(&server).await;
    let write = &body["writes"][0];
    assert_eq!(
        write["update"]["name"],
        "projects/test-project/databases/(default)/documents/quotes/q-9"
    );
    assert_eq!(write["update"]["fields"]["rating"]["integerValue"], "1016");
    assert_eq!(write["updateMask"]["fieldPaths"], json!(["rating"]));
    assert_eq!(write["updateTransforms"][0]["fieldPath"], "voteCount");
    assert_eq!(write["updateTransforms"][0]["increment"]["integerValue"], "1");
    assert_eq!(write["currentDocument"]["exists"], true);
}

#[tokio::test]
async fn test_retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"readTime": "t"}])))
        .mount(&server)
        .await;

    let store = test_store(&server, 3);
    let quotes = store.query_by_field("id", 1, 1).await.unwrap();
    assert!(quotes.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_exhausted_retries_map_to_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = test_store(&server, 1);
    let err = store.query_by_field("id", 1, 1).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_rate_limit_with_no_budget_maps_to_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let store = test_store(&server, 0);
    let err = store.query_by_field("id", 1, 1).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { .. }));
}

#[tokio::test]
async fn test_missing_record_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMMIT_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = test_store(&server, 0);
    let err = store
        .update_fields("gone", &[FieldUpdate::set("rating", 1)])
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::NotFound { doc_key: "gone".to_string() });
}

#[tokio::test]
async fn test_undecodable_document_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            document("q-bad", json!({"id": {"integerValue": "3"}})),
        ])))
        .mount(&server)
        .await;

    let store = test_store(&server, 0);
    let err = store.query_by_field("id", 3, 1).await.unwrap_err();
    assert!(matches!(err, StoreError::Malformed { .. }));
}
