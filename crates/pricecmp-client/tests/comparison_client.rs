//! Integration tests for `ComparisonClient::fetch`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricecmp_client::{ComparisonClient, ErrorKind, SearchError};

const SEARCH_PATH: &str = "/api/product-comparison/";

/// 5-second timeout, descriptive UA.
fn test_client(base_url: &str) -> ComparisonClient {
    ComparisonClient::new(base_url, 5, "pricecmp-test/0.1").expect("failed to build test client")
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_returns_parsed_store_map() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("product", "ryzen 5 7600x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startech": [{"name": "AMD Ryzen 5 7600X", "price": "25,500৳"}],
            "ryans": [{}, {"name": "AMD Ryzen 5 7600X Processor", "price": "Tk 25,000"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch("ryzen 5 7600x").await;

    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let response = result.unwrap();
    assert_eq!(response.records("startech").len(), 1);
    assert_eq!(response.records("ryans").len(), 2);
    assert!(response.backend_error().is_none());
}

#[tokio::test]
async fn fetch_trims_query_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("product", "rtx 4060"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"startech": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.fetch("   rtx 4060 \n").await.is_ok());
}

#[tokio::test]
async fn fetch_with_path_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/compare/api/product-comparison/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ryans": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/compare/", server.uri()));
    assert!(client.fetch("ssd").await.is_ok());
}

#[tokio::test]
async fn fetch_passes_backend_error_body_through_on_200() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "rate limited"})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client.fetch("ssd").await.expect("200 should parse");
    assert_eq!(response.backend_error().as_deref(), Some("rate limited"));
}

// ---------------------------------------------------------------------------
// Error paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_rejects_blank_query_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch("  ").await.unwrap_err();
    assert!(matches!(err, SearchError::EmptyQuery), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn fetch_maps_400_with_error_body_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Product name is required"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch("ssd").await.unwrap_err();
    assert!(
        matches!(
            err,
            SearchError::UnexpectedStatus { status: 400, ref message, .. }
                if message.as_deref() == Some("Product name is required")
        ),
        "expected UnexpectedStatus(400), got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Fetch);
}

#[tokio::test]
async fn fetch_maps_500_without_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch("ssd").await.unwrap_err();
    assert!(
        matches!(err, SearchError::UnexpectedStatus { status: 500, message: None, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_does_not_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.fetch("ssd").await.is_err());
}

#[tokio::test]
async fn fetch_maps_non_json_body_to_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch("ssd").await.unwrap_err();
    assert!(matches!(err, SearchError::Deserialize { .. }), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Fetch);
}

/// Base URL of a local port with no listener behind it.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn fetch_maps_refused_connection_to_http_error() {
    let client = test_client(&closed_port_url());
    let err = client.fetch("ssd").await.unwrap_err();
    assert!(matches!(err, SearchError::Http(_)), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Fetch);
}
