//! Integration tests for `RowClient` using wiremock HTTP mocks.

use pulselens_client::{ClientError, RowClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> RowClient {
    RowClient::new(base_url, "test-key", 30).expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_posts_normalizes_and_sorts_rows() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "id": 10,
            "Account": "Late Account",
            "handle": "@late",
            "Date_From": "2024-01-06T08:00:00",
            "engagement": "120"
        },
        {
            "id": 2,
            "account": "Early Account",
            "handle": "@early",
            "Date_From": "2024-01-05",
            "Date_To": "2024-01-06",
            "engagement": 250,
            "narrative": "BreakingNews:MarketsRally"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/rest/v1/FM"))
        .and(query_param("select", "*"))
        .and(header("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client.fetch_posts("FM").await.expect("should fetch posts");

    assert_eq!(posts.len(), 2);
    // Numeric ids sort numerically: 2 before 10.
    assert_eq!(posts[0].id, "2");
    assert_eq!(posts[1].id, "10");

    assert_eq!(posts[0].account_name, "Early Account");
    assert_eq!(posts[0].handle, "@early");
    assert_eq!(posts[0].engagements, 250);
    assert_eq!(posts[0].narrative, "Breaking News: Markets Rally");
    assert_eq!(posts[0].date_from, "2024-01-05");
    assert_eq!(posts[0].date_to, "2024-01-06");
    assert_eq!(posts[1].date_from, "2024-01-06");
    // Single-topic path leaves source unset.
    assert!(posts[0].source.is_none());
}

#[tokio::test]
async fn fetch_posts_propagates_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/FM"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_posts("FM").await;

    assert!(matches!(result, Err(ClientError::Http(_))));
}

#[tokio::test]
async fn fetch_rows_surfaces_error_shaped_body() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "message": "permission denied for table FM",
        "code": "42501"
    });

    Mock::given(method("GET"))
        .and(path("/rest/v1/FM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_rows("FM").await;

    assert!(
        matches!(result, Err(ClientError::Api(ref msg)) if msg.contains("permission denied")),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_all_posts_skips_failed_tables() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/FM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "a", "handle": "@one" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/PTI"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let tables = vec!["FM".to_string(), "PTI".to_string()];
    let posts = client.fetch_all_posts(&tables).await;

    // The failed table is skipped, not fatal.
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].handle, "@one");
    assert_eq!(posts[0].source.as_deref(), Some("FM"));
}

#[tokio::test]
async fn fetch_all_posts_attaches_source_per_table() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/FM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "handle": "@fm" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/PTI"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "handle": "@pti" }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let tables = vec!["FM".to_string(), "PTI".to_string()];
    let posts = client.fetch_all_posts(&tables).await;

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].source.as_deref(), Some("FM"));
    assert_eq!(posts[1].source.as_deref(), Some("PTI"));
    // Missing ids are synthesized from table and index.
    assert_eq!(posts[0].id, "FM-0");
    assert_eq!(posts[1].id, "PTI-0");
}

#[tokio::test]
async fn bearer_token_overrides_anon_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/FM"))
        .and(header("apikey", "test-key"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_bearer("session-token");
    let posts = client.fetch_posts("FM").await.expect("should fetch");
    assert!(posts.is_empty());
}
