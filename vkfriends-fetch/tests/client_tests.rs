//! Integration tests for the `friends.get` client against a mock API server.

use std::net::TcpListener;
use std::time::Duration;

use futures::StreamExt;
use serde_json::json;
use vkfriends_core::FetchConfig;
use vkfriends_fetch::{FetchError, FriendPages, FriendsApiClient, PageFetcher, PageWindow};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(base_url: &str) -> FetchConfig {
    FetchConfig::builder("tok", "42")
        .api_url(base_url)
        .fields(["first_name", "last_name"])
        .request_timeout(Duration::from_millis(300))
        .build()
        .unwrap()
}

fn first_window() -> PageWindow {
    PageWindow {
        offset: 0,
        count: 100,
        is_last: false,
    }
}

fn friends_body(offset: usize, n: usize) -> serde_json::Value {
    let items: Vec<_> = (offset..offset + n)
        .map(|i| json!({"id": i, "first_name": format!("F{i}"), "last_name": "L"}))
        .collect();
    json!({"response": {"count": 5, "items": items}})
}

#[tokio::test]
async fn test_request_carries_query_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/friends.get"))
        .and(query_param("offset", "0"))
        .and(query_param("count", "100"))
        .and(query_param("order", "name"))
        .and(query_param("user_id", "42"))
        .and(query_param("fields", "first_name,last_name"))
        .and(query_param("v", "5.131"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(friends_body(0, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = FriendsApiClient::new(&config_for(&server.uri())).unwrap();
    let page = client.fetch_page(first_window()).await.unwrap();

    assert_eq!(page.status_code, 200);
    assert_eq!(page.reason, "OK");
    assert_eq!(page.items().unwrap().len(), 2);
}

#[tokio::test]
async fn test_api_error_payload_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"error_code": 5, "error_msg": "User authorization failed: invalid access_token"}
        })))
        .mount(&server)
        .await;

    let client = FriendsApiClient::new(&config_for(&server.uri())).unwrap();
    let page = client.fetch_page(first_window()).await.unwrap();

    let error = page.api_error().unwrap();
    assert_eq!(error.error_code, 5);
    assert!(error.error_msg.starts_with("User authorization failed"));
}

#[tokio::test]
async fn test_non_json_error_status_yields_null_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = FriendsApiClient::new(&config_for(&server.uri())).unwrap();
    let page = client.fetch_page(first_window()).await.unwrap();

    assert_eq!(page.status_code, 502);
    assert_eq!(page.reason, "Bad Gateway");
    assert!(page.payload.is_null());
}

#[tokio::test]
async fn test_malformed_ok_body_is_server_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = FriendsApiClient::new(&config_for(&server.uri())).unwrap();
    let err = client.fetch_page(first_window()).await.unwrap_err();

    assert!(err.is_server_response());
}

#[tokio::test]
async fn test_read_timeout_is_server_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(friends_body(0, 1))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = FriendsApiClient::new(&config_for(&server.uri())).unwrap();
    let err = client.fetch_page(first_window()).await.unwrap_err();

    match err {
        FetchError::ServerResponse { message, source } => {
            assert!(message.contains("timed out"), "unexpected message: {message}");
            assert!(source.is_some_and(|e| e.is_timeout()));
        }
        other => panic!("expected ServerResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_server_response_error() {
    // Bind and release a port so nothing is listening on it.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let client = FriendsApiClient::new(&config_for(&format!("http://{addr}"))).unwrap();
    let err = client.fetch_page(first_window()).await.unwrap_err();

    match err {
        FetchError::ServerResponse { source, .. } => {
            assert!(source.is_some_and(|e| e.is_connect()));
        }
        other => panic!("expected ServerResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connect_timeout_is_server_response_error() {
    // Reserved, non-routable address: the TCP handshake never completes.
    let client = FriendsApiClient::new(&config_for("http://10.255.255.1:81")).unwrap();
    let err = client.fetch_page(first_window()).await.unwrap_err();

    match err {
        FetchError::ServerResponse { message, source } => {
            let source = source.expect("transport error is kept as source");
            // Sandboxes without a route fail fast instead of timing out.
            assert!(source.is_timeout() || source.is_connect(), "unexpected source: {source}");
            if source.is_timeout() {
                assert!(message.contains("timed out"), "unexpected message: {message}");
            }
        }
        other => panic!("expected ServerResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_status_is_server_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let status_err = reqwest::get(server.uri())
        .await
        .unwrap()
        .error_for_status()
        .unwrap_err();
    let err = FetchError::from(status_err);

    match err {
        FetchError::ServerResponse { message, source } => {
            assert!(message.starts_with("HTTP error status"), "unexpected message: {message}");
            assert!(source.is_some_and(|e| e.is_status()));
        }
        other => panic!("expected ServerResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_pages_end_after_failed_request() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let config = config_for(&format!("http://{addr}"));
    let client = FriendsApiClient::new(&config).unwrap();

    let pages: Vec<_> = FriendPages::new(client, &config).into_stream().collect().await;

    assert_eq!(pages.len(), 1);
    assert!(pages[0].as_ref().unwrap_err().is_server_response());
}

#[tokio::test]
async fn test_pages_end_after_error_status_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri());
    let client = FriendsApiClient::new(&config).unwrap();

    let pages: Vec<_> = FriendPages::new(client, &config).into_stream().collect().await;

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].as_ref().unwrap().status_code, 503);
}

#[tokio::test]
async fn test_pages_walk_until_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(friends_body(0, 2)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(friends_body(2, 2)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("offset", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(friends_body(4, 1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("offset", "6"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": {"count": 5, "items": []}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = FetchConfig::builder("tok", "42")
        .api_url(server.uri())
        .count(2)
        .build()
        .unwrap();
    let client = FriendsApiClient::new(&config).unwrap();

    let pages: Vec<_> = FriendPages::new(client, &config).into_stream().collect().await;

    assert_eq!(pages.len(), 3);
    let names: Vec<String> = pages
        .iter()
        .flat_map(|p| p.as_ref().unwrap().records())
        .map(|r| r["first_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["F0", "F1", "F2", "F3", "F4"]);
}
