#![allow(clippy::unwrap_used)]
// Integration tests for `MatrixClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{BodyPartialJsonMatcher, body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orei_api::{API_PATH, Error, MatrixClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MatrixClient) {
    let server = MockServer::start().await;
    let client = client_for(&server, Duration::from_secs(5));
    (server, client)
}

fn client_for(server: &MockServer, timeout: Duration) -> MatrixClient {
    let base_url = Url::parse(&server.uri()).unwrap();
    let http = TransportConfig::with_timeout(timeout).build_client().unwrap();
    MatrixClient::with_client(http, &base_url)
}

fn comhead(name: &str) -> BodyPartialJsonMatcher {
    body_partial_json(json!({ "comhead": name, "language": 0 }))
}

// ── Status queries ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_video_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(comhead("get video status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "power": 1,
            "allsource": [2, 1, 0, 0],
            "allinputname": ["Apple TV", "Xbox", "PC", "Cable"],
            "alloutputname": ["hdmi output1", "Den", "Kitchen", "Bar"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let video = client.get_video_status().await.unwrap();

    assert_eq!(video.power, 1);
    assert_eq!(video.sources, vec![2, 1, 0, 0]);
    assert_eq!(video.input_names[0], "Apple TV");
    assert_eq!(video.output_names[1], "Den");
}

#[tokio::test]
async fn test_get_output_and_input_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(comhead("get output status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "allconnect": [1, 0, 0, 0],
            "allhdbtconnect": [0, 1, 0, 0],
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(comhead("get input status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inactive": [1, 0, 0, 0],
            "edid": [1, 1, 1, 1],
        })))
        .mount(&server)
        .await;

    let output = client.get_output_status().await.unwrap();
    assert_eq!(output.hdmi_connected, vec![1, 0, 0, 0]);
    assert_eq!(output.hdbt_connected, vec![0, 1, 0, 0]);

    let input = client.get_input_status().await.unwrap();
    assert_eq!(input.inactive, vec![1, 0, 0, 0]);
    assert_eq!(input.extra["edid"], json!([1, 1, 1, 1]));
}

#[tokio::test]
async fn test_body_parsed_without_json_content_type() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(comhead("get status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"model":"UHD44-EXB400R-K","version":"1.02"}"#, "text/html"),
        )
        .mount(&server)
        .await;

    let status = client.validate_connection().await.unwrap();

    assert_eq!(status.model.as_deref(), Some("UHD44-EXB400R-K"));
    assert_eq!(status.extra["version"], json!("1.02"));
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_video_switch_sends_source_pair() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_json(json!({
            "comhead": "video switch",
            "language": 0,
            "source": [3, 2],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client.video_switch(3, 2).await.unwrap();
    assert_eq!(reply["result"], json!(1));
}

#[tokio::test]
async fn test_set_power_sends_flag() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "comhead": "set poweronoff",
            "language": 0,
            "power": 0,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.set_power(false).await.unwrap();
}

// ── Connectivity failures ───────────────────────────────────────────

#[tokio::test]
async fn test_http_error_status_is_connectivity() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = client.get_video_status().await.unwrap_err();

    assert!(
        matches!(err, Error::Connectivity { .. }),
        "expected Connectivity error, got: {err:?}"
    );
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.host(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_malformed_body_is_connectivity() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = client.get_input_status().await.unwrap_err();
    assert!(matches!(err, Error::Connectivity { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_non_object_body_is_connectivity() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let err = client.get_output_status().await.unwrap_err();
    assert!(matches!(err, Error::Connectivity { .. }), "got: {err:?}");
    assert!(err.to_string().contains("expected a JSON object"));
}

#[tokio::test]
async fn test_timeout_is_connectivity() {
    let server = MockServer::start().await;
    let client = client_for(&server, Duration::from_millis(100));

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();

    assert!(matches!(err, Error::Connectivity { .. }), "got: {err:?}");
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_connection_refused_is_connectivity() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let base_url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();

    let client = MatrixClient::with_client(reqwest::Client::new(), &base_url);
    let err = client.get_status().await.unwrap_err();

    assert!(matches!(err, Error::Connectivity { .. }), "got: {err:?}");
    assert!(!err.is_timeout());
}

#[test]
fn test_new_builds_endpoint_url() {
    let client = MatrixClient::new("192.168.1.50", 8080, &TransportConfig::default()).unwrap();
    assert_eq!(
        client.endpoint().as_str(),
        "http://192.168.1.50:8080/cgi-bin/instr"
    );
    assert_eq!(client.host(), "192.168.1.50");
}
