//! Redirect handoff integration tests
//!
//! These tests drive the full router the way a provider callback would and
//! check status codes, content types and bodies of every response branch.

use alldone::{
    config::Config,
    handoff::{DeviceTarget, encode_uri_component},
    http::{AppState, build_router},
    templates::build_engine,
};
use axum::{Router, body::Body};
use http::{Request, StatusCode, header::CONTENT_TYPE};
use std::sync::Arc;
use tower::ServiceExt;

fn create_app() -> Router {
    let config = Config {
        version: "test".to_string(),
        http_port: "3000".to_string().try_into().unwrap(),
        http_templates_path: format!("{}/templates", env!("CARGO_MANIFEST_DIR")),
        redirect_route: "/alldone".to_string().try_into().unwrap(),
    };
    let template_env = build_engine(&config).unwrap();

    build_router(AppState {
        config: Arc::new(config),
        template_env,
    })
}

async fn get(uri: &str) -> (StatusCode, String, String) {
    let response = create_app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

const VALID_STATE: &str = "device_ip%3D192.168.1.5%26callback_path%3D%2Foauth%2Fcallback";

#[tokio::test]
async fn test_missing_code() {
    let (status, content_type, body) = get(&format!("/alldone?state={VALID_STATE}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(body, "Missing 'code' or 'state' parameter.");
}

#[tokio::test]
async fn test_missing_state() {
    let (status, _, body) = get("/alldone?code=abc123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing 'code' or 'state' parameter.");

    let (status, _, body) = get("/alldone").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing 'code' or 'state' parameter.");
}

#[tokio::test]
async fn test_empty_parameters_count_as_missing() {
    let (status, _, body) = get(&format!("/alldone?code=&state={VALID_STATE}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing 'code' or 'state' parameter.");
}

#[tokio::test]
async fn test_state_missing_device_ip() {
    let (status, content_type, body) =
        get("/alldone?code=abc123&state=callback_path%3D%2Foauth%2Fcallback").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(body, "Missing 'device_ip' or 'callback_path' in state.");
}

#[tokio::test]
async fn test_state_missing_callback_path() {
    let (status, _, body) = get("/alldone?code=abc123&state=device_ip%3D192.168.1.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing 'device_ip' or 'callback_path' in state.");
}

#[tokio::test]
async fn test_unparsable_state_is_a_client_error() {
    let (status, _, body) = get("/alldone?code=abc123&state=just-some-text").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing 'device_ip' or 'callback_path' in state.");
}

#[tokio::test]
async fn test_redirect_page() {
    let (status, content_type, body) =
        get(&format!("/alldone?code=abc123&state={VALID_STATE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains(
        "window.location.href = \"http://192.168.1.5/oauth/callback?code=abc123\";"
    ));
}

#[tokio::test]
async fn test_redirect_page_on_root_route() {
    let (status, _, body) = get(&format!("/?code=abc123&state={VALID_STATE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http://192.168.1.5/oauth/callback?code=abc123"));
}

#[tokio::test]
async fn test_code_is_percent_encoded() {
    // Raw code value is "a b&c".
    let (status, _, body) = get(&format!("/alldone?code=a%20b%26c&state={VALID_STATE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http://192.168.1.5/oauth/callback?code=a%20b%26c\""));
    assert!(!body.contains("code=a b&c"));
}

#[tokio::test]
async fn test_identical_requests_produce_identical_responses() {
    let uri = format!("/alldone?code=abc123&state={VALID_STATE}");
    let first = get(&uri).await;
    let second = get(&uri).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_malformed_state_encoding_is_internal_error() {
    // %25 decodes to a lone '%' that the state decoder then rejects.
    let (status, content_type, body) =
        get("/alldone?code=abc123&state=device_ip%3D1.2.3.4%25").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(body, "Internal Server Error");
}

#[tokio::test]
async fn test_state_built_for_device_round_trips() {
    let target = DeviceTarget {
        device_ip: "10.1.2.3:8080".to_string(),
        callback_path: "/oauth_callback".to_string(),
    };
    let uri = format!(
        "/alldone?code=4%2F0AbC&state={}",
        encode_uri_component(&target.to_state())
    );

    let (status, _, body) = get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("window.location.href = \"http://10.1.2.3:8080/oauth_callback?code=4%2F0AbC\";"));
}

#[tokio::test]
async fn test_state_values_are_not_escaped() {
    let state = encode_uri_component("device_ip=evil.example&callback_path=/x\"</script>");
    let (status, _, body) = get(&format!("/alldone?code=abc&state={state}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http://evil.example/x\"</script>?code=abc"));
}

#[tokio::test]
async fn test_state_with_invalid_utf8_is_internal_error() {
    let (status, _, body) = get("/alldone?code=abc&state=%FF").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error");

    let (status, _, body) = get(
        "/alldone?code=abc&state=device_ip%3D1.2.3.4%26callback_path%3D%2Fcb%FF",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error");
}

#[tokio::test]
async fn test_undecodable_code_is_forwarded_intact() {
    let (status, _, body) = get(&format!("/alldone?code=%FF&state={VALID_STATE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("window.location.href = \"http://192.168.1.5/oauth/callback?code=%25FF\";"));
}

#[tokio::test]
async fn test_code_keeps_unreserved_marks() {
    let (status, _, body) = get(&format!("/alldone?code=a!b*(c)'~&state={VALID_STATE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http://192.168.1.5/oauth/callback?code=a!b*(c)'~\""));
}
