//! End-to-end workflow tests: configuration through client to typed errors.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webflow_api::{
    build_query_string, HttpClient, OAuthToken, RateLimitStrategy, WebflowConfig, WebflowError,
};

#[tokio::test]
async fn test_full_workflow_config_to_client_to_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sites": [] })))
        .mount(&server)
        .await;

    let config = WebflowConfig::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(2))
        .retries(1)
        .retry_delay(Duration::from_millis(10))
        .rate_limit_strategy(RateLimitStrategy::Retry)
        .build()
        .unwrap();

    // Config accessors return what was configured.
    assert_eq!(config.retries(), 1);
    assert_eq!(config.rate_limit_strategy(), RateLimitStrategy::Retry);

    let token = OAuthToken::new("access-token").with_refresh_token("refresh-token");
    let client = HttpClient::new(token, config).unwrap();

    let body: serde_json::Value = client.get("/sites", None).await.unwrap();
    assert_eq!(body, json!({ "sites": [] }));
}

#[tokio::test]
async fn test_surfaced_errors_serialize_to_wire_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "err": "NotFound",
            "code": 404,
            "msg": "site not found"
        })))
        .mount(&server)
        .await;

    let config = WebflowConfig::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    let client = HttpClient::new(OAuthToken::new("token"), config).unwrap();

    let error = client
        .get::<serde_json::Value>("/sites/nope", None)
        .await
        .unwrap_err();
    let wire = error.to_wire();

    assert_eq!(wire.err.as_deref(), Some("validation"));
    assert_eq!(wire.code, Some(404));
    assert_eq!(wire.msg.as_deref(), Some("site not found"));

    let serialized = serde_json::to_value(&wire).unwrap();
    assert_eq!(serialized["code"], json!(404));
}

#[test]
fn test_query_builder_is_usable_standalone() {
    assert_eq!(build_query_string(None), "");
    assert_eq!(build_query_string(Some(&[])), "");
    assert_eq!(
        build_query_string(Some(&[("a", Some("1".to_string())), ("b", None)])),
        "?a=1"
    );
}

#[test]
fn test_types_exported_at_crate_root() {
    let _: fn(webflow_api::HttpClient) = |_| {};
    let _: fn(webflow_api::WebflowError) = |_| {};
    let _: fn(webflow_api::WebflowConfig) = |_| {};
    let _: fn(webflow_api::WebflowConfigBuilder) = |_| {};
    let _: fn(webflow_api::OAuthToken) = |_| {};
    let _: fn(webflow_api::RateLimitInfo) = |_| {};
    let _: fn(webflow_api::RateLimitStrategy) = |_| {};
    let _: fn(webflow_api::ApiErrorBody) = |_| {};
}

#[test]
fn test_types_exported_from_clients_module() {
    let _: fn(webflow_api::clients::HttpClient) = |_| {};
    let _: fn(webflow_api::clients::WebflowError) = |_| {};
    let _: fn(webflow_api::clients::RateLimitInfo) = |_| {};
}

#[tokio::test]
async fn test_errors_branch_cleanly_for_ui_consumers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let config = WebflowConfig::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    let client = HttpClient::new(OAuthToken::new("token"), config).unwrap();

    let error = client
        .get::<serde_json::Value>("/forbidden", None)
        .await
        .unwrap_err();

    // The kind/code pair is what UI layers branch on.
    let message = match &error {
        WebflowError::Validation { code: 403, .. } => "you do not have access",
        WebflowError::RateLimit { .. } => "try again later",
        WebflowError::Auth { .. } => "please reconnect",
        _ => "something went wrong",
    };
    assert_eq!(message, "you do not have access");
}
