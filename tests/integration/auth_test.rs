//! Integration tests for the bearer authentication middleware.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_hello_needs_no_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/hello", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["response"], "Hello World!");
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/spaces", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/spaces", None, Some("not-the-secret"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_is_accepted() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/spaces", None, Some(app.token()))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_array());
}

#[tokio::test]
async fn test_empty_secret_rejects_every_token() {
    let app = TestApp::with_api_secret("").await;

    let response = app.request("GET", "/api/spaces", None, Some("")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/spaces", None, Some("anything"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // The liveness endpoint stays reachable.
    let response = app.request("GET", "/api/hello", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/nowhere", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
