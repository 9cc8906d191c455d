//! Integration tests for organisation settings.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_org_settings_round_trip() {
    let app = TestApp::new().await;

    let initial = app
        .request("GET", "/api/orgs/1/settings", None, Some(app.token()))
        .await;
    assert_eq!(initial.status, StatusCode::OK);
    assert_eq!(initial.body, json!({}));

    let updated = app
        .request(
            "PUT",
            "/api/orgs/1/settings",
            Some(json!({ "Model Collection": "openai_latest" })),
            Some(app.token()),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["Model Collection"], "openai_latest");

    let fetched = app
        .request("GET", "/api/orgs/1/settings", None, Some(app.token()))
        .await;
    assert_eq!(fetched.body["Model Collection"], "openai_latest");
}

#[tokio::test]
async fn test_settings_are_scoped_per_org() {
    let app = TestApp::new().await;

    app.request(
        "PUT",
        "/api/orgs/1/settings",
        Some(json!({ "Enabled Features": ["chat_private"] })),
        Some(app.token()),
    )
    .await;

    let other = app
        .request("GET", "/api/orgs/2/settings", None, Some(app.token()))
        .await;
    assert_eq!(other.body, json!({}));
}

#[tokio::test]
async fn test_unknown_model_collection_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "PUT",
            "/api/orgs/1/settings",
            Some(json!({ "Model Collection": "no_such_collection" })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    // Nothing was written.
    let fetched = app
        .request("GET", "/api/orgs/1/settings", None, Some(app.token()))
        .await;
    assert_eq!(fetched.body, json!({}));
}

#[tokio::test]
async fn test_invalid_feature_name_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "PUT",
            "/api/orgs/1/settings",
            Some(json!({ "Enabled Features": ["time_travel"] })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_settings_updates_are_audited() {
    let app = TestApp::new().await;

    app.request(
        "PUT",
        "/api/orgs/1/settings",
        Some(json!({ "Enabled Features": ["chat_private", "ask_shared"] })),
        Some(app.token()),
    )
    .await;

    let events = app.audit_events().await;
    assert!(
        events.contains(&"dal.settings.updated".to_string()),
        "{events:?}"
    );
}
