//! Integration tests for extension loading and event delivery.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_manifest_extensions_are_listed() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/extensions", None, Some(app.token()))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let extensions = response.body.as_array().expect("extensions");
    assert_eq!(extensions.len(), 2);

    // Registration order follows manifest file order.
    assert_eq!(extensions[0]["key"], "docq.audit_trail");
    assert_eq!(extensions[0]["className"], "AuditTrailExtension");
    assert_eq!(extensions[0]["moduleName"], "docq_extensions.audit_trail");
    assert_eq!(extensions[0]["roles"], json!(["data_layer"]));

    assert_eq!(extensions[1]["key"], "docq.usage_metrics");
    assert_eq!(extensions[1]["roles"], json!(["web_ui"]));
}

#[tokio::test]
async fn test_events_reach_the_audit_trail() {
    let app = TestApp::new().await;
    assert!(app.audit_events().await.is_empty());

    app.request(
        "POST",
        "/api/threads?feature=chat",
        Some(json!({ "topic": "Leave" })),
        Some(app.token()),
    )
    .await;

    let events = app.audit_events().await;
    assert_eq!(events, vec!["dal.thread.created".to_string()]);
}

#[tokio::test]
async fn test_unresolvable_entry_is_skipped_and_the_rest_load() {
    let app = TestApp::with_manifest(
        r#"{
            "docq.audit_trail": {
                "name": "Audit Trail",
                "module_name": "docq_extensions.audit_trail",
                "source": "./crates/extension-audit-trail",
                "class_name": "AuditTrailExtension"
            },
            "docq.missing": {
                "name": "Missing",
                "module_name": "docq_extensions.nowhere",
                "source": "./nowhere"
            }
        }"#,
    )
    .await;

    let response = app
        .request("GET", "/api/extensions", None, Some(app.token()))
        .await;
    let extensions = response.body.as_array().expect("extensions");
    assert_eq!(extensions.len(), 1);
    assert_eq!(extensions[0]["key"], "docq.audit_trail");
}

#[tokio::test]
async fn test_malformed_manifest_loads_zero_but_app_serves() {
    let app = TestApp::with_manifest("{broken").await;

    let response = app
        .request("GET", "/api/extensions", None, Some(app.token()))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.as_array().expect("extensions").is_empty());

    // Firing events against the empty registry does not disturb requests.
    let thread = app
        .request(
            "POST",
            "/api/threads?feature=chat",
            Some(json!({ "topic": "Still works" })),
            Some(app.token()),
        )
        .await;
    assert_eq!(thread.status, StatusCode::OK);
}

#[tokio::test]
async fn test_chat_completion_is_audited_end_to_end() {
    let app = TestApp::new().await;

    app.request(
        "POST",
        "/api/chat/completion",
        Some(json!({ "input": "How much leave do I get?" })),
        Some(app.token()),
    )
    .await;

    // The audit trail holds the data_layer role, so it records the two
    // dal events of the exchange; webui.chat.completed goes to the
    // web_ui-role extension instead.
    let events = app.audit_events().await;
    assert_eq!(
        events,
        vec![
            "dal.thread.created".to_string(),
            "dal.chat.history_saved".to_string(),
        ]
    );
}
