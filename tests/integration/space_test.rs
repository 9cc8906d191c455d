//! Integration tests for space management.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

async fn create_space(app: &TestApp, name: &str) -> i64 {
    let response = app
        .request(
            "POST",
            "/api/spaces",
            Some(json!({ "name": name, "summary": "Test space", "spaceType": "shared" })),
            Some(app.token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body["id"].as_i64().expect("space id")
}

#[tokio::test]
async fn test_create_and_get_space() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/spaces",
            Some(json!({
                "name": "Handbook",
                "summary": "Employee handbook",
                "spaceType": "shared",
            })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Handbook");
    assert_eq!(response.body["spaceType"], "shared");
    assert_eq!(response.body["archived"], false);
    let id = response.body["id"].as_i64().expect("id");

    let fetched = app
        .request("GET", &format!("/api/spaces/{}", id), None, Some(app.token()))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Handbook");
    assert_eq!(fetched.body["summary"], "Employee handbook");
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let app = TestApp::new().await;
    create_space(&app, "Handbook").await;

    let response = app
        .request(
            "POST",
            "/api/spaces",
            Some(json!({ "name": "Handbook", "spaceType": "shared" })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/spaces",
            Some(json!({ "name": "", "spaceType": "shared" })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_space() {
    let app = TestApp::new().await;
    let id = create_space(&app, "Handbook").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/spaces/{}", id),
            Some(json!({ "summary": "Updated summary" })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["summary"], "Updated summary");
    assert_eq!(response.body["name"], "Handbook");
}

#[tokio::test]
async fn test_archive_hides_space_from_default_listing() {
    let app = TestApp::new().await;
    let id = create_space(&app, "Old docs").await;

    let archived = app
        .request(
            "POST",
            &format!("/api/spaces/{}/archive", id),
            None,
            Some(app.token()),
        )
        .await;
    assert_eq!(archived.status, StatusCode::OK);
    assert_eq!(archived.body["archived"], true);

    let listing = app
        .request("GET", "/api/spaces", None, Some(app.token()))
        .await;
    assert!(listing.body.as_array().expect("spaces").is_empty());

    let full = app
        .request(
            "GET",
            "/api/spaces?include_archived=true",
            None,
            Some(app.token()),
        )
        .await;
    assert_eq!(full.body.as_array().expect("spaces").len(), 1);
}

#[tokio::test]
async fn test_missing_space_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/spaces/999", None, Some(app.token()))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_spaces_are_scoped_to_the_caller_org() {
    let app = TestApp::new().await;

    let created = app
        .request_as(
            "POST",
            "/api/spaces",
            Some(json!({ "name": "Org one docs", "spaceType": "shared" })),
            Some(app.token()),
            1,
            1,
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["orgId"], 1);
    let id = created.body["id"].as_i64().expect("id");

    // Another organisation cannot see it.
    let other = app
        .request_as(
            "GET",
            &format!("/api/spaces/{}", id),
            None,
            Some(app.token()),
            2,
            9,
        )
        .await;
    assert_eq!(other.status, StatusCode::NOT_FOUND);

    // The owning organisation can.
    let own = app
        .request_as(
            "GET",
            &format!("/api/spaces/{}", id),
            None,
            Some(app.token()),
            1,
            1,
        )
        .await;
    assert_eq!(own.status, StatusCode::OK);
}

#[tokio::test]
async fn test_space_lifecycle_is_audited() {
    let app = TestApp::new().await;
    let id = create_space(&app, "Handbook").await;
    app.request(
        "POST",
        &format!("/api/spaces/{}/archive", id),
        None,
        Some(app.token()),
    )
    .await;

    let events = app.audit_events().await;
    assert!(events.contains(&"dal.space.created".to_string()), "{events:?}");
    assert!(events.contains(&"dal.space.archived".to_string()), "{events:?}");
}

#[tokio::test]
async fn test_invalid_space_type_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/spaces",
            Some(json!({ "name": "Docs", "spaceType": "banana" })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}
