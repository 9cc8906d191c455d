//! Integration tests for document upload, listing and indexing.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

async fn create_space(app: &TestApp, name: &str) -> i64 {
    let response = app
        .request(
            "POST",
            "/api/spaces",
            Some(json!({ "name": name, "spaceType": "shared" })),
            Some(app.token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body["id"].as_i64().expect("space id")
}

#[tokio::test]
async fn test_upload_list_delete_flow() {
    let app = TestApp::new().await;
    let space_id = create_space(&app, "Handbook").await;

    let upload = app
        .upload(space_id, "notes.txt", b"leave policy", app.token())
        .await;
    assert_eq!(upload.status, StatusCode::OK, "{:?}", upload.body);
    assert_eq!(upload.body["name"], "notes.txt");
    assert_eq!(upload.body["sizeBytes"], 12);

    let listing = app
        .request(
            "GET",
            &format!("/api/spaces/{}/files", space_id),
            None,
            Some(app.token()),
        )
        .await;
    let files = listing.body.as_array().expect("files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "notes.txt");

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/spaces/{}/files/notes.txt", space_id),
            None,
            Some(app.token()),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["deleted"], "notes.txt");

    let after = app
        .request(
            "GET",
            &format!("/api/spaces/{}/files", space_id),
            None,
            Some(app.token()),
        )
        .await;
    assert!(after.body.as_array().expect("files").is_empty());
}

#[tokio::test]
async fn test_upload_into_archived_space_is_rejected() {
    let app = TestApp::new().await;
    let space_id = create_space(&app, "Old docs").await;
    app.request(
        "POST",
        &format!("/api/spaces/{}/archive", space_id),
        None,
        Some(app.token()),
    )
    .await;

    let upload = app
        .upload(space_id, "late.txt", b"too late", app.token())
        .await;

    assert_eq!(upload.status, StatusCode::BAD_REQUEST);
    assert_eq!(upload.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upload_requires_the_file_field() {
    let app = TestApp::new().await;
    let space_id = create_space(&app, "Handbook").await;

    let response = app
        .multipart(
            &format!("/api/spaces/{}/files", space_id),
            "attachment",
            "notes.txt",
            b"content",
            app.token(),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_into_missing_space_is_not_found() {
    let app = TestApp::new().await;

    let response = app.upload(999, "notes.txt", b"content", app.token()).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reindex_reports_stored_passages() {
    let app = TestApp::new().await;
    let space_id = create_space(&app, "Handbook").await;
    app.upload(
        space_id,
        "policy.txt",
        b"Annual leave is 25 days for all employees.",
        app.token(),
    )
    .await;

    let response = app
        .request(
            "POST",
            &format!("/api/spaces/{}/reindex", space_id),
            None,
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["passages"].as_u64().expect("passages") >= 1);
}

#[tokio::test]
async fn test_delete_missing_document_is_not_found() {
    let app = TestApp::new().await;
    let space_id = create_space(&app, "Handbook").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/spaces/{}/files/ghost.txt", space_id),
            None,
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_uploads_are_audited_with_reindex() {
    let app = TestApp::new().await;
    let space_id = create_space(&app, "Handbook").await;

    app.upload(space_id, "notes.txt", b"leave policy", app.token())
        .await;

    let events = app.audit_events().await;
    assert!(
        events.contains(&"dal.document.uploaded".to_string()),
        "{events:?}"
    );
    assert!(
        events.contains(&"dal.index.rebuilt".to_string()),
        "{events:?}"
    );
}
