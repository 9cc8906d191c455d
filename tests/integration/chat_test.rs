//! Integration tests for chat and RAG completion flows.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{STUB_ANSWER, TestApp};

#[tokio::test]
async fn test_chat_completion_answers_and_persists() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/chat/completion",
            Some(json!({ "input": "How much leave do I get?" })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["response"], STUB_ANSWER);
    assert_eq!(response.body["degraded"], false);
    let thread_id = response.body["threadId"].as_i64().expect("threadId");

    let history = app
        .request(
            "GET",
            &format!("/api/chat/history?thread_id={}&feature=chat", thread_id),
            None,
            Some(app.token()),
        )
        .await;

    assert_eq!(history.status, StatusCode::OK);
    let messages = history.body["messages"].as_array().expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["human"], true);
    assert_eq!(messages[0]["message"], "How much leave do I get?");
    assert_eq!(messages[1]["human"], false);
}

#[tokio::test]
async fn test_chat_completion_reuses_existing_thread() {
    let app = TestApp::new().await;

    let thread = app
        .request(
            "POST",
            "/api/threads?feature=chat",
            Some(json!({ "topic": "Leave questions" })),
            Some(app.token()),
        )
        .await;
    assert_eq!(thread.status, StatusCode::OK);
    let thread_id = thread.body["id"].as_i64().expect("id");

    let response = app
        .request(
            "POST",
            "/api/chat/completion",
            Some(json!({ "input": "First question", "threadId": thread_id })),
            Some(app.token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["threadId"], thread_id);

    // No extra thread was created.
    let threads = app
        .request("GET", "/api/threads?feature=chat", None, Some(app.token()))
        .await;
    assert_eq!(threads.body.as_array().expect("threads").len(), 1);
}

#[tokio::test]
async fn test_blank_input_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/chat/completion",
            Some(json!({ "input": "   " })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_failing_provider_degrades_instead_of_erroring() {
    let app = TestApp::with_failing_provider().await;

    let response = app
        .request(
            "POST",
            "/api/chat/completion",
            Some(json!({ "input": "Is anyone there?" })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["degraded"], true);
    let thread_id = response.body["threadId"].as_i64().expect("threadId");

    // The exchange was persisted despite the model failure.
    let history = app
        .request(
            "GET",
            &format!("/api/chat/history?thread_id={}&feature=chat", thread_id),
            None,
            Some(app.token()),
        )
        .await;
    assert_eq!(history.body["messages"].as_array().expect("messages").len(), 2);
}

#[tokio::test]
async fn test_history_requires_thread_id() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/chat/history?feature=chat", None, Some(app.token()))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_pages_through_messages() {
    let app = TestApp::new().await;

    let first = app
        .request(
            "POST",
            "/api/chat/completion",
            Some(json!({ "input": "Question one" })),
            Some(app.token()),
        )
        .await;
    let thread_id = first.body["threadId"].as_i64().expect("threadId");
    for input in ["Question two", "Question three"] {
        app.request(
            "POST",
            "/api/chat/completion",
            Some(json!({ "input": input, "threadId": thread_id })),
            Some(app.token()),
        )
        .await;
    }

    let page1 = app
        .request(
            "GET",
            &format!(
                "/api/chat/history?thread_id={}&feature=chat&page=1&limit=4",
                thread_id
            ),
            None,
            Some(app.token()),
        )
        .await;
    assert_eq!(page1.body["messages"].as_array().expect("messages").len(), 4);
    assert_eq!(page1.body["info"]["count"], 6);
    assert_eq!(page1.body["info"]["next"], 2);
    assert!(page1.body["info"]["prev"].is_null());

    let page2 = app
        .request(
            "GET",
            &format!(
                "/api/chat/history?thread_id={}&feature=chat&page=2&limit=4",
                thread_id
            ),
            None,
            Some(app.token()),
        )
        .await;
    assert_eq!(page2.body["messages"].as_array().expect("messages").len(), 2);
    assert_eq!(page2.body["info"]["prev"], 1);
    assert!(page2.body["info"]["next"].is_null());
}

#[tokio::test]
async fn test_latest_thread_tracks_newest() {
    let app = TestApp::new().await;

    let empty = app
        .request(
            "GET",
            "/api/threads/latest?feature=chat",
            None,
            Some(app.token()),
        )
        .await;
    assert_eq!(empty.status, StatusCode::OK);
    assert!(empty.body.is_null());

    app.request(
        "POST",
        "/api/threads?feature=chat",
        Some(json!({ "topic": "First" })),
        Some(app.token()),
    )
    .await;
    let second = app
        .request(
            "POST",
            "/api/threads?feature=chat",
            Some(json!({ "topic": "Second" })),
            Some(app.token()),
        )
        .await;

    let latest = app
        .request(
            "GET",
            "/api/threads/latest?feature=chat",
            None,
            Some(app.token()),
        )
        .await;
    assert_eq!(latest.body["id"], second.body["id"]);
    assert_eq!(latest.body["topic"], "Second");
}

#[tokio::test]
async fn test_unknown_feature_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/threads?feature=banana", None, Some(app.token()))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rag_completion_draws_on_space_documents() {
    let app = TestApp::new().await;

    let space = app
        .request(
            "POST",
            "/api/spaces",
            Some(json!({ "name": "Handbook", "spaceType": "shared" })),
            Some(app.token()),
        )
        .await;
    let space_id = space.body["id"].as_i64().expect("space id");

    let upload = app
        .upload(
            space_id,
            "handbook.txt",
            b"Employees receive 20 days of annual leave.",
            app.token(),
        )
        .await;
    assert_eq!(upload.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/rag/completion",
            Some(json!({ "input": "How much annual leave?", "spaceId": space_id })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["degraded"], false);
    let answer = response.body["response"].as_str().expect("response");
    assert!(answer.contains(STUB_ANSWER));
    // The retrieved passage is cited under the answer.
    assert!(answer.contains("handbook.txt"));
}

#[tokio::test]
async fn test_rag_completion_with_unknown_space_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/rag/completion",
            Some(json!({ "input": "Anything", "spaceId": 999 })),
            Some(app.token()),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // The failed request left no orphan thread behind.
    let threads = app
        .request("GET", "/api/threads?feature=rag", None, Some(app.token()))
        .await;
    assert!(threads.body.as_array().expect("threads").is_empty());
}
