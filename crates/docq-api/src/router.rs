//! Route definitions for the Docq HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. Every
//! route except `/api/hello` sits behind the bearer-secret middleware.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let protected = Router::new()
        .merge(chat_routes())
        .merge(thread_routes())
        .merge(space_routes())
        .merge(settings_routes())
        .merge(extension_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_bearer,
        ));

    let api_routes = Router::new()
        .route("/hello", get(handlers::hello::hello))
        .merge(protected);

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Completion and history endpoints
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat/completion", post(handlers::chat::chat_completion))
        .route("/rag/completion", post(handlers::chat::rag_completion))
        .route("/chat/history", get(handlers::chat::history))
}

/// Thread creation and listing
fn thread_routes() -> Router<AppState> {
    Router::new()
        .route("/threads", post(handlers::chat::create_thread))
        .route("/threads", get(handlers::chat::list_threads))
        .route("/threads/latest", get(handlers::chat::latest_thread))
}

/// Space CRUD and the documents within a space
fn space_routes() -> Router<AppState> {
    Router::new()
        .route("/spaces", get(handlers::space::list_spaces))
        .route("/spaces", post(handlers::space::create_space))
        .route("/spaces/{id}", get(handlers::space::get_space))
        .route("/spaces/{id}", put(handlers::space::update_space))
        .route("/spaces/{id}/archive", post(handlers::space::archive_space))
        .route("/spaces/{id}/files", get(handlers::document::list_documents))
        .route(
            "/spaces/{id}/files",
            post(handlers::document::upload_document),
        )
        .route(
            "/spaces/{id}/files/{name}",
            delete(handlers::document::delete_document),
        )
        .route(
            "/spaces/{id}/reindex",
            post(handlers::document::reindex_space),
        )
}

/// Organisation settings
fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orgs/{org_id}/settings",
            get(handlers::settings::get_org_settings),
        )
        .route(
            "/orgs/{org_id}/settings",
            put(handlers::settings::update_org_settings),
        )
}

/// Loaded extension listing
fn extension_routes() -> Router<AppState> {
    Router::new().route("/extensions", get(handlers::extension::list_extensions))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderName, HeaderValue, Method};
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = cors_config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
