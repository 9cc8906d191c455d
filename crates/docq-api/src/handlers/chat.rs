//! Chat completion, history and thread handlers.

use axum::Json;
use axum::extract::{Query, State};

use docq_core::error::AppError;
use docq_core::types::{FeatureType, SpaceId, ThreadId};
use docq_service::chat::QueryParams;

use crate::dto;
use crate::dto::request::{
    ChatCompletionRequest, CreateThreadRequest, FeatureParams, HistoryParams, RagCompletionRequest,
};
use crate::dto::response::{
    CompletionResponse, HistoryResponse, MessageModel, PageInfo, ThreadModel,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/chat/completion
pub async fn chat_completion(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChatCompletionRequest>,
) -> Result<Json<CompletionResponse>, ApiError> {
    dto::validate(&req)?;

    let feature = FeatureType::ChatPrivate;
    let thread_id = resolve_thread(&state, &auth, feature, req.thread_id, &req.input).await?;
    let exchange = state
        .chat_service
        .query(
            &auth,
            feature,
            thread_id,
            QueryParams {
                input: req.input,
                space: None,
                extra_spaces: Vec::new(),
            },
        )
        .await?;

    Ok(Json(CompletionResponse {
        response: exchange.assistant.message,
        thread_id: thread_id.as_i64(),
        degraded: exchange.degraded,
    }))
}

/// POST /api/rag/completion
pub async fn rag_completion(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RagCompletionRequest>,
) -> Result<Json<CompletionResponse>, ApiError> {
    dto::validate(&req)?;

    // Resolving spaces up front keeps a bad spaceId from creating an
    // orphan thread below, and applies org scoping.
    let space = state
        .space_service
        .get(&auth, SpaceId::new(req.space_id))
        .await?;
    let mut extra_spaces = Vec::with_capacity(req.extra_space_ids.len());
    for id in &req.extra_space_ids {
        let extra = state.space_service.get(&auth, SpaceId::new(*id)).await?;
        extra_spaces.push(extra.key());
    }

    let feature = FeatureType::AskShared;
    let thread_id = resolve_thread(&state, &auth, feature, req.thread_id, &req.input).await?;
    let exchange = state
        .chat_service
        .query(
            &auth,
            feature,
            thread_id,
            QueryParams {
                input: req.input,
                space: Some(space.key()),
                extra_spaces,
            },
        )
        .await?;

    Ok(Json(CompletionResponse {
        response: exchange.assistant.message,
        thread_id: thread_id.as_i64(),
        degraded: exchange.degraded,
    }))
}

/// GET /api/chat/history?thread_id=...&feature=...&page=...&limit=...
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let thread_id = params
        .thread_id
        .ok_or_else(|| AppError::validation("thread_id query parameter is required"))?;
    let feature = params.feature_type()?;
    let messages = state
        .chat_service
        .history(&auth, feature, ThreadId::new(thread_id))
        .await?;

    let page = params.page();
    let limit = params.limit();
    let count = messages.len();
    let start = ((page - 1) * limit) as usize;
    let page_messages: Vec<MessageModel> = messages
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .map(MessageModel::from)
        .collect();

    let next = (start + (limit as usize) < count).then(|| page + 1);
    let prev = (page > 1).then(|| page - 1);

    Ok(Json(HistoryResponse {
        messages: page_messages,
        info: PageInfo {
            page,
            limit,
            count,
            next,
            prev,
        },
    }))
}

/// POST /api/threads?feature=chat|rag
pub async fn create_thread(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<FeatureParams>,
    Json(req): Json<CreateThreadRequest>,
) -> Result<Json<ThreadModel>, ApiError> {
    dto::validate(&req)?;
    let feature = params.feature_type()?;
    let thread = state
        .chat_service
        .create_thread(&auth, feature, &req.topic)
        .await?;
    Ok(Json(thread.into()))
}

/// GET /api/threads?feature=chat|rag
pub async fn list_threads(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<FeatureParams>,
) -> Result<Json<Vec<ThreadModel>>, ApiError> {
    let feature = params.feature_type()?;
    let threads = state.chat_service.list_threads(&auth, feature).await?;
    Ok(Json(threads.into_iter().map(ThreadModel::from).collect()))
}

/// GET /api/threads/latest?feature=chat|rag
pub async fn latest_thread(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<FeatureParams>,
) -> Result<Json<Option<ThreadModel>>, ApiError> {
    let feature = params.feature_type()?;
    let thread = state.chat_service.latest_thread(&auth, feature).await?;
    Ok(Json(thread.map(ThreadModel::from)))
}

/// Uses the given thread, or starts one with the question as its topic.
async fn resolve_thread(
    state: &AppState,
    auth: &AuthUser,
    feature: FeatureType,
    thread_id: Option<i64>,
    input: &str,
) -> Result<ThreadId, ApiError> {
    match thread_id {
        Some(id) => Ok(ThreadId::new(id)),
        None => {
            let thread = state
                .chat_service
                .create_thread(auth, feature, input)
                .await?;
            Ok(thread.id)
        }
    }
}
