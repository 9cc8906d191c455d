//! Chat service: thread management and the question/answer flow.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use docq_core::config::{ChatConfig, IndexConfig};
use docq_core::error::AppError;
use docq_core::traits::{CompletionRequest, DocumentIndex, ScoredPassage};
use docq_core::types::{FeatureKey, FeatureType, SpaceKey, ThreadId};
use docq_database::repositories::{MessageRepository, ThreadRepository};
use docq_entity::chat::{ChatMessage, ChatThread};
use docq_extension::{EventContext, EventDispatcher, LifecycleEvent};

use crate::chat::prompt;
use crate::context::RequestContext;
use crate::provider::ProviderResolver;

/// Runs chat and ask conversations.
///
/// A failed model call or retrieval never fails the request: the exchange
/// is persisted with a canned apology and marked degraded instead.
#[derive(Clone)]
pub struct ChatService {
    /// Thread repository.
    threads: Arc<ThreadRepository>,
    /// Message repository.
    messages: Arc<MessageRepository>,
    /// Resolves the completion provider for an organisation.
    providers: Arc<dyn ProviderResolver>,
    /// Document index queried by the ask features.
    index: Arc<dyn DocumentIndex>,
    /// Dispatcher for firing lifecycle events.
    dispatcher: Arc<EventDispatcher>,
    /// Number of prior messages included in each prompt.
    history_window: u32,
    /// Number of passages retrieved per question.
    retrieval_top_k: u32,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("history_window", &self.history_window)
            .field("retrieval_top_k", &self.retrieval_top_k)
            .finish()
    }
}

/// Parameters for one question within a thread.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QueryParams {
    /// The question text.
    pub input: String,
    /// Primary space to retrieve from, required for ask features.
    pub space: Option<SpaceKey>,
    /// Additional spaces searched alongside the primary one.
    pub extra_spaces: Vec<SpaceKey>,
}

/// One persisted question/answer exchange.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatExchange {
    /// The saved human message.
    pub human: ChatMessage,
    /// The saved assistant message, sources appended when present.
    pub assistant: ChatMessage,
    /// True when the answer is the canned apology rather than a completion.
    pub degraded: bool,
}

impl ChatService {
    /// Creates a new chat service.
    pub fn new(
        threads: Arc<ThreadRepository>,
        messages: Arc<MessageRepository>,
        providers: Arc<dyn ProviderResolver>,
        index: Arc<dyn DocumentIndex>,
        dispatcher: Arc<EventDispatcher>,
        chat_config: &ChatConfig,
        index_config: &IndexConfig,
    ) -> Self {
        Self {
            threads,
            messages,
            providers,
            index,
            dispatcher,
            history_window: chat_config.history_window,
            retrieval_top_k: index_config.top_k,
        }
    }

    /// Creates a thread for a feature, topic taken from the first question.
    pub async fn create_thread(
        &self,
        ctx: &RequestContext,
        feature: FeatureType,
        topic: &str,
    ) -> Result<ChatThread, AppError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::validation("Thread topic cannot be empty"));
        }

        let feature_key = ctx.feature_key(feature);
        let thread = self
            .threads
            .create(&feature_key, topic, ctx.request_time)
            .await?;

        info!(
            user_id = %ctx.user_id,
            thread_id = %thread.id,
            feature = %feature_key,
            "Created chat thread"
        );

        self.dispatcher
            .fire_and_forget(
                &EventContext::new(LifecycleEvent::ThreadCreated)
                    .with_actor(ctx.user_id)
                    .with_int("thread_id", thread.id.as_i64())
                    .with_string("feature", &feature_key.value())
                    .with_string("topic", &thread.topic),
            )
            .await;

        Ok(thread)
    }

    /// Most recently created thread for a feature, if any.
    pub async fn latest_thread(
        &self,
        ctx: &RequestContext,
        feature: FeatureType,
    ) -> Result<Option<ChatThread>, AppError> {
        self.threads.latest(&ctx.feature_key(feature)).await
    }

    /// All threads for a feature, newest first.
    pub async fn list_threads(
        &self,
        ctx: &RequestContext,
        feature: FeatureType,
    ) -> Result<Vec<ChatThread>, AppError> {
        self.threads.list(&ctx.feature_key(feature)).await
    }

    /// Full message history of a thread, oldest first.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        feature: FeatureType,
        thread_id: ThreadId,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let thread = self
            .require_thread(&ctx.feature_key(feature), thread_id)
            .await?;
        self.messages.list(thread.id).await
    }

    /// Answers one question within a thread and persists the exchange.
    ///
    /// Bad input surfaces as a validation error before anything is saved.
    /// Once past validation, provider and index failures degrade to the
    /// canned apology and both messages are still written.
    pub async fn query(
        &self,
        ctx: &RequestContext,
        feature: FeatureType,
        thread_id: ThreadId,
        params: QueryParams,
    ) -> Result<ChatExchange, AppError> {
        let input = params.input.trim();
        if input.is_empty() {
            return Err(AppError::validation("Question cannot be empty"));
        }
        if feature.is_ask() && params.space.is_none() && params.extra_spaces.is_empty() {
            return Err(AppError::validation(
                "Ask features need at least one space to search",
            ));
        }

        let feature_key = ctx.feature_key(feature);
        let thread = self.require_thread(&feature_key, thread_id).await?;

        let window = self
            .messages
            .window_before(thread.id, ctx.request_time, self.history_window)
            .await?;
        let history = prompt::render_history(&window);

        let (answer, sources, degraded) =
            match self.answer(ctx, feature, &params, &history, input).await {
                Ok((text, passages)) => (text, prompt::format_sources(&passages), false),
                Err(e) => {
                    warn!(
                        user_id = %ctx.user_id,
                        thread_id = %thread.id,
                        error = %e,
                        "Query failed, answering with apology"
                    );
                    (prompt::QUERY_ERROR_MESSAGE.to_string(), None, true)
                }
            };

        let human = self
            .messages
            .save(thread.id, input, true, ctx.request_time)
            .await?;
        let assistant_text = prompt::compose_assistant_message(&answer, sources.as_deref());
        let assistant = self
            .messages
            .save(thread.id, &assistant_text, false, Utc::now())
            .await?;

        info!(
            user_id = %ctx.user_id,
            thread_id = %thread.id,
            feature = %feature_key,
            degraded,
            "Chat exchange saved"
        );

        self.dispatcher
            .fire_and_forget(
                &EventContext::new(LifecycleEvent::ChatHistorySaved)
                    .with_actor(ctx.user_id)
                    .with_int("thread_id", thread.id.as_i64())
                    .with_int("human_message_id", human.id.as_i64())
                    .with_int("assistant_message_id", assistant.id.as_i64())
                    .with_string("feature", &feature_key.value()),
            )
            .await;
        self.dispatcher
            .fire_and_forget(
                &EventContext::new(LifecycleEvent::ChatCompleted)
                    .with_actor(ctx.user_id)
                    .with_int("thread_id", thread.id.as_i64())
                    .with_string("feature", &feature_key.value())
                    .with_bool("degraded", degraded),
            )
            .await;

        Ok(ChatExchange {
            human,
            assistant,
            degraded,
        })
    }

    /// Produces the answer text and the passages it drew on.
    ///
    /// Provider resolution happens here so a misconfigured model collection
    /// degrades the exchange instead of failing the request.
    async fn answer(
        &self,
        ctx: &RequestContext,
        feature: FeatureType,
        params: &QueryParams,
        history: &str,
        input: &str,
    ) -> Result<(String, Vec<ScoredPassage>), AppError> {
        let provider = self.providers.provider_for(ctx.org_id).await?;

        let (prompt_text, passages) = if feature.is_ask() {
            let passages = self.retrieve(params, input).await?;
            (prompt::question_prompt(history, &passages, input), passages)
        } else {
            (prompt::chat_prompt(history, input), Vec::new())
        };

        let completion = provider
            .complete(&CompletionRequest::new(prompt_text))
            .await?;
        Ok((completion.text, passages))
    }

    /// Retrieves passages across the primary and extra spaces, best first.
    async fn retrieve(
        &self,
        params: &QueryParams,
        query: &str,
    ) -> Result<Vec<ScoredPassage>, AppError> {
        let mut spaces: Vec<&SpaceKey> = params.space.iter().collect();
        spaces.extend(params.extra_spaces.iter());

        let mut passages = Vec::new();
        for space in spaces {
            passages.extend(
                self.index
                    .retrieve(space, query, self.retrieval_top_k)
                    .await?,
            );
        }
        passages.sort_by(|a, b| b.score.total_cmp(&a.score));
        passages.truncate(self.retrieval_top_k as usize);
        Ok(passages)
    }

    async fn require_thread(
        &self,
        feature: &FeatureKey,
        thread_id: ThreadId,
    ) -> Result<ChatThread, AppError> {
        self.threads
            .find_by_id(feature, thread_id)
            .await?
            .ok_or_else(|| AppError::not_found("Thread not found"))
    }
}
