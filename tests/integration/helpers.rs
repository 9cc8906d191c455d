//! Shared test helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use docq_core::AppResult;
use docq_core::config::app::{CorsConfig, ServerConfig};
use docq_core::config::chat::ChatConfig;
use docq_core::config::index::IndexConfig;
use docq_core::config::logging::LoggingConfig;
use docq_core::config::storage::StorageConfig;
use docq_core::config::{AppConfig, DatabaseConfig, ExtensionsConfig};
use docq_core::traits::{Completion, CompletionProvider, CompletionRequest};
use docq_core::types::OrgId;
use docq_database::DatabasePool;
use docq_database::repositories::{
    MessageRepository, SettingsRepository, SpaceRepository, ThreadRepository,
};
use docq_extension::{ExtensionCatalog, ExtensionInit, ExtensionManager, LoggingObserver};
use docq_llm::ModelCollections;
use docq_service::{
    ChatService, DocumentService, ProviderResolver, SettingsService, SpaceService,
};

const DEFAULT_SECRET: &str = "test-secret";

/// Canned answer returned by the stub completion provider.
pub const STUB_ANSWER: &str = "The policy allows 20 days of annual leave.";

const DEFAULT_MANIFEST: &str = r#"{
  "docq.audit_trail": {
    "name": "Audit Trail",
    "module_name": "docq_extensions.audit_trail",
    "source": "./crates/extension-audit-trail",
    "class_name": "AuditTrailExtension"
  },
  "docq.usage_metrics": {
    "name": "Usage Metrics",
    "module_name": "docq_extensions.usage_metrics",
    "source": "./crates/extension-usage-metrics",
    "class_name": "UsageMetricsExtension"
  }
}"#;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: SqlitePool,
    /// Application config
    pub config: AppConfig,
    /// Keeps the temporary data directory alive for the app's lifetime
    _data_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a test application with a working completion provider.
    pub async fn new() -> Self {
        Self::build(StubProvider::arc(), DEFAULT_SECRET, DEFAULT_MANIFEST).await
    }

    /// Create a test application whose model calls always fail.
    pub async fn with_failing_provider() -> Self {
        Self::build(Arc::new(FailingProvider), DEFAULT_SECRET, DEFAULT_MANIFEST).await
    }

    /// Create a test application with a specific bearer secret.
    pub async fn with_api_secret(secret: &str) -> Self {
        Self::build(StubProvider::arc(), secret, DEFAULT_MANIFEST).await
    }

    /// Create a test application loading the given extension manifest.
    pub async fn with_manifest(manifest: &str) -> Self {
        Self::build(StubProvider::arc(), DEFAULT_SECRET, manifest).await
    }

    async fn build(
        provider: Arc<dyn CompletionProvider>,
        api_secret: &str,
        manifest: &str,
    ) -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp data dir");
        let manifest_path = data_dir.path().join(".docq-extensions.json");
        std::fs::write(&manifest_path, manifest).expect("Failed to write extension manifest");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                api_secret: api_secret.to_string(),
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig::default(),
            storage: StorageConfig {
                data_dir: data_dir.path().to_string_lossy().into_owned(),
                max_upload_size_bytes: 1024 * 1024,
            },
            extensions: ExtensionsConfig {
                enabled: true,
                manifest_path: manifest_path.to_string_lossy().into_owned(),
            },
            index: IndexConfig::default(),
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        };

        let db_pool = DatabasePool::connect(&config.storage.system_db_path(), &config.database)
            .await
            .expect("Failed to open system database");
        docq_database::migration::run_migrations(db_pool.pool())
            .await
            .expect("Failed to run migrations");

        let index = docq_index::open_index(&config.index, &config.storage.data_dir())
            .await
            .expect("Failed to open index");

        let collections = Arc::new(ModelCollections::from_lookup(|_| None));

        let mut catalog = ExtensionCatalog::new();
        extension_audit_trail::register(&mut catalog);
        extension_usage_metrics::register(&mut catalog);
        let init = ExtensionInit {
            data_dir: config.storage.data_dir(),
            sqlite_system_path: config.storage.system_db_path(),
        };
        let (manager, _report) = ExtensionManager::load(
            &config.extensions,
            &catalog,
            &init,
            Arc::new(LoggingObserver),
        )
        .await;
        let registry = manager.registry().clone();
        let dispatcher = manager.dispatcher().clone();

        let thread_repo = Arc::new(ThreadRepository::new(db_pool.pool().clone()));
        let message_repo = Arc::new(MessageRepository::new(db_pool.pool().clone()));
        let space_repo = Arc::new(SpaceRepository::new(db_pool.pool().clone()));
        let settings_repo = Arc::new(SettingsRepository::new(db_pool.pool().clone()));

        let settings_service = Arc::new(SettingsService::new(
            settings_repo,
            collections,
            dispatcher.clone(),
            &config.chat,
        ));
        let providers: Arc<dyn ProviderResolver> = Arc::new(StaticResolver { provider });
        let chat_service = Arc::new(ChatService::new(
            thread_repo,
            message_repo,
            providers,
            index.clone(),
            dispatcher.clone(),
            &config.chat,
            &config.index,
        ));
        let space_service = Arc::new(SpaceService::new(space_repo, dispatcher.clone()));
        let document_service = Arc::new(DocumentService::new(
            config.storage.clone(),
            index,
            dispatcher,
        ));

        let state = docq_api::AppState {
            config: Arc::new(config.clone()),
            chat_service,
            space_service,
            document_service,
            settings_service,
            registry,
        };
        let router = docq_api::build_router(state);

        Self {
            router,
            db_pool: db_pool.into_pool(),
            config,
            _data_dir: data_dir,
        }
    }

    /// The bearer token this app was configured with.
    pub fn token(&self) -> &str {
        &self.config.server.api_secret
    }

    /// Events the audit trail extension has recorded, in insertion order.
    pub async fn audit_events(&self) -> Vec<String> {
        sqlx::query_scalar("SELECT event FROM ext_audit_trail ORDER BY id")
            .fetch_all(&self.db_pool)
            .await
            .unwrap_or_default()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.send(method, path, body, token, None).await
    }

    /// Request carrying explicit identity headers.
    pub async fn request_as(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        user_id: i64,
        org_id: i64,
    ) -> TestResponse {
        self.send(method, path, body, token, Some((user_id, org_id)))
            .await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        identity: Option<(i64, i64)>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        if let Some((user_id, org_id)) = identity {
            req = req
                .header("x-docq-user-id", user_id.to_string())
                .header("x-docq-org-id", org_id.to_string());
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.dispatch(req).await
    }

    /// Upload a document into a space through the multipart endpoint.
    pub async fn upload(
        &self,
        space_id: i64,
        file_name: &str,
        data: &[u8],
        token: &str,
    ) -> TestResponse {
        self.multipart(
            &format!("/api/spaces/{}/files", space_id),
            "file",
            file_name,
            data,
            token,
        )
        .await
    }

    /// POST a one-field multipart form to `path`.
    pub async fn multipart(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        data: &[u8],
        token: &str,
    ) -> TestResponse {
        let boundary = "docq-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::from(body))
            .expect("Failed to build multipart request");

        self.dispatch(req).await
    }

    async fn dispatch(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Provider that answers every prompt with [`STUB_ANSWER`].
#[derive(Debug)]
struct StubProvider;

impl StubProvider {
    fn arc() -> Arc<dyn CompletionProvider> {
        Arc::new(Self)
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, _request: &CompletionRequest) -> AppResult<Completion> {
        Ok(Completion {
            text: STUB_ANSWER.to_string(),
            model: "stub-model".to_string(),
        })
    }

    fn provider_name(&self) -> &str {
        "Stub"
    }
}

/// Provider whose completions always fail.
#[derive(Debug)]
struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _request: &CompletionRequest) -> AppResult<Completion> {
        Err(docq_core::AppError::provider("model service unavailable"))
    }

    fn provider_name(&self) -> &str {
        "Failing"
    }
}

/// Resolver that hands out one fixed provider for every organisation.
struct StaticResolver {
    provider: Arc<dyn CompletionProvider>,
}

#[async_trait]
impl ProviderResolver for StaticResolver {
    async fn provider_for(&self, _org_id: OrgId) -> AppResult<Arc<dyn CompletionProvider>> {
        Ok(self.provider.clone())
    }
}
