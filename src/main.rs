//! Docq server: self-hosted document Q&A for businesses.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use docq_core::config::AppConfig;
use docq_core::error::{AppError, ErrorKind};
use docq_database::DatabasePool;
use docq_database::repositories::{
    MessageRepository, SettingsRepository, SpaceRepository, ThreadRepository,
};
use docq_extension::{
    EventContext, ExtensionCatalog, ExtensionInit, ExtensionManager, LifecycleEvent,
    LoggingObserver,
};
use docq_llm::ModelCollections;
use docq_service::{
    ChatService, CollectionProviderResolver, DocumentService, ProviderResolver, SettingsService,
    SpaceService,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration for the environment named by `DOCQ_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DOCQ_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Docq v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Create data directories ──────────────────────────
    create_data_directories(&config).await?;

    // ── Step 2: Database connection + migrations ─────────────────
    tracing::info!("Connecting to system database...");
    let db_pool =
        DatabasePool::connect(&config.storage.system_db_path(), &config.database).await?;

    tracing::info!("Running database migrations...");
    docq_database::migration::run_migrations(db_pool.pool()).await?;
    tracing::info!("Database migrations complete");

    // ── Step 3: Open the document index ──────────────────────────
    tracing::info!("Opening document index (backend: {})...", config.index.backend);
    let index = docq_index::open_index(&config.index, &config.storage.data_dir()).await?;

    // ── Step 4: Model settings collections ───────────────────────
    let collections = Arc::new(ModelCollections::from_env());
    tracing::info!(
        collections = ?collections.keys(),
        "Model settings collections ready"
    );

    // ── Step 5: Initialize repositories ──────────────────────────
    let thread_repo = Arc::new(ThreadRepository::new(db_pool.pool().clone()));
    let message_repo = Arc::new(MessageRepository::new(db_pool.pool().clone()));
    let space_repo = Arc::new(SpaceRepository::new(db_pool.pool().clone()));
    let settings_repo = Arc::new(SettingsRepository::new(db_pool.pool().clone()));

    // ── Step 6: Load extensions ──────────────────────────────────
    tracing::info!("Loading extensions...");
    let mut catalog = ExtensionCatalog::new();
    extension_audit_trail::register(&mut catalog);
    extension_usage_metrics::register(&mut catalog);

    let init = ExtensionInit {
        data_dir: config.storage.data_dir(),
        sqlite_system_path: config.storage.system_db_path(),
    };
    let (manager, report) = ExtensionManager::load(
        &config.extensions,
        &catalog,
        &init,
        Arc::new(LoggingObserver),
    )
    .await;
    if !report.skipped.is_empty() {
        tracing::warn!(
            skipped = report.skipped.len(),
            "Some extension entries were skipped"
        );
    }
    let registry = manager.registry().clone();
    let dispatcher = manager.dispatcher().clone();

    // ── Step 7: Initialize services ──────────────────────────────
    let settings_service = Arc::new(SettingsService::new(
        settings_repo,
        collections.clone(),
        dispatcher.clone(),
        &config.chat,
    ));
    let providers: Arc<dyn ProviderResolver> = Arc::new(CollectionProviderResolver::new(
        settings_service.clone(),
        collections.clone(),
    ));
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
        index.clone(),
        dispatcher.clone(),
    ));
    tracing::info!("Services initialized");

    // ── Step 8: Announce readiness to extensions ─────────────────
    dispatcher
        .fire_and_forget(&EventContext::new(LifecycleEvent::AppReadied))
        .await;

    // ── Step 9: Build and start HTTP server ──────────────────────
    tracing::info!(
        "Starting HTTP server on {}:{}...",
        config.server.host,
        config.server.port
    );

    let app_state = docq_api::AppState {
        config: Arc::new(config.clone()),
        chat_service,
        space_service,
        document_service,
        settings_service,
        registry,
    };
    let app = docq_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Docq server listening on {}", addr);

    // ── Step 10: Graceful shutdown ───────────────────────────────
    let stopping_dispatcher = dispatcher.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        stopping_dispatcher
            .fire_and_forget(&EventContext::new(LifecycleEvent::AppStopping))
            .await;
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Docq server shut down gracefully");
    Ok(())
}

/// Create required data directories
async fn create_data_directories(config: &AppConfig) -> Result<(), AppError> {
    let dirs = [
        config.storage.sqlite_dir(),
        config.storage.index_dir(),
        config.storage.data_dir().join("upload"),
    ];

    for dir in &dirs {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create dir '{}'", dir.display()),
                e,
            )
        })?;
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
