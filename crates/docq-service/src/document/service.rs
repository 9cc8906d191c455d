//! Document service over the per-space upload directories.
//!
//! Documents live as plain files under `{data_dir}/upload/{TYPE}/{id}/`.
//! Every mutation triggers a reindex of the affected space; a failed
//! reindex is logged and never fails the upload or delete that caused it.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use docq_core::config::StorageConfig;
use docq_core::error::{AppError, ErrorKind};
use docq_core::traits::{DocumentIndex, IndexableDocument};
use docq_core::types::SpaceKey;
use docq_entity::document::DocumentListItem;
use docq_extension::{EventContext, EventDispatcher, LifecycleEvent};

use crate::context::RequestContext;

/// Stores, lists and indexes the documents of a space.
#[derive(Clone)]
pub struct DocumentService {
    /// Storage layout and upload limits.
    config: StorageConfig,
    /// Index rebuilt after every mutation.
    index: Arc<dyn DocumentIndex>,
    /// Dispatcher for firing lifecycle events.
    dispatcher: Arc<EventDispatcher>,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("data_dir", &self.config.data_dir)
            .finish()
    }
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        config: StorageConfig,
        index: Arc<dyn DocumentIndex>,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            config,
            index,
            dispatcher,
        }
    }

    /// Saves an uploaded document into a space and reindexes it.
    ///
    /// Uploading a file name that already exists replaces the stored file.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        space: &SpaceKey,
        file_name: &str,
        data: Bytes,
    ) -> Result<DocumentListItem, AppError> {
        if data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        let file_name = sanitize_file_name(file_name)?;

        let dir = self.config.upload_dir(space);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to create upload directory", e)
        })?;
        tokio::fs::write(dir.join(file_name), &data)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write uploaded file", e)
            })?;

        info!(
            user_id = %ctx.user_id,
            space = %space,
            name = %file_name,
            size = data.len(),
            "Document uploaded"
        );

        self.dispatcher
            .fire_and_forget(
                &EventContext::new(LifecycleEvent::DocumentUploaded)
                    .with_actor(ctx.user_id)
                    .with_string("space", &space.value())
                    .with_string("name", file_name)
                    .with_int("size_bytes", data.len() as i64),
            )
            .await;

        self.reindex_quietly(ctx, space).await;

        Ok(DocumentListItem {
            name: file_name.to_string(),
            size_bytes: data.len() as u64,
            modified_at: ctx.request_time,
        })
    }

    /// Lists a space's documents sorted by name.
    ///
    /// A space that has never received an upload lists as empty.
    pub async fn list(&self, space: &SpaceKey) -> Result<Vec<DocumentListItem>, AppError> {
        let dir = self.config.upload_dir(space);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    "Failed to read upload directory",
                    e,
                ));
            }
        };

        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read upload directory", e)
        })? {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            items.push(DocumentListItem {
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: metadata.len(),
                modified_at: metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now()),
            });
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    /// Deletes a document from a space and reindexes it.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        space: &SpaceKey,
        file_name: &str,
    ) -> Result<(), AppError> {
        let file_name = sanitize_file_name(file_name)?;
        let path = self.config.upload_dir(space).join(file_name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::not_found(format!(
                    "No document named '{file_name}'"
                )));
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    "Failed to delete document",
                    e,
                ));
            }
        }

        info!(
            user_id = %ctx.user_id,
            space = %space,
            name = %file_name,
            "Document deleted"
        );

        self.dispatcher
            .fire_and_forget(
                &EventContext::new(LifecycleEvent::DocumentDeleted)
                    .with_actor(ctx.user_id)
                    .with_string("space", &space.value())
                    .with_string("name", file_name),
            )
            .await;

        self.reindex_quietly(ctx, space).await;
        Ok(())
    }

    /// Rebuilds a space's index from its stored documents.
    ///
    /// Documents that are not valid UTF-8 text are skipped. Returns the
    /// number of passages stored.
    pub async fn reindex(
        &self,
        ctx: &RequestContext,
        space: &SpaceKey,
    ) -> Result<usize, AppError> {
        let dir = self.config.upload_dir(space);
        let mut documents = Vec::new();
        for item in self.list(space).await? {
            match read_text(&dir, &item.name).await {
                Ok(Some(text)) => documents.push(IndexableDocument {
                    name: item.name,
                    text,
                }),
                Ok(None) => {
                    debug!(space = %space, name = %item.name, "Skipping non-text document");
                }
                Err(e) => {
                    warn!(
                        space = %space,
                        name = %item.name,
                        error = %e,
                        "Skipping unreadable document"
                    );
                }
            }
        }

        let document_count = documents.len();
        let passages = self.index.index_documents(space, documents).await?;

        info!(
            space = %space,
            documents = document_count,
            passages,
            backend = self.index.backend_name(),
            "Index rebuilt"
        );

        self.dispatcher
            .fire_and_forget(
                &EventContext::new(LifecycleEvent::IndexRebuilt)
                    .with_actor(ctx.user_id)
                    .with_string("space", &space.value())
                    .with_int("documents", document_count as i64)
                    .with_int("passages", passages as i64),
            )
            .await;

        Ok(passages)
    }

    /// Reindex that logs failures instead of surfacing them.
    ///
    /// Keeps upload and delete usable when the index backend is down; the
    /// stored files remain the source of truth for the next rebuild.
    async fn reindex_quietly(&self, ctx: &RequestContext, space: &SpaceKey) {
        if let Err(e) = self.reindex(ctx, space).await {
            warn!(space = %space, error = %e, "Reindex after document change failed");
        }
    }
}

/// Reads one stored document, `None` when it is not UTF-8 text.
async fn read_text(dir: &Path, name: &str) -> Result<Option<String>, std::io::Error> {
    let bytes = tokio::fs::read(dir.join(name)).await?;
    Ok(String::from_utf8(bytes).ok())
}

fn sanitize_file_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("File name cannot be empty"));
    }
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(AppError::validation(
            "File name must not contain path separators",
        ));
    }
    Ok(name)
}
