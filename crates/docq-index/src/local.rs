//! Local SQLite-backed document index.
//!
//! Passages live in their own database file under the data dir's
//! `index/` subdirectory, keyed by space. Retrieval scores passages by
//! case-insensitive term overlap with the query, normalized by passage
//! length so short focused passages beat long rambling ones.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use docq_core::config::IndexConfig;
use docq_core::error::{AppError, ErrorKind};
use docq_core::traits::{DocumentIndex, IndexableDocument, ScoredPassage};
use docq_core::types::SpaceKey;
use docq_core::AppResult;

use crate::chunker::chunk_text;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS passages (\
    space_key     TEXT    NOT NULL,\
    document_name TEXT    NOT NULL,\
    passage_index INTEGER NOT NULL,\
    content       TEXT    NOT NULL,\
    PRIMARY KEY (space_key, document_name, passage_index)\
)";

/// The bundled index backend.
#[derive(Debug, Clone)]
pub struct LocalIndex {
    pool: SqlitePool,
    max_passage_chars: usize,
}

impl LocalIndex {
    /// Open (creating if missing) the index database under `dir`.
    pub async fn open(dir: &Path, config: &IndexConfig) -> AppResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| {
            AppError::with_source(
                ErrorKind::Index,
                format!("Failed to create index directory {}", dir.display()),
                e,
            )
        })?;

        let path = dir.join("index.db");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Index,
                    format!("Failed to open index database {}", path.display()),
                    e,
                )
            })?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Index, "Failed to prepare index schema", e)
            })?;

        info!(path = %path.display(), "Local index ready");

        Ok(Self {
            pool,
            max_passage_chars: config.max_passage_chars as usize,
        })
    }
}

#[async_trait]
impl DocumentIndex for LocalIndex {
    async fn index_documents(
        &self,
        space: &SpaceKey,
        documents: Vec<IndexableDocument>,
    ) -> AppResult<usize> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Index, "Failed to start index transaction", e)
        })?;

        sqlx::query("DELETE FROM passages WHERE space_key = ?")
            .bind(space.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Index, "Failed to clear space passages", e)
            })?;

        let mut stored = 0usize;
        for document in &documents {
            for (idx, passage) in chunk_text(&document.text, self.max_passage_chars)
                .into_iter()
                .enumerate()
            {
                sqlx::query(
                    "INSERT INTO passages (space_key, document_name, passage_index, content) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(space.value())
                .bind(&document.name)
                .bind(idx as i64)
                .bind(&passage)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Index, "Failed to store passage", e)
                })?;
                stored += 1;
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Index, "Failed to commit index transaction", e)
        })?;

        debug!(space = %space, documents = documents.len(), passages = stored, "Space reindexed");
        Ok(stored)
    }

    async fn retrieve(
        &self,
        space: &SpaceKey,
        query: &str,
        top_k: u32,
    ) -> AppResult<Vec<ScoredPassage>> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }
        let unique_terms: HashSet<&str> = query_terms.iter().map(String::as_str).collect();

        let rows = sqlx::query(
            "SELECT document_name, content FROM passages WHERE space_key = ? \
             ORDER BY document_name, passage_index",
        )
        .bind(space.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Index, "Failed to read space passages", e)
        })?;

        let mut scored: Vec<ScoredPassage> = rows
            .iter()
            .filter_map(|row| {
                let document: String = row.get("document_name");
                let passage: String = row.get("content");
                let score = score_passage(&unique_terms, &passage);
                (score > 0.0).then_some(ScoredPassage {
                    document,
                    passage,
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k as usize);
        Ok(scored)
    }

    async fn remove_space(&self, space: &SpaceKey) -> AppResult<()> {
        sqlx::query("DELETE FROM passages WHERE space_key = ?")
            .bind(space.value())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Index, "Failed to remove space passages", e)
            })?;
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "local"
    }
}

/// Lowercased alphanumeric terms of a text.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Term-overlap score: hit density in the passage weighted by the share
/// of query terms covered. Zero when no term matches.
fn score_passage(query_terms: &HashSet<&str>, passage: &str) -> f64 {
    let tokens = tokenize(passage);
    if tokens.is_empty() {
        return 0.0;
    }

    let mut hits = 0usize;
    let mut matched = 0usize;
    for term in query_terms {
        let count = tokens.iter().filter(|t| t == term).count();
        if count > 0 {
            matched += 1;
            hits += count;
        }
    }

    if matched == 0 {
        return 0.0;
    }

    let density = hits as f64 / tokens.len() as f64;
    let coverage = matched as f64 / query_terms.len() as f64;
    density * coverage
}
