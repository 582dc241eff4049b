use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::MemoryError;

/// Storage collection selector. The two corpora are disjoint partitions
/// with no cross-referencing at storage time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Discourse,
    Markdown,
}

impl SourceKind {
    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Self::Discourse => "discourse_chunks",
            Self::Markdown => "markdown_chunks",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// Per-kind chunk provenance.
#[derive(Debug, Clone)]
pub enum SourceRef {
    Discourse { post_id: String, url: String },
    Markdown { file_name: String, chunk_index: usize },
}

impl SourceRef {
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Discourse { .. } => SourceKind::Discourse,
            Self::Markdown { .. } => SourceKind::Markdown,
        }
    }
}

/// A chunk ready for insertion; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub source: SourceRef,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// A chunk as read back by a full-collection scan, insertion order preserved.
#[derive(Debug, Clone)]
pub struct StoredChunk {
    pub id: i64,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// Encode an embedding as a JSON float array for BLOB storage.
///
/// serde_json emits shortest round-trip float representations, so
/// `decode_embedding(encode_embedding(v)) == v` exactly.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_embedding(embedding: &[f32]) -> Result<Vec<u8>, MemoryError> {
    Ok(serde_json::to_vec(embedding)?)
}

/// Decode an embedding BLOB written by [`encode_embedding`].
///
/// # Errors
///
/// Returns an error if the blob is not a JSON float array.
pub fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>, MemoryError> {
    Ok(serde_json::from_slice(blob)?)
}

#[derive(Debug, Clone)]
pub struct ChunkStore {
    pool: SqlitePool,
}

impl ChunkStore {
    /// Open (or create) the `SQLite` database and run migrations.
    ///
    /// Migrations are idempotent: opening an already-initialized database is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub async fn new(path: &str) -> Result<Self, MemoryError> {
        let url = if path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{path}?mode=rwc")
        };

        let opts = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Expose the underlying pool for direct queries.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Append a chunk to its collection and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert or embedding encoding fails.
    pub async fn insert(&self, chunk: &NewChunk) -> Result<i64, MemoryError> {
        let blob = encode_embedding(&chunk.embedding)?;
        let row: (i64,) = match &chunk.source {
            SourceRef::Discourse { post_id, url } => {
                sqlx::query_as(
                    "INSERT INTO discourse_chunks (post_id, url, content, embedding) \
                     VALUES (?, ?, ?, ?) RETURNING id",
                )
                .bind(post_id)
                .bind(url)
                .bind(&chunk.content)
                .bind(&blob)
                .fetch_one(&self.pool)
                .await?
            }
            SourceRef::Markdown {
                file_name,
                chunk_index,
            } => {
                sqlx::query_as(
                    "INSERT INTO markdown_chunks (file_name, chunk_index, content, embedding) \
                     VALUES (?, ?, ?, ?) RETURNING id",
                )
                .bind(file_name)
                .bind(i64::try_from(*chunk_index)?)
                .bind(&chunk.content)
                .bind(&blob)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(row.0)
    }

    /// Read every record in a collection, ordered by id (insertion order).
    ///
    /// The collection is expected to fit in memory; there is no pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or an embedding blob is corrupt.
    pub async fn scan(&self, kind: SourceKind) -> Result<Vec<StoredChunk>, MemoryError> {
        let sql = match kind {
            SourceKind::Discourse => {
                "SELECT id, content, embedding FROM discourse_chunks ORDER BY id ASC"
            }
            SourceKind::Markdown => {
                "SELECT id, content, embedding FROM markdown_chunks ORDER BY id ASC"
            }
        };
        let rows: Vec<(i64, String, Vec<u8>)> = sqlx::query_as(sql).fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|(id, content, blob)| {
                Ok(StoredChunk {
                    id,
                    content,
                    embedding: decode_embedding(&blob)?,
                })
            })
            .collect()
    }

    /// Number of records in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count(&self, kind: SourceKind) -> Result<usize, MemoryError> {
        let sql = match kind {
            SourceKind::Discourse => "SELECT COUNT(*) FROM discourse_chunks",
            SourceKind::Markdown => "SELECT COUNT(*) FROM markdown_chunks",
        };
        let row: (i64,) = sqlx::query_as(sql).fetch_one(&self.pool).await?;
        Ok(usize::try_from(row.0)?)
    }
}
