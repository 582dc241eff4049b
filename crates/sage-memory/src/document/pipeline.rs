use std::path::Path;
use std::sync::Arc;

use sage_llm::{LlmError, LlmProvider};

use super::error::DocumentError;
use super::splitter::WordSplitter;
use super::{MIN_DOCUMENT_LEN, loader, normalize};
use crate::store::{ChunkStore, NewChunk, SourceRef};

/// Chunk counts written per corpus during one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub discourse_chunks: usize,
    pub markdown_chunks: usize,
}

/// Batch ingestion: normalize -> length-filter -> chunk -> embed -> store.
///
/// Each corpus is processed independently; a missing input skips that
/// corpus only, and a failure in one corpus does not abort the other.
pub struct IngestionPipeline<P> {
    splitter: WordSplitter,
    store: ChunkStore,
    provider: Arc<P>,
}

impl<P: LlmProvider> IngestionPipeline<P> {
    #[must_use]
    pub fn new(splitter: WordSplitter, store: ChunkStore, provider: Arc<P>) -> Self {
        Self {
            splitter,
            store,
            provider,
        }
    }

    /// Ingest both corpora, reporting per-corpus chunk counts. Corpus-level
    /// failures are logged and surface as a zero count.
    pub async fn run(&self, discourse_path: &Path, markdown_dir: &Path) -> IngestReport {
        let discourse_chunks = match self.ingest_discourse(discourse_path).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("discourse ingestion failed: {e}");
                0
            }
        };
        let markdown_chunks = match self.ingest_markdown(markdown_dir).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("markdown ingestion failed: {e}");
                0
            }
        };
        IngestReport {
            discourse_chunks,
            markdown_chunks,
        }
    }

    /// Ingest the forum-post export. A missing file is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, embedding, or storage fails.
    pub async fn ingest_discourse(&self, path: &Path) -> Result<usize, DocumentError> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "discourse export not found, skipping corpus");
            return Ok(0);
        }

        let posts = loader::load_posts(path).await?;
        let mut chunks = Vec::new();
        let mut sources = Vec::new();
        for post in &posts {
            let content = normalize(&post.content);
            if content.chars().count() < MIN_DOCUMENT_LEN {
                continue;
            }
            for chunk in self.splitter.split(&content) {
                sources.push(SourceRef::Discourse {
                    post_id: post.post_id.clone(),
                    url: post.url.clone(),
                });
                chunks.push(chunk);
            }
        }

        let count = self.embed_and_store(chunks, sources).await?;
        tracing::info!(chunks = count, "processed discourse corpus");
        Ok(count)
    }

    /// Ingest the markdown directory. A missing directory is logged and
    /// skipped; so is a directory without any `*.md` files.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, embedding, or storage fails.
    pub async fn ingest_markdown(&self, dir: &Path) -> Result<usize, DocumentError> {
        if !dir.is_dir() {
            tracing::warn!(path = %dir.display(), "markdown directory not found, skipping corpus");
            return Ok(0);
        }

        let files = loader::load_markdown_dir(dir).await?;
        if files.is_empty() {
            tracing::warn!(path = %dir.display(), "no markdown files found");
            return Ok(0);
        }

        let mut chunks = Vec::new();
        let mut sources = Vec::new();
        for file in &files {
            let content = normalize(&file.content);
            if content.chars().count() < MIN_DOCUMENT_LEN {
                continue;
            }
            for (chunk_index, chunk) in self.splitter.split(&content).into_iter().enumerate() {
                sources.push(SourceRef::Markdown {
                    file_name: file.file_name.clone(),
                    chunk_index,
                });
                chunks.push(chunk);
            }
        }

        let count = self.embed_and_store(chunks, sources).await?;
        tracing::info!(chunks = count, "processed markdown corpus");
        Ok(count)
    }

    async fn embed_and_store(
        &self,
        chunks: Vec<String>,
        sources: Vec<SourceRef>,
    ) -> Result<usize, DocumentError> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let embeddings = self.provider.embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            // A zip would silently drop records on a misbehaving backend.
            return Err(DocumentError::Embedding(LlmError::EmbeddingCountMismatch {
                expected: chunks.len(),
                got: embeddings.len(),
            }));
        }

        let count = chunks.len();
        for ((content, source), embedding) in chunks.into_iter().zip(sources).zip(embeddings) {
            self.store
                .insert(&NewChunk {
                    source,
                    content,
                    embedding,
                })
                .await?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SourceKind;
    use sage_llm::mock::MockProvider;
    use std::path::PathBuf;

    use super::super::splitter::SplitterConfig;

    async fn pipeline_with(provider: MockProvider) -> (IngestionPipeline<MockProvider>, ChunkStore) {
        let store = ChunkStore::new(":memory:").await.unwrap();
        let splitter = WordSplitter::new(SplitterConfig::default()).unwrap();
        let pipeline = IngestionPipeline::new(splitter, store.clone(), Arc::new(provider));
        (pipeline, store)
    }

    fn mock() -> MockProvider {
        MockProvider::default().with_embedding(vec![1.0, 0.0, 0.0])
    }

    #[tokio::test]
    async fn discourse_post_yields_one_chunk_with_metadata() {
        let (pipeline, store) = pipeline_with(mock()).await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("posts.json");
        let content = "A".repeat(40);
        std::fs::write(
            &file,
            format!(r#"[{{"post_id": "1", "url": "http://x", "content": "{content}"}}]"#),
        )
        .unwrap();

        let count = pipeline.ingest_discourse(&file).await.unwrap();
        assert_eq!(count, 1);

        let row: (String, String, String) =
            sqlx::query_as("SELECT post_id, url, content FROM discourse_chunks")
                .fetch_one(store.pool())
                .await
                .unwrap();
        assert_eq!(row.0, "1");
        assert_eq!(row.1, "http://x");
        assert_eq!(row.2, content);
    }

    #[tokio::test]
    async fn short_markdown_file_stores_nothing() {
        let (pipeline, store) = pipeline_with(mock()).await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tiny.md"), "too short").unwrap();

        let count = pipeline.ingest_markdown(dir.path()).await.unwrap();
        assert_eq!(count, 0);
        assert_eq!(store.count(SourceKind::Markdown).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn short_discourse_post_is_filtered() {
        let (pipeline, store) = pipeline_with(mock()).await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("posts.json");
        std::fs::write(
            &file,
            r#"[{"post_id": "1", "url": "http://x", "content": "short"}]"#,
        )
        .unwrap();

        assert_eq!(pipeline.ingest_discourse(&file).await.unwrap(), 0);
        assert_eq!(store.count(SourceKind::Discourse).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_inputs_skip_both_corpora() {
        let (pipeline, _store) = pipeline_with(mock()).await;
        let report = pipeline
            .run(
                &PathBuf::from("/nonexistent/posts.json"),
                &PathBuf::from("/nonexistent/md"),
            )
            .await;
        assert_eq!(report, IngestReport::default());
    }

    #[tokio::test]
    async fn markdown_chunk_indices_are_per_file() {
        let (pipeline, store) = pipeline_with(mock()).await;
        let splitter = WordSplitter::new(SplitterConfig {
            window_size: 5,
            overlap: 1,
        })
        .unwrap();
        let pipeline = IngestionPipeline {
            splitter,
            ..pipeline
        };

        let dir = tempfile::tempdir().unwrap();
        let many_words = (0..12).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        std::fs::write(dir.path().join("a.md"), &many_words).unwrap();
        std::fs::write(dir.path().join("b.md"), &many_words).unwrap();

        pipeline.ingest_markdown(dir.path()).await.unwrap();

        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT file_name, chunk_index FROM markdown_chunks ORDER BY file_name, chunk_index",
        )
        .fetch_all(store.pool())
        .await
        .unwrap();
        let a_indices: Vec<i64> = rows
            .iter()
            .filter(|(name, _)| name.as_str() == "a.md")
            .map(|(_, i)| *i)
            .collect();
        assert_eq!(a_indices, vec![0, 1, 2]);
        let b_indices: Vec<i64> = rows
            .iter()
            .filter(|(name, _)| name.as_str() == "b.md")
            .map(|(_, i)| *i)
            .collect();
        assert_eq!(b_indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let (pipeline, _store) = pipeline_with(MockProvider::failing_embed()).await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("posts.json");
        let content = "B".repeat(64);
        std::fs::write(
            &file,
            format!(r#"[{{"post_id": "2", "url": "http://y", "content": "{content}"}}]"#),
        )
        .unwrap();

        let result = pipeline.ingest_discourse(&file).await;
        assert!(matches!(result, Err(DocumentError::Embedding(_))));
    }

    #[tokio::test]
    async fn failing_corpus_does_not_abort_the_other() {
        let (pipeline, store) = pipeline_with(MockProvider::failing_embed()).await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("posts.json");
        let content = "C".repeat(64);
        std::fs::write(
            &file,
            format!(r#"[{{"post_id": "3", "url": "http://z", "content": "{content}"}}]"#),
        )
        .unwrap();

        // Discourse fails at embedding, markdown dir is absent: the run
        // still completes with zero counts on both sides.
        let report = pipeline.run(&file, &PathBuf::from("/nonexistent/md")).await;
        assert_eq!(report, IngestReport::default());
        assert_eq!(store.count(SourceKind::Discourse).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn post_content_is_normalized_before_storage() {
        let (pipeline, store) = pipeline_with(mock()).await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("posts.json");
        std::fs::write(
            &file,
            r#"[{"post_id": "4", "url": "http://w", "content": "many   spaces\tand tabs here to exceed the minimum length"}]"#,
        )
        .unwrap();

        pipeline.ingest_discourse(&file).await.unwrap();
        let chunks = store.scan(SourceKind::Discourse).await.unwrap();
        assert_eq!(
            chunks[0].content,
            "many spaces and tabs here to exceed the minimum length"
        );
    }

    #[tokio::test]
    async fn empty_markdown_dir_reports_zero() {
        let (pipeline, _store) = pipeline_with(mock()).await;
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(pipeline.ingest_markdown(dir.path()).await.unwrap(), 0);
    }
}
