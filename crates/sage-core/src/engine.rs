use std::sync::Arc;

use sage_llm::LlmProvider;
use sage_llm::provider::{Message, Role};
use sage_memory::{Retriever, SourceKind};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("LLM error: {0}")]
    Llm(#[from] sage_llm::LlmError),

    #[error("memory error: {0}")]
    Memory(#[from] sage_memory::MemoryError),
}

/// Response to one question. `links` is reserved for source attribution
/// and currently always empty.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Answer {
    pub answer: String,
    pub links: Vec<String>,
}

/// Query-time orchestration: embed the question once, retrieve the best
/// chunks from each collection, and ground the generated answer in them.
pub struct AnswerEngine<P> {
    provider: Arc<P>,
    retriever: Retriever,
    top_k: usize,
}

impl<P: LlmProvider> AnswerEngine<P> {
    #[must_use]
    pub fn new(provider: Arc<P>, retriever: Retriever, top_k: usize) -> Self {
        Self {
            provider,
            retriever,
            top_k,
        }
    }

    /// Answer `question` grounded in the stored corpora.
    ///
    /// Contexts are fused in fixed order: discourse chunks first, then
    /// markdown chunks, each collection independently ranked.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding, retrieval, or generation fails.
    pub async fn answer(&self, question: &str) -> Result<Answer, EngineError> {
        let query = self.provider.embed(question).await?;

        let discourse = self
            .retriever
            .top_k(&query, SourceKind::Discourse, self.top_k)
            .await?;
        let markdown = self
            .retriever
            .top_k(&query, SourceKind::Markdown, self.top_k)
            .await?;
        tracing::debug!(
            discourse = discourse.len(),
            markdown = markdown.len(),
            "retrieved context chunks"
        );

        let context: Vec<String> = discourse
            .into_iter()
            .chain(markdown)
            .map(|chunk| chunk.content)
            .collect();

        let answer = self.synthesize(question, &context).await?;
        Ok(Answer {
            answer,
            links: Vec::new(),
        })
    }

    /// Compose the context block and delegate generation to the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the generation request fails.
    pub async fn synthesize(
        &self,
        question: &str,
        context_chunks: &[String],
    ) -> Result<String, EngineError> {
        let prompt = build_prompt(question, context_chunks);
        let reply = self.provider.chat(&[Message::new(Role::User, prompt)]).await?;
        Ok(reply.trim().to_owned())
    }
}

fn build_prompt(question: &str, context_chunks: &[String]) -> String {
    let context = context_chunks.join("\n");
    format!(
        "[INST] Answer the question based on the context.\n\n\
         Context:\n{context}\n\n\
         Question:\n{question}\n\n\
         Answer: [/INST]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_llm::mock::MockProvider;
    use sage_memory::{ChunkStore, NewChunk, SourceRef};

    async fn seeded_store() -> ChunkStore {
        let store = ChunkStore::new(":memory:").await.unwrap();
        store
            .insert(&NewChunk {
                source: SourceRef::Discourse {
                    post_id: "1".into(),
                    url: "http://forum/1".into(),
                },
                content: "forum chunk".into(),
                embedding: vec![1.0, 0.0],
            })
            .await
            .unwrap();
        store
            .insert(&NewChunk {
                source: SourceRef::Markdown {
                    file_name: "doc.md".into(),
                    chunk_index: 0,
                },
                content: "markdown chunk".into(),
                embedding: vec![1.0, 0.0],
            })
            .await
            .unwrap();
        store
    }

    fn engine_with(provider: MockProvider, store: ChunkStore) -> AnswerEngine<MockProvider> {
        AnswerEngine::new(Arc::new(provider), Retriever::new(store), 2)
    }

    #[test]
    fn prompt_embeds_context_and_question() {
        let prompt = build_prompt("why?", &["first".into(), "second".into()]);
        assert!(prompt.starts_with("[INST]"));
        assert!(prompt.ends_with("[/INST]"));
        assert!(prompt.contains("Context:\nfirst\nsecond\n"));
        assert!(prompt.contains("Question:\nwhy?"));
    }

    #[test]
    fn prompt_with_empty_context_has_empty_block() {
        let prompt = build_prompt("q", &[]);
        assert!(prompt.contains("Context:\n\n"));
    }

    #[tokio::test]
    async fn answer_returns_trimmed_reply_and_empty_links() {
        let store = seeded_store().await;
        let provider = MockProvider::with_responses(vec!["  the answer \n".into()])
            .with_embedding(vec![1.0, 0.0]);
        let engine = engine_with(provider, store);

        let answer = engine.answer("question?").await.unwrap();
        assert_eq!(answer.answer, "the answer");
        assert!(answer.links.is_empty());
    }

    #[tokio::test]
    async fn answer_on_empty_store_still_succeeds() {
        let store = ChunkStore::new(":memory:").await.unwrap();
        let provider = MockProvider::default().with_embedding(vec![1.0, 0.0]);
        let engine = engine_with(provider, store);

        let answer = engine.answer("anything?").await.unwrap();
        assert_eq!(answer.answer, "mock response");
    }

    #[tokio::test]
    async fn synthesize_with_empty_context_does_not_fail() {
        let store = ChunkStore::new(":memory:").await.unwrap();
        let engine = engine_with(MockProvider::default(), store);

        let reply = engine.synthesize("q", &[]).await.unwrap();
        assert_eq!(reply, "mock response");
    }

    #[tokio::test]
    async fn embed_failure_propagates() {
        let store = seeded_store().await;
        let engine = engine_with(MockProvider::failing_embed(), store);
        assert!(matches!(
            engine.answer("q").await,
            Err(EngineError::Llm(_))
        ));
    }

    #[tokio::test]
    async fn chat_failure_propagates() {
        let store = seeded_store().await;
        let provider = MockProvider::failing().with_embedding(vec![1.0, 0.0]);
        let engine = engine_with(provider, store);
        assert!(matches!(
            engine.answer("q").await,
            Err(EngineError::Llm(_))
        ));
    }

    #[tokio::test]
    async fn both_collections_contribute_discourse_first() {
        let store = seeded_store().await;
        // Scripted response is irrelevant; we inspect retrieval through the
        // answer flow by seeding identical embeddings (both score 1.0).
        let provider = MockProvider::default().with_embedding(vec![1.0, 0.0]);
        let retriever = Retriever::new(store);

        let query = vec![1.0, 0.0];
        let discourse = retriever
            .top_k(&query, SourceKind::Discourse, 2)
            .await
            .unwrap();
        let markdown = retriever
            .top_k(&query, SourceKind::Markdown, 2)
            .await
            .unwrap();
        assert_eq!(discourse.len(), 1);
        assert_eq!(markdown.len(), 1);
        assert!((discourse[0].score - 1.0).abs() < 1e-6);
        assert!((markdown[0].score - 1.0).abs() < 1e-6);

        let engine = AnswerEngine::new(Arc::new(provider), retriever, 2);
        let answer = engine.answer("q").await.unwrap();
        assert_eq!(answer.answer, "mock response");
    }
}
