//! Test-only mock LLM provider.

use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    pub fail_chat: bool,
    pub fail_embed: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            embedding: vec![0.0; 384],
            fail_chat: false,
            fail_embed: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing_embed() -> Self {
        Self {
            fail_embed: true,
            ..Self::default()
        }
    }
}

impl LlmProvider for MockProvider {
    async fn chat(&self, _messages: &[Message]) -> Result<String, LlmError> {
        if self.fail_chat {
            return Err(LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
        if self.fail_embed {
            return Err(LlmError::Other("mock embed error".into()));
        }
        Ok(self.embedding.clone())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if self.fail_embed {
            return Err(LlmError::Other("mock embed error".into()));
        }
        Ok(texts.iter().map(|_| self.embedding.clone()).collect())
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Role;

    #[tokio::test]
    async fn scripted_responses_consumed_in_order() {
        let provider = MockProvider::with_responses(vec!["first".into(), "second".into()]);
        let msgs = vec![Message::new(Role::User, "q")];
        assert_eq!(provider.chat(&msgs).await.unwrap(), "first");
        assert_eq!(provider.chat(&msgs).await.unwrap(), "second");
        assert_eq!(provider.chat(&msgs).await.unwrap(), "mock response");
    }

    #[tokio::test]
    async fn failing_chat_errors() {
        let provider = MockProvider::failing();
        let msgs = vec![Message::new(Role::User, "q")];
        assert!(provider.chat(&msgs).await.is_err());
    }

    #[tokio::test]
    async fn embed_returns_configured_vector() {
        let provider = MockProvider::default().with_embedding(vec![1.0, 2.0]);
        assert_eq!(provider.embed("text").await.unwrap(), vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn embed_batch_one_vector_per_input() {
        let provider = MockProvider::default().with_embedding(vec![0.5]);
        let out = provider
            .embed_batch(&["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| v == &vec![0.5]));
    }

    #[tokio::test]
    async fn failing_embed_errors() {
        let provider = MockProvider::failing_embed();
        assert!(provider.embed("x").await.is_err());
        assert!(provider.embed_batch(&["x".into()]).await.is_err());
    }
}
