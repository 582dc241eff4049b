#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("chunk window must exceed overlap: window_size={window_size}, overlap={overlap}")]
    InvalidChunking { window_size: usize, overlap: usize },

    #[error("embedding failed: {0}")]
    Embedding(#[from] sage_llm::LlmError),

    #[error("storage error: {0}")]
    Storage(#[from] crate::error::MemoryError),
}
