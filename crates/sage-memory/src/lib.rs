//! Corpus ingestion and vector storage for sage.
//!
//! ```text
//! corpora ──► document::normalize ──► document::WordSplitter ──► chunks
//!                                                      │
//!                                   document::IngestionPipeline
//!                                                      │
//!                                      (batch embed via sage-llm)
//!                                                      ▼
//!                                             store::ChunkStore
//!                                                      │
//! query vector ──► retriever::Retriever ◄──────────────┘
//! ```

pub mod document;
pub mod error;
pub mod retriever;
pub mod store;

pub use error::MemoryError;
pub use retriever::{Retriever, ScoredChunk, cosine_similarity};
pub use store::{ChunkStore, NewChunk, SourceKind, SourceRef, StoredChunk};
