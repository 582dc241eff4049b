pub mod error;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod splitter;

pub use error::DocumentError;
pub use loader::{DiscoursePost, MarkdownFile};
pub use normalize::normalize;
pub use pipeline::{IngestReport, IngestionPipeline};
pub use splitter::{SplitterConfig, WordSplitter};

/// Documents shorter than this (after normalization) are dropped before
/// chunking.
pub const MIN_DOCUMENT_LEN: usize = 30;
