use crate::error::MemoryError;
use crate::store::{ChunkStore, SourceKind};

/// A retrieval candidate with its cosine score, higher is better.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub id: i64,
    pub content: String,
    pub score: f32,
}

/// Cosine similarity in [-1, 1]. A zero-norm operand scores 0.0 instead of
/// propagating NaN into the ranking.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Flat-scan nearest-neighbor retrieval over one collection at a time.
///
/// Every stored vector is scored per query (O(N·D)); callers that outgrow
/// the linear scan can swap this implementation without touching them.
#[derive(Debug, Clone)]
pub struct Retriever {
    store: ChunkStore,
}

impl Retriever {
    #[must_use]
    pub fn new(store: ChunkStore) -> Self {
        Self { store }
    }

    /// Return up to `k` chunks sorted by descending similarity to `query`.
    ///
    /// Ties keep insertion order (stable sort over an id-ordered scan). An
    /// empty collection yields an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying scan fails.
    pub async fn top_k(
        &self,
        query: &[f32],
        kind: SourceKind,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, MemoryError> {
        let chunks = self.store.scan(kind).await?;
        let mut scored: Vec<ScoredChunk> = chunks
            .into_iter()
            .map(|chunk| ScoredChunk {
                id: chunk.id,
                content: chunk.content,
                score: cosine_similarity(query, &chunk.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }
}
