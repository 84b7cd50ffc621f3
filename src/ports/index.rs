use async_trait::async_trait;

use crate::domain::{Chunk, CollectionInfo, SearchResult};
use crate::error::Result;

/// Durable mapping from chunk identity to (vector, payload), queryable by
/// nearest-neighbor similarity.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Idempotent: creates the cosine-distance collection for vectors of the
    /// given dimension if absent, no-ops if it already exists.
    async fn ensure_collection(&self, dimension: usize) -> Result<()>;

    /// Stores each (chunk, vector) pair under point id `offset + position`,
    /// so re-upserting the same chunk at the same position overwrites rather
    /// than duplicates. Fails with a validation error before any network call
    /// when the slice lengths differ.
    async fn upsert(&self, chunks: &[Chunk], vectors: &[Vec<f32>], offset: usize) -> Result<()>;

    /// At most `top_k` results, ordered by descending similarity. An empty
    /// collection yields an empty vec, not an error.
    async fn search(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// `None` when the collection does not exist; never an error for that case.
    async fn collection_info(&self) -> Result<Option<CollectionInfo>>;
}
