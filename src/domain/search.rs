use serde::{Deserialize, Serialize};

use super::ChunkMetadata;

/// One ranked hit from a similarity search. Produced per query, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
}

/// Snapshot of the backing collection, as reported by the index store.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub vector_count: u64,
    pub point_count: u64,
    pub status: String,
}
