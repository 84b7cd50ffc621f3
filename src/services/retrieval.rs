use std::sync::Arc;

use crate::domain::SearchResult;
use crate::error::Result;
use crate::ports::{EmbeddingGenerator, VectorIndex};

/// Facade over embed-then-search: one query in, ranked chunks out.
pub struct Retriever<E, I>
where
    E: EmbeddingGenerator,
    I: VectorIndex,
{
    embedder: Arc<E>,
    index: Arc<I>,
}

impl<E, I> Retriever<E, I>
where
    E: EmbeddingGenerator,
    I: VectorIndex,
{
    pub const fn new(embedder: Arc<E>, index: Arc<I>) -> Self {
        Self { embedder, index }
    }

    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let query_vector = self.embedder.embed(query).await?;
        let results = self.index.search(&query_vector, top_k).await?;
        tracing::debug!("Retrieved {} chunks for query", results.len());
        Ok(results)
    }
}
