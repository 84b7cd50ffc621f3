use std::sync::Arc;

use crate::domain::Chunk;
use crate::error::Result;
use crate::ports::{EmbeddingGenerator, VectorIndex};

/// Drives the bulk load: parsed chunks are embedded and upserted in strictly
/// sequential batches. The batch size only bounds request size; point ids are
/// derived from each chunk's position in the overall sequence, so re-indexing
/// the same corpus overwrites instead of duplicating.
pub struct IndexingService<E, I>
where
    E: EmbeddingGenerator,
    I: VectorIndex,
{
    embedder: Arc<E>,
    index: Arc<I>,
    batch_size: usize,
}

impl<E, I> IndexingService<E, I>
where
    E: EmbeddingGenerator,
    I: VectorIndex,
{
    pub const fn new(embedder: Arc<E>, index: Arc<I>, batch_size: usize) -> Self {
        Self {
            embedder,
            index,
            batch_size,
        }
    }

    /// Ensures the collection exists, then loads `chunks`. A batch's
    /// embeddings and upsert succeed or fail together; batches already
    /// committed before a failure stay committed.
    pub async fn index_chunks(&self, chunks: &[Chunk]) -> Result<usize> {
        self.index
            .ensure_collection(self.embedder.dimension())
            .await?;

        tracing::info!("Indexing {} chunks", chunks.len());

        for (batch_idx, batch) in chunks.chunks(self.batch_size).enumerate() {
            let offset = batch_idx * self.batch_size;
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            self.index.upsert(batch, &vectors, offset).await?;
            tracing::debug!(
                "Upserted batch {} ({} chunks, offset {})",
                batch_idx,
                batch.len(),
                offset
            );
        }

        Ok(chunks.len())
    }
}
