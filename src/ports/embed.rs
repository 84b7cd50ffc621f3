use async_trait::async_trait;

use crate::error::Result;

/// Converts text into fixed-length vectors via an external service.
///
/// `embed_batch` must preserve order: position `i` of the output corresponds
/// to position `i` of the input, and the lengths always match. Failures from
/// the underlying service propagate; there is no retry at this seam.
#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    fn dimension(&self) -> usize;
    fn model_name(&self) -> &str;
}
