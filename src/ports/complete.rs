use async_trait::async_trait;

use crate::error::Result;

/// Opaque text-completion service. Implementations pin temperature to zero so
/// identical inputs yield reproducible outputs.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<Completion>;
    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    /// Zero when the service does not report usage.
    pub total_tokens: u32,
}
