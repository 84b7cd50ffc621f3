use serde::Serialize;

use super::SearchResult;

/// Structured response from the grounded generator.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedAnswer {
    pub answer: String,
    /// Distinct citation labels, e.g. `["GDPR Article 17", "GDPR Article 7"]`,
    /// in first-appearance order within the answer text.
    pub citations: Vec<String>,
    pub raw_chunks: Vec<SearchResult>,
    pub model: String,
    pub total_tokens: u32,
}

/// Final answer from the agent, enriched with retrieval provenance.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub citations: Vec<String>,
    pub model: Option<String>,
    pub total_tokens: u32,
    /// Wall-clock seconds elapsed since `ask` began.
    pub retrieval_time: f64,
    pub chunks_retrieved: usize,
    /// Similarity scores in the order chunks were passed to the generator.
    pub retrieval_scores: Vec<f32>,
}
