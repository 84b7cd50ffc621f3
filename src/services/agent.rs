use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::domain::{AskResponse, CollectionInfo};
use crate::error::Result;
use crate::ports::{CompletionClient, EmbeddingGenerator, VectorIndex};
use crate::services::generator::Generator;
use crate::services::retrieval::Retriever;

/// Canned answer for the zero-results path. Skipping the generator there
/// saves a completion call and removes the hallucination risk of generating
/// from nothing.
pub const NO_INFORMATION_ANSWER: &str =
    "I couldn't find relevant information in the regulations to answer this question.";

/// Composes retrieval and grounded generation into one question-answering
/// call, attaching timing and provenance to the result.
pub struct ComplianceAgent<E, I, C>
where
    E: EmbeddingGenerator,
    I: VectorIndex,
    C: CompletionClient,
{
    retriever: Retriever<E, I>,
    generator: Generator<C>,
    max_tokens: u32,
}

impl<E, I, C> ComplianceAgent<E, I, C>
where
    E: EmbeddingGenerator,
    I: VectorIndex,
    C: CompletionClient,
{
    pub fn new(embedder: Arc<E>, index: Arc<I>, completions: Arc<C>, max_tokens: u32) -> Self {
        Self {
            retriever: Retriever::new(embedder, index),
            generator: Generator::new(completions),
            max_tokens,
        }
    }

    pub async fn ask(&self, query: &str, top_k: usize) -> Result<AskResponse> {
        let start = Instant::now();

        let results = self.retriever.retrieve(query, top_k).await?;

        if results.is_empty() {
            tracing::info!("No chunks retrieved, skipping generation");
            return Ok(AskResponse {
                answer: NO_INFORMATION_ANSWER.to_string(),
                citations: Vec::new(),
                model: None,
                total_tokens: 0,
                retrieval_time: start.elapsed().as_secs_f64(),
                chunks_retrieved: 0,
                retrieval_scores: Vec::new(),
            });
        }

        let retrieval_scores: Vec<f32> = results.iter().map(|r| r.score).collect();
        let chunks_retrieved = results.len();

        let generated = self
            .generator
            .generate(query, &results, self.max_tokens)
            .await?;

        Ok(AskResponse {
            answer: generated.answer,
            citations: generated.citations,
            model: Some(generated.model),
            total_tokens: generated.total_tokens,
            retrieval_time: start.elapsed().as_secs_f64(),
            chunks_retrieved,
            retrieval_scores,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub vector_db: Option<CollectionInfo>,
    pub generator_model: String,
    pub embedding_model: String,
    pub status: String,
}

/// Snapshot of what the pipeline would run against: collection state plus
/// the configured model names. Needs only the index, so the status check
/// works without completion or embedding credentials.
pub async fn system_info<I: VectorIndex>(
    index: &I,
    embedding_model: &str,
    generator_model: &str,
) -> Result<SystemInfo> {
    let collection = index.collection_info().await?;
    let status = match &collection {
        Some(info) if info.point_count > 0 => "ready",
        Some(_) => "not_indexed",
        None => "no_collection",
    };

    Ok(SystemInfo {
        vector_db: collection,
        generator_model: generator_model.to_string(),
        embedding_model: embedding_model.to_string(),
        status: status.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{Chunk, SearchResult};
    use crate::error::ClauseError;
    use crate::parser::{RegulationFamily, RegulationParser};
    use crate::ports::Completion;
    use crate::services::indexing::IndexingService;

    /// Counts occurrences of a fixed vocabulary, so related texts land close
    /// under cosine similarity without any external service.
    struct KeywordEmbedder;

    const VOCABULARY: [&str; 4] = ["erasure", "consent", "scope", "transfer"];

    fn keyword_vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        VOCABULARY
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            // Constant tail component so no vector is all zeros.
            .chain(std::iter::once(0.1))
            .collect()
    }

    #[async_trait]
    impl EmbeddingGenerator for KeywordEmbedder {
        async fn embed(&self, text: &str) -> crate::error::Result<Vec<f32>> {
            Ok(keyword_vector(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| keyword_vector(t)).collect())
        }

        fn dimension(&self) -> usize {
            VOCABULARY.len() + 1
        }

        fn model_name(&self) -> &str {
            "keyword-test-embedder"
        }
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a * norm_b)
        }
    }

    /// Cosine-scored in-memory stand-in for the vector store.
    #[derive(Default)]
    struct InMemoryIndex {
        points: Mutex<Vec<(usize, Chunk, Vec<f32>)>>,
    }

    #[async_trait]
    impl VectorIndex for InMemoryIndex {
        async fn ensure_collection(&self, _dimension: usize) -> crate::error::Result<()> {
            Ok(())
        }

        async fn upsert(
            &self,
            chunks: &[Chunk],
            vectors: &[Vec<f32>],
            offset: usize,
        ) -> crate::error::Result<()> {
            if chunks.len() != vectors.len() {
                return Err(ClauseError::Validation(format!(
                    "{} chunks but {} vectors",
                    chunks.len(),
                    vectors.len()
                )));
            }
            let mut points = self.points.lock().unwrap();
            for (j, (chunk, vector)) in chunks.iter().zip(vectors).enumerate() {
                let id = offset + j;
                points.retain(|(existing, _, _)| *existing != id);
                points.push((id, chunk.clone(), vector.clone()));
            }
            Ok(())
        }

        async fn search(
            &self,
            query_vector: &[f32],
            top_k: usize,
        ) -> crate::error::Result<Vec<SearchResult>> {
            let points = self.points.lock().unwrap();
            let mut scored: Vec<SearchResult> = points
                .iter()
                .map(|(_, chunk, vector)| SearchResult {
                    chunk_id: chunk.id.clone(),
                    text: chunk.text.clone(),
                    metadata: chunk.metadata.clone(),
                    score: cosine_similarity(query_vector, vector),
                })
                .collect();
            scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
            scored.truncate(top_k);
            Ok(scored)
        }

        async fn collection_info(&self) -> crate::error::Result<Option<CollectionInfo>> {
            let count = self.points.lock().unwrap().len() as u64;
            Ok(Some(CollectionInfo {
                name: "test".to_string(),
                vector_count: count,
                point_count: count,
                status: "green".to_string(),
            }))
        }
    }

    struct CountingCompletion {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for CountingCompletion {
        async fn complete(
            &self,
            _system: &str,
            _user: &str,
            _max_tokens: u32,
        ) -> crate::error::Result<Completion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Completion {
                text: "Data must be erased without undue delay, per GDPR Article 17.".to_string(),
                total_tokens: 10,
            })
        }

        fn model_name(&self) -> &str {
            "counting-model"
        }
    }

    fn agent(
        index: Arc<InMemoryIndex>,
        completions: Arc<CountingCompletion>,
    ) -> ComplianceAgent<KeywordEmbedder, InMemoryIndex, CountingCompletion> {
        ComplianceAgent::new(Arc::new(KeywordEmbedder), index, completions, 1024)
    }

    /// Article 1 short (one article chunk), Article 17 long with three
    /// numbered paragraphs mentioning erasure.
    fn synthetic_regulation() -> String {
        let article_1_body = "This Regulation lays down general rules on data protection."; // under the split threshold
        let padding = "x".repeat(420);
        format!(
            "Article 1\nSubject-matter\n{article_1_body}\n\n\
             Article 17\nRight to erasure\n\
             1. The data subject has the right to obtain erasure. {padding}\n\
             2. The controller shall carry out erasure without undue delay. {padding}\n\
             3. Erasure requests propagate to processors. {padding}\n"
        )
    }

    #[tokio::test]
    async fn empty_collection_short_circuits_without_generation() {
        let index = Arc::new(InMemoryIndex::default());
        let completions = Arc::new(CountingCompletion {
            calls: AtomicUsize::new(0),
        });
        let agent = agent(Arc::clone(&index), Arc::clone(&completions));

        let response = agent.ask("What about erasure?", 3).await.unwrap();

        assert_eq!(response.answer, NO_INFORMATION_ANSWER);
        assert!(response.citations.is_empty());
        assert_eq!(response.chunks_retrieved, 0);
        assert!(response.retrieval_scores.is_empty());
        assert_eq!(response.model, None);
        assert_eq!(completions.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn end_to_end_parse_index_ask() {
        let parser = RegulationParser::new(RegulationFamily::Gdpr);
        let chunks = parser.parse(&synthetic_regulation()).unwrap();
        assert_eq!(chunks.len(), 4); // 1 article chunk + 3 paragraph chunks

        let embedder = Arc::new(KeywordEmbedder);
        let index = Arc::new(InMemoryIndex::default());
        let indexing = IndexingService::new(Arc::clone(&embedder), Arc::clone(&index), 100);
        indexing.index_chunks(&chunks).await.unwrap();

        let completions = Arc::new(CountingCompletion {
            calls: AtomicUsize::new(0),
        });
        let agent = agent(Arc::clone(&index), Arc::clone(&completions));

        let response = agent.ask("erasure", 2).await.unwrap();

        assert_eq!(response.chunks_retrieved, 2);
        assert_eq!(response.retrieval_scores.len(), 2);
        assert!(response.retrieval_scores[0] >= response.retrieval_scores[1]);
        assert_eq!(response.citations, vec!["GDPR Article 17"]);
        assert_eq!(response.model.as_deref(), Some("counting-model"));
        assert_eq!(completions.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn erasure_query_ranks_article_17_paragraphs_first() {
        let parser = RegulationParser::new(RegulationFamily::Gdpr);
        let chunks = parser.parse(&synthetic_regulation()).unwrap();

        let embedder = Arc::new(KeywordEmbedder);
        let index = Arc::new(InMemoryIndex::default());
        IndexingService::new(Arc::clone(&embedder), Arc::clone(&index), 100)
            .index_chunks(&chunks)
            .await
            .unwrap();

        let query_vector = embedder.embed("erasure").await.unwrap();
        let results = index.search(&query_vector, 2).await.unwrap();

        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(
                result.chunk_id.starts_with("gdpr_article_17_para_"),
                "expected an Article 17 paragraph chunk, got {}",
                result.chunk_id
            );
        }
    }

    #[tokio::test]
    async fn system_info_reports_ready_once_indexed() {
        let index = Arc::new(InMemoryIndex::default());

        let info = system_info(&*index, "keyword-test-embedder", "counting-model")
            .await
            .unwrap();
        assert_eq!(info.status, "not_indexed");

        let parser = RegulationParser::new(RegulationFamily::Gdpr);
        let chunks = parser.parse(&synthetic_regulation()).unwrap();
        IndexingService::new(Arc::new(KeywordEmbedder), Arc::clone(&index), 100)
            .index_chunks(&chunks)
            .await
            .unwrap();

        let info = system_info(&*index, "keyword-test-embedder", "counting-model")
            .await
            .unwrap();
        assert_eq!(info.status, "ready");
        assert_eq!(info.embedding_model, "keyword-test-embedder");
        assert_eq!(info.generator_model, "counting-model");
        assert_eq!(info.vector_db.unwrap().point_count, 4);
    }

    /// Index stand-in for a store that has never been written to.
    struct AbsentCollection;

    #[async_trait]
    impl VectorIndex for AbsentCollection {
        async fn ensure_collection(&self, _dimension: usize) -> crate::error::Result<()> {
            Ok(())
        }

        async fn upsert(
            &self,
            _chunks: &[Chunk],
            _vectors: &[Vec<f32>],
            _offset: usize,
        ) -> crate::error::Result<()> {
            Ok(())
        }

        async fn search(
            &self,
            _query_vector: &[f32],
            _top_k: usize,
        ) -> crate::error::Result<Vec<SearchResult>> {
            Ok(Vec::new())
        }

        async fn collection_info(&self) -> crate::error::Result<Option<CollectionInfo>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn system_info_reports_missing_collection() {
        let info = system_info(&AbsentCollection, "keyword-test-embedder", "counting-model")
            .await
            .unwrap();
        assert_eq!(info.status, "no_collection");
        assert!(info.vector_db.is_none());
    }
}
