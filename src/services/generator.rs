use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{GeneratedAnswer, SearchResult};
use crate::error::Result;
use crate::ports::CompletionClient;

const SYSTEM_PROMPT: &str = "\
You are a compliance AI assistant specialising in GDPR, CCPA, and PIPEDA.
You help B2B SaaS companies understand their regulatory obligations.

Rules:
1. Answer ONLY from the provided regulation excerpts.
2. Cite every article you reference as \"REGULATION Article N\".
3. If the excerpts don't cover the question, say so clearly — never hallucinate.
4. Be precise and practical. Your audience is an experienced engineering or legal team.
5. If regulations conflict or differ by jurisdiction, explicitly note this.
";

static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(GDPR|CCPA|PIPEDA)\s+Article\s+([\d.]+)").expect("hard-coded regex compiles")
});

/// Composes retrieved chunks into a grounded prompt, invokes the completion
/// service at deterministic sampling, and extracts the answer's own citation
/// claims.
pub struct Generator<C: CompletionClient> {
    client: Arc<C>,
}

impl<C: CompletionClient> Generator<C> {
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub async fn generate(
        &self,
        question: &str,
        ranked_chunks: &[SearchResult],
        max_tokens: u32,
    ) -> Result<GeneratedAnswer> {
        let context = format_context(ranked_chunks);
        let user_prompt = build_user_prompt(question, &context);

        let completion = self
            .client
            .complete(SYSTEM_PROMPT, &user_prompt, max_tokens)
            .await?;

        tracing::debug!(
            "Generated answer with {} tokens via {}",
            completion.total_tokens,
            self.client.model_name()
        );

        Ok(GeneratedAnswer {
            citations: extract_citations(&completion.text),
            answer: completion.text,
            raw_chunks: ranked_chunks.to_vec(),
            model: self.client.model_name().to_string(),
            total_tokens: completion.total_tokens,
        })
    }
}

/// Numbered excerpt blocks joined by a separator line.
fn format_context(chunks: &[SearchResult]) -> String {
    let parts: Vec<String> = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "[{}] {} Article {}: {} (relevance: {:.2})\n{}\n",
                i + 1,
                chunk.metadata.regulation,
                chunk.metadata.article_number,
                chunk.metadata.article_title,
                chunk.score,
                chunk.text,
            )
        })
        .collect();
    parts.join("\n---\n")
}

fn build_user_prompt(question: &str, context: &str) -> String {
    format!(
        "Question: {question}\n\n\
         Regulation excerpts:\n{context}\n\n\
         Instructions:\n\
         - Answer the question using ONLY the excerpts above.\n\
         - End with a \"Citations:\" section listing every article referenced.",
    )
}

/// Best-effort view of the citations the answer claims: case-insensitive scan
/// for `REGULATION Article N`, normalized and deduplicated preserving
/// first-seen order. Does not cross-check against the grounding chunks.
fn extract_citations(answer_text: &str) -> Vec<String> {
    let mut citations: Vec<String> = Vec::new();

    for caps in CITATION_RE.captures_iter(answer_text) {
        let number = caps[2].trim_end_matches('.');
        if number.is_empty() {
            continue;
        }
        let label = format!("{} Article {number}", caps[1].to_uppercase());
        if !citations.contains(&label) {
            citations.push(label);
        }
    }

    citations
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{ChunkMetadata, ChunkType};
    use crate::ports::Completion;

    struct CannedCompletion {
        answer: String,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl CannedCompletion {
        fn new(answer: &str) -> Self {
            Self {
                answer: answer.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for CannedCompletion {
        async fn complete(&self, system: &str, user: &str, _max_tokens: u32) -> Result<Completion> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            Ok(Completion {
                text: self.answer.clone(),
                total_tokens: 42,
            })
        }

        fn model_name(&self) -> &str {
            "canned-model"
        }
    }

    fn result(regulation: &str, article: &str, title: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk_id: format!("{}_article_{article}", regulation.to_lowercase()),
            text: format!("Article {article}: {title}\n\nbody text"),
            metadata: ChunkMetadata {
                regulation: regulation.to_string(),
                article_number: article.to_string(),
                article_title: title.to_string(),
                chapter: "3".to_string(),
                chapter_title: "Rights of the data subject".to_string(),
                jurisdiction: "EU".to_string(),
                effective_date: "2018-05-25".to_string(),
                topics: vec!["deletion".to_string()],
                chunk_type: ChunkType::Article,
                paragraph: None,
            },
            score,
        }
    }

    #[test]
    fn citations_dedup_preserving_first_seen_order() {
        let answer = "Under GDPR Article 17 you must erase data. \
                      GDPR Article 17 also applies; see GDPR Article 7.";
        assert_eq!(
            extract_citations(answer),
            vec!["GDPR Article 17", "GDPR Article 7"]
        );
    }

    #[test]
    fn citation_scan_is_case_insensitive_and_normalizing() {
        let answer = "see gdpr article 17. Also CCPA Article 1798.100 applies.";
        assert_eq!(
            extract_citations(answer),
            vec!["GDPR Article 17", "CCPA Article 1798.100"]
        );
    }

    #[test]
    fn no_citations_yields_empty_list() {
        assert!(extract_citations("The excerpts do not cover this question.").is_empty());
    }

    #[test]
    fn context_blocks_are_numbered_with_two_decimal_scores() {
        let context = format_context(&[
            result("GDPR", "17", "Right to erasure", 0.9152),
            result("GDPR", "7", "Conditions for consent", 0.5),
        ]);

        assert!(context.starts_with("[1] GDPR Article 17: Right to erasure (relevance: 0.92)\n"));
        assert!(context.contains("\n---\n[2] GDPR Article 7: Conditions for consent (relevance: 0.50)\n"));
    }

    #[tokio::test]
    async fn generate_threads_question_and_context_through_the_prompt() {
        let client = Arc::new(CannedCompletion::new(
            "Erase within a month. Citations: GDPR Article 17",
        ));
        let generator = Generator::new(Arc::clone(&client));
        let chunks = vec![result("GDPR", "17", "Right to erasure", 0.9)];

        let answer = generator
            .generate("How fast must we erase?", &chunks, 256)
            .await
            .unwrap();

        assert_eq!(answer.citations, vec!["GDPR Article 17"]);
        assert_eq!(answer.model, "canned-model");
        assert_eq!(answer.total_tokens, 42);
        assert_eq!(answer.raw_chunks.len(), 1);

        let prompts = client.prompts.lock().unwrap();
        let (system, user) = &prompts[0];
        assert!(system.contains("Answer ONLY from the provided regulation excerpts."));
        assert!(user.starts_with("Question: How fast must we erase?"));
        assert!(user.contains("[1] GDPR Article 17: Right to erasure"));
    }
}
