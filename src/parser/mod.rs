pub mod chapters;
pub mod segment;
pub mod topics;

pub use segment::{Article, RegulationFamily};
pub use topics::{KeywordClassifier, TopicClassifier};

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Chunk, ChunkMetadata, ChunkType};
use crate::error::{ClauseError, Result};

/// Articles shorter than this (in characters) become a single chunk; longer
/// ones are split into numbered paragraphs.
const PARAGRAPH_SPLIT_THRESHOLD: usize = 1000;

static PARAGRAPH_DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s+").expect("hard-coded regex compiles"));

/// Turns raw regulation text into an ordered sequence of citable chunks.
pub struct RegulationParser {
    family: RegulationFamily,
    classifier: Box<dyn TopicClassifier>,
}

impl RegulationParser {
    pub fn new(family: RegulationFamily) -> Self {
        Self::with_classifier(family, Box::new(KeywordClassifier))
    }

    pub fn with_classifier(family: RegulationFamily, classifier: Box<dyn TopicClassifier>) -> Self {
        Self { family, classifier }
    }

    /// Segments `document_text` into articles and emits chunks in document
    /// order. Finding zero articles is a data-quality failure, not an empty
    /// result.
    pub fn parse(&self, document_text: &str) -> Result<Vec<Chunk>> {
        let articles = self.family.segment(document_text);

        if articles.is_empty() {
            return Err(ClauseError::Parse(format!(
                "no {} articles found in document",
                self.family.name()
            )));
        }

        tracing::debug!(
            "Extracted {} articles from {}",
            articles.len(),
            self.family.name()
        );

        let mut chunks = Vec::new();
        for article in &articles {
            chunks.extend(self.article_to_chunks(article));
        }

        tracing::debug!("Created {} chunks", chunks.len());
        Ok(chunks)
    }

    /// One `article` chunk for short articles; one `paragraph` chunk per
    /// numbered paragraph for long ones. A long article whose body has no
    /// numbered-paragraph delimiters degenerates to zero chunks.
    fn article_to_chunks(&self, article: &Article) -> Vec<Chunk> {
        let full_text = format!(
            "Article {}: {}\n\n{}",
            article.number, article.title, article.content
        );

        let base_metadata = ChunkMetadata {
            regulation: self.family.name().to_string(),
            article_number: article.number.clone(),
            article_title: article.title.clone(),
            chapter: article.chapter.clone(),
            chapter_title: self.family.chapter_title(&article.chapter).to_string(),
            jurisdiction: self.family.jurisdiction().to_string(),
            effective_date: self.family.effective_date().to_string(),
            topics: self.classifier.classify(&full_text),
            chunk_type: ChunkType::Article,
            paragraph: None,
        };

        if article.content.chars().count() < PARAGRAPH_SPLIT_THRESHOLD {
            return vec![Chunk::new(full_text, base_metadata)];
        }

        split_into_paragraphs(&article.content)
            .into_iter()
            .enumerate()
            .map(|(i, para)| {
                let ordinal = (i + 1).to_string();
                let text = format!(
                    "Article {}.{}: {}\n\n{}",
                    article.number, ordinal, article.title, para
                );
                let metadata = ChunkMetadata {
                    chunk_type: ChunkType::Paragraph,
                    paragraph: Some(ordinal),
                    ..base_metadata.clone()
                };
                Chunk::new(text, metadata)
            })
            .collect()
    }
}

/// Splits article content on the "leading integer + period + whitespace"
/// delimiters used for numbered paragraphs, discarding empty fragments.
fn split_into_paragraphs(content: &str) -> Vec<String> {
    if !PARAGRAPH_DELIMITER_RE.is_match(content) {
        return Vec::new();
    }
    PARAGRAPH_DELIMITER_RE
        .split(content)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
