use serde::{Deserialize, Serialize};

/// Minimal retrievable, citable unit of regulation text.
///
/// Chunks are created once by the parser and never mutated afterwards. Their
/// ids are a pure function of structural position, so re-parsing the same
/// document yields identical ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(text: String, metadata: ChunkMetadata) -> Self {
        let id = chunk_id(
            &metadata.regulation,
            &metadata.article_number,
            metadata.paragraph.as_deref(),
        );
        Self { id, text, metadata }
    }
}

/// Deterministic chunk id: `<reg>_article_<n>` or `<reg>_article_<n>_para_<p>`.
pub fn chunk_id(regulation: &str, article_number: &str, paragraph: Option<&str>) -> String {
    let base = format!("{}_article_{}", regulation.to_lowercase(), article_number);
    match paragraph {
        Some(p) => format!("{base}_para_{p}"),
        None => base,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub regulation: String,
    pub article_number: String,
    pub article_title: String,
    pub chapter: String,
    pub chapter_title: String,
    pub jurisdiction: String,
    pub effective_date: String,
    pub topics: Vec<String>,
    pub chunk_type: ChunkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    Article,
    Paragraph,
}
