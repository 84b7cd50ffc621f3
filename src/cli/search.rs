use std::sync::Arc;

use crate::adapters::{OpenAiEmbeddings, QdrantIndex};
use crate::config::Config;
use crate::error::Result;
use crate::services::Retriever;

pub async fn run(query: &str, top_k: usize, json: bool) -> Result<()> {
    let config = Config::load()?;

    let embedder = Arc::new(OpenAiEmbeddings::new(&config)?);
    let index = Arc::new(QdrantIndex::new(&config.vector_db));
    let retriever = Retriever::new(embedder, index);

    let results = retriever.retrieve(query, top_k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No matching chunks.");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        let preview: String = result.text.chars().take(150).collect();
        println!(
            "{}. {} (score: {:.3})",
            i + 1,
            result.chunk_id,
            result.score
        );
        println!(
            "   Article {} - {}",
            result.metadata.article_number, result.metadata.article_title
        );
        println!("   {preview}...\n");
    }

    Ok(())
}
