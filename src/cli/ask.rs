use std::sync::Arc;

use crate::adapters::{OpenAiCompletions, OpenAiEmbeddings, QdrantIndex};
use crate::config::Config;
use crate::error::Result;
use crate::services::ComplianceAgent;

pub async fn run(question: &str, top_k: Option<usize>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let top_k = top_k.unwrap_or(config.generation.top_k);

    let embedder = Arc::new(OpenAiEmbeddings::new(&config)?);
    let index = Arc::new(QdrantIndex::new(&config.vector_db));
    let completions = Arc::new(OpenAiCompletions::new(&config)?);
    let agent = ComplianceAgent::new(embedder, index, completions, config.generation.max_tokens);

    let response = agent.ask(question, top_k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.answer);
    if !response.citations.is_empty() {
        println!("\nCitations:");
        for citation in &response.citations {
            println!("  - {citation}");
        }
    }
    println!(
        "\n({} chunks retrieved in {:.2}s)",
        response.chunks_retrieved, response.retrieval_time
    );

    Ok(())
}
