use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::ProgressBar;

use crate::adapters::{OpenAiEmbeddings, QdrantIndex};
use crate::config::Config;
use crate::error::{ClauseError, Result};
use crate::parser::{RegulationFamily, RegulationParser};
use crate::services::IndexingService;

pub async fn run(file: PathBuf, regulation: &str, json: bool) -> Result<()> {
    let config = Config::load()?;
    let family: RegulationFamily = regulation.parse().map_err(ClauseError::Config)?;

    let text = std::fs::read_to_string(&file)?;
    let parser = RegulationParser::new(family);
    let chunks = parser.parse(&text)?;

    let embedder = Arc::new(OpenAiEmbeddings::new(&config)?);
    let index = Arc::new(QdrantIndex::new(&config.vector_db));
    let service = IndexingService::new(embedder, index, config.embedding.batch_size);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!(
        "Indexing {} chunks from {}",
        chunks.len(),
        file.display()
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let indexed = service.index_chunks(&chunks).await?;
    spinner.finish_and_clear();

    if json {
        let out = serde_json::json!({
            "regulation": family.name(),
            "chunks_indexed": indexed,
            "collection": config.vector_db.collection_name,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "Indexed {indexed} {} chunks into '{}'",
            family.name(),
            config.vector_db.collection_name
        );
    }

    Ok(())
}
