use crate::adapters::QdrantIndex;
use crate::config::Config;
use crate::error::Result;
use crate::services::system_info;

pub async fn run(json: bool) -> Result<()> {
    let config = Config::load()?;
    let index = QdrantIndex::new(&config.vector_db);

    let info = system_info(&index, &config.embedding.model, &config.generation.model).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    match &info.vector_db {
        Some(collection) => {
            println!("Collection:      {}", collection.name);
            println!("Points:          {}", collection.point_count);
            println!("Indexed vectors: {}", collection.vector_count);
            println!("Store status:    {}", collection.status);
        }
        None => println!("Collection '{}' not found.", index.collection_name()),
    }
    println!("Embedding model: {}", info.embedding_model);
    println!("Generator model: {}", info.generator_model);
    println!("Status:          {}", info.status);

    Ok(())
}
