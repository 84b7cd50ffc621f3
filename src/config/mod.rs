use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ClauseError, Result};

/// Explicit configuration, built once by the composition root and passed into
/// each component's constructor. No ambient global state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub vector_db: VectorDbConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection_name: String,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection_name: "compliance_docs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            batch_size: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub max_tokens: u32,
    pub top_k: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            top_k: 3,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;
        let merged = Self::merge(global, project);
        Ok(merged.with_env_overrides())
    }

    fn load_global() -> Result<Self> {
        let config_dir = directories::ProjectDirs::from("", "", "clause").map_or_else(
            || PathBuf::from("~/.config/clause"),
            |d| d.config_dir().to_path_buf(),
        );

        Self::load_file(&config_dir.join("config.toml"))
    }

    fn load_project() -> Result<Self> {
        Self::load_file(std::path::Path::new(".clause/config.toml"))
    }

    fn load_file(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| ClauseError::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    fn merge(global: Self, project: Self) -> Self {
        Self {
            openai_api_key: project.openai_api_key.or(global.openai_api_key),
            openai_base_url: project.openai_base_url.or(global.openai_base_url),
            vector_db: project.vector_db,
            embedding: project.embedding,
            generation: project.generation,
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            self.openai_base_url = Some(url);
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            self.vector_db.url = url;
        }
        if let Ok(key) = std::env::var("QDRANT_API_KEY") {
            self.vector_db.api_key = Some(key);
        }
        self
    }

    pub fn require_openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ClauseError::Config("OPENAI_API_KEY is not set".to_string()))
    }

    pub fn openai_base_url(&self) -> &str {
        self.openai_base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1")
    }
}
