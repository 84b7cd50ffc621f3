use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClauseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Index store error: {0}")]
    IndexStore(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClauseError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Parse(_) => 1,
            Self::Validation(_) => 2,
            Self::Config(_) => 3,
            Self::Embedding(_) | Self::Generation(_) | Self::IndexStore(_) => 4,
            Self::Io(_) | Self::Serialization(_) | Self::Http(_) => 10,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClauseError>;
