pub mod openai;
pub mod qdrant;

pub use openai::{OpenAiCompletions, OpenAiEmbeddings};
pub use qdrant::QdrantIndex;
