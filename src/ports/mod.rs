pub mod complete;
pub mod embed;
pub mod index;

pub use complete::{Completion, CompletionClient};
pub use embed::EmbeddingGenerator;
pub use index::VectorIndex;
