pub mod answer;
pub mod chunk;
pub mod search;

pub use answer::{AskResponse, GeneratedAnswer};
pub use chunk::{Chunk, ChunkMetadata, ChunkType, chunk_id};
pub use search::{CollectionInfo, SearchResult};
