pub mod agent;
pub mod generator;
pub mod indexing;
pub mod retrieval;

pub use agent::{ComplianceAgent, NO_INFORMATION_ANSWER, SystemInfo, system_info};
pub use generator::Generator;
pub use indexing::IndexingService;
pub use retrieval::Retriever;
