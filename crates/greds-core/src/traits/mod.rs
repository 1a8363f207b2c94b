pub mod embedding;
pub mod generation;
pub mod retriever;
pub mod storage;
pub mod summarizer;
pub mod verifier;

pub use embedding::IEmbeddingProvider;
pub use generation::IGenerationProvider;
pub use retriever::IRetriever;
pub use storage::{IAuditLog, IChunkStore, ISessionStore, IVerificationStore};
pub use summarizer::ISummarizer;
pub use verifier::IVerifier;
