//! Retrieval support for large documents: chunking and an in-memory
//! similarity index scoped to a single request.

pub mod chunker;
pub mod index;

pub use chunker::{Chunk, Chunker, ChunkingError};
pub use index::{cosine_similarity, FlatIndex, IndexError, ScoredChunk};
