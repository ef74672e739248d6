//! Request-scoped similarity index.
//!
//! Exhaustive cosine search over every chunk. Built once per RAG request and
//! dropped with it; nothing is shared between requests.

use super::chunker::Chunk;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("Got {embeddings} embeddings for {chunks} chunks")]
    LengthMismatch { chunks: usize, embeddings: usize },

    #[error("Embedding {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Query has dimension {actual}, index has {expected}")]
    QueryDimensionMismatch { expected: usize, actual: usize },
}

/// A search hit
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a Chunk,
    pub score: f32,
}

/// Flat (brute-force) vector index
#[derive(Debug)]
pub struct FlatIndex {
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

impl FlatIndex {
    /// Pair chunks with their embeddings. Every vector must have the same
    /// dimension, and there must be exactly one per chunk.
    pub fn build(chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        if chunks.len() != vectors.len() {
            return Err(IndexError::LengthMismatch {
                chunks: chunks.len(),
                embeddings: vectors.len(),
            });
        }

        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimension) {
            return Err(IndexError::DimensionMismatch {
                index,
                expected: dimension,
                actual: v.len(),
            });
        }

        Ok(Self {
            chunks,
            vectors,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Top `k` chunks by cosine similarity to `query`, best first. Ties keep
    /// document order. The query must have the index's dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk<'_>>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::QueryDimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<ScoredChunk<'_>> = self
            .chunks
            .iter()
            .zip(&self.vectors)
            .map(|(chunk, vector)| ScoredChunk {
                chunk,
                score: cosine_similarity(query, vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.chunk.index.cmp(&b.chunk.index))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

/// Cosine similarity; zero-length or mismatched vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
