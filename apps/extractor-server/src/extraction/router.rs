//! Extraction router
//!
//! Picks DIRECT or RAG from the token count and runs it against the injected
//! chat and embedding providers.

use std::sync::Arc;

use serde::Serialize;

use crate::config::RagConfig;
use crate::llm::{ChatModel, EmbeddingModel, ProviderError};
use crate::rag::{Chunker, ChunkingError, FlatIndex, ScoredChunk};

use super::mode::ProcessingMode;

/// Fixed retrieval query for RAG mode
pub const RETRIEVAL_QUERY: &str = "Extract applicant GPA, intended major, and test scores.";

/// Router output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub mode: ProcessingMode,
    pub response: String,
}

/// Prompt for DIRECT mode
pub fn direct_prompt(text: &str) -> String {
    format!("Extract applicant info from this text:\n\n{}", text)
}

/// "Stuff" prompt for RAG mode: retrieved context followed by the question
pub fn retrieval_prompt(context: &[ScoredChunk<'_>], question: &str) -> String {
    let context = context
        .iter()
        .map(|hit| hit.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
         {}\n\nQuestion: {}\nHelpful Answer:",
        context, question
    )
}

pub struct ExtractionRouter {
    chat: Arc<dyn ChatModel>,
    embedder: Arc<dyn EmbeddingModel>,
    chunker: Chunker,
    max_tokens: usize,
    top_k: usize,
}

impl ExtractionRouter {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn EmbeddingModel>,
        max_tokens: usize,
        rag: &RagConfig,
    ) -> Result<Self, ChunkingError> {
        Ok(Self {
            chat,
            embedder,
            chunker: Chunker::new(rag.chunk_size, rag.chunk_overlap)?,
            max_tokens,
            top_k: rag.top_k,
        })
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn select_mode(&self, token_count: usize) -> ProcessingMode {
        ProcessingMode::select(token_count, self.max_tokens)
    }

    /// Run the strategy selected by `token_count`.
    ///
    /// `text` must be non-empty after trimming and `token_count` must be
    /// computed from it.
    pub async fn extract(&self, text: &str, token_count: usize) -> Result<Extraction, ProviderError> {
        let mode = self.select_mode(token_count);
        tracing::info!(tokens = token_count, max_tokens = self.max_tokens, mode = %mode, "Routing extraction");

        let response = match mode {
            ProcessingMode::Direct => self.extract_direct(text).await?,
            ProcessingMode::Rag => self.extract_with_rag(text).await?,
        };

        Ok(Extraction { mode, response })
    }

    /// One completion over the full text
    pub async fn extract_direct(&self, text: &str) -> Result<String, ProviderError> {
        let answer = self.chat.complete(&direct_prompt(text)).await?;
        ensure_answer(answer)
    }

    /// Chunk, embed, retrieve top-k for the fixed query, then one completion
    pub async fn extract_with_rag(&self, text: &str) -> Result<String, ProviderError> {
        let chunks = self.chunker.split(text);
        let inputs: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();

        tracing::debug!(
            chunks = chunks.len(),
            chunk_size = self.chunker.chunk_size(),
            chunk_overlap = self.chunker.chunk_overlap(),
            "Document chunked"
        );

        let vectors = self.embedder.embed(&inputs).await?;
        let index = FlatIndex::build(chunks, vectors)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let query = self.embedder.embed_query(RETRIEVAL_QUERY).await?;
        let hits = index
            .search(&query, self.top_k)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            retrieved = hits.len(),
            indexed = index.len(),
            top_score = hits.first().map(|h| h.score).unwrap_or(0.0),
            "Retrieved context"
        );

        let answer = self
            .chat
            .complete(&retrieval_prompt(&hits, RETRIEVAL_QUERY))
            .await?;
        ensure_answer(answer)
    }
}

fn ensure_answer(answer: String) -> Result<String, ProviderError> {
    if answer.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(answer)
}
