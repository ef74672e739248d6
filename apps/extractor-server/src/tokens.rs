//! Token counting
//!
//! The count is only a routing signal. It must be stable for a given text so
//! the DIRECT/RAG decision is reproducible.

use tiktoken_rs::CoreBPE;

/// Counts tokens the way the configured model tokenizes text
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

#[derive(Debug, thiserror::Error)]
#[error("No tokenizer available for model '{model}': {reason}")]
pub struct TokenizerError {
    pub model: String,
    pub reason: String,
}

/// BPE counter for OpenAI model families
pub struct TiktokenCounter {
    model: String,
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Resolve the encoding for `model` (e.g. `gpt-4` uses cl100k_base)
    pub fn for_model(model: &str) -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| TokenizerError {
            model: model.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}
