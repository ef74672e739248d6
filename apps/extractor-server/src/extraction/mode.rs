//! Processing mode selection

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a document is sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessingMode {
    /// Whole text in a single prompt
    #[serde(rename = "direct")]
    Direct,
    /// Chunk, embed, retrieve, then generate from the retrieved chunks
    #[serde(rename = "RAG")]
    Rag,
}

impl ProcessingMode {
    /// Documents strictly above `max_tokens` use retrieval; a count equal to
    /// the threshold still goes direct.
    pub fn select(token_count: usize, max_tokens: usize) -> Self {
        if token_count > max_tokens {
            ProcessingMode::Rag
        } else {
            ProcessingMode::Direct
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Direct => "direct",
            ProcessingMode::Rag => "RAG",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
