//! LLM Module
//!
//! Chat completion and embedding clients used by the extraction router.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use extractor_server::llm::{ChatModel, OpenAiClient};
//!
//! let client = OpenAiClient::from_config(&config.llm)?;
//! let answer = client.complete("Extract applicant info from this text: ...").await?;
//! ```

mod provider;
mod types;

pub use provider::{ChatModel, EmbeddingModel, OpenAiClient};
pub use types::{ChatMessage, ProviderError, Role};
