//! Size-adaptive extraction.
//!
//! Documents at or under the token threshold are sent whole to the model.
//! Larger ones are chunked, embedded and searched, and only the retrieved
//! chunks are sent.

pub mod mode;
pub mod router;

pub use mode::ProcessingMode;
pub use router::{direct_prompt, retrieval_prompt, Extraction, ExtractionRouter, RETRIEVAL_QUERY};
