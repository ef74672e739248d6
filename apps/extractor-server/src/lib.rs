//! PDF applicant extractor
//!
//! Accepts a PDF upload, extracts its text, and asks a language model for the
//! applicant's details. Short documents are sent whole; long ones go through
//! an in-memory retrieval step first. The answer is written to a PDF report.
//!
//! # Modules
//!
//! - `upload`: size, extension and content-type checks
//! - `pdf`: text extraction and report rendering
//! - `tokens`: token counting for mode selection
//! - `llm`: chat and embedding providers
//! - `rag`: chunking and the per-request similarity index
//! - `extraction`: mode selection and the extraction router
//! - `pipeline`: the end-to-end request flow
//! - `routes`: HTTP surface

pub mod config;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod pdf;
pub mod pipeline;
pub mod rag;
pub mod routes;
pub mod state;
pub mod tokens;
pub mod upload;

pub use config::Config;
pub use error::AppError;
pub use routes::create_router;
pub use state::{AppState, Services};
