//! PDF text extraction
//!
//! Wraps `pdf-extract`. Parsing is CPU bound and runs on the blocking pool;
//! panics inside the parser are contained and reported as corrupt input.

use std::panic::{catch_unwind, AssertUnwindSafe};

use async_trait::async_trait;
use axum::body::Bytes;

/// Text extraction failures. Both are problems with the input, not the server.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to extract text from PDF: {0}")]
    Corrupt(String),

    #[error("PDF appears to be empty or contains no extractable text")]
    NoText,
}

/// Turns PDF bytes into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, data: Bytes) -> Result<String, ExtractionError>;
}

/// `pdf-extract` backed extractor
#[derive(Debug, Default, Clone)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous extraction; callers on the runtime should go through
    /// [`TextExtractor::extract`].
    pub fn extract_blocking(data: &[u8]) -> Result<String, ExtractionError> {
        let text = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(data)))
            .map_err(|_| ExtractionError::Corrupt("PDF parser panicked".to_string()))?
            .map_err(|e| ExtractionError::Corrupt(e.to_string()))?;

        ensure_text(text)
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, data: Bytes) -> Result<String, ExtractionError> {
        tokio::task::spawn_blocking(move || Self::extract_blocking(&data))
            .await
            .map_err(|e| ExtractionError::Corrupt(format!("extraction task failed: {}", e)))?
    }
}

/// Reject text that is empty after trimming
pub fn ensure_text(text: String) -> Result<String, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_text() {
        assert!(matches!(ensure_text(String::new()), Err(ExtractionError::NoText)));
        assert!(matches!(ensure_text(" \n\t \n".into()), Err(ExtractionError::NoText)));
        assert_eq!(ensure_text(" GPA 3.9 ".into()).unwrap(), " GPA 3.9 ");
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_corrupt() {
        let extractor = PdfTextExtractor::new();
        let result = extractor
            .extract(Bytes::from_static(b"this is definitely not a pdf"))
            .await;
        assert!(matches!(result, Err(ExtractionError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_extracts_text_from_rendered_report() {
        let lines = crate::pdf::wrap_text("GPA: 3.9 (weighted)\nMajor: Biology", 80);
        let bytes = crate::pdf::report::build_report(&lines).unwrap();

        let text = PdfTextExtractor::new()
            .extract(Bytes::from(bytes))
            .await
            .unwrap();

        assert!(text.contains("GPA: 3.9 (weighted)"), "got {text:?}");
        assert!(text.contains("Major: Biology"), "got {text:?}");
        let first = text.find("GPA").unwrap();
        let second = text.find("Major").unwrap();
        assert!(first < second);
    }
}
