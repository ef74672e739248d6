//! Request pipeline: validate, extract text, count tokens, route, render.

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::extraction::ProcessingMode;
use crate::pdf::text::ensure_text;
use crate::state::AppState;
use crate::upload::{validate_upload, Upload};

/// Successful `/process` response body
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub tokens: usize,
    pub mode: ProcessingMode,
    pub response: String,
    pub output_file: String,
}

/// Run one upload through the whole pipeline.
///
/// Validation happens before the extractor sees any bytes, and empty text is
/// rejected before any provider call.
pub async fn process_upload(state: &AppState, upload: Upload) -> Result<ProcessResponse> {
    let config = state.config();

    validate_upload(&upload, &config.upload)?;
    tracing::info!(file_name = %upload.file_name, size = upload.size(), "Upload accepted");

    let text = state.extractor().extract(upload.data).await?;
    let text = ensure_text(text)?;

    let counter = state.counter();
    let (text, tokens) = tokio::task::spawn_blocking(move || {
        let tokens = counter.count(&text);
        (text, tokens)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Token counting task failed: {}", e)))?;

    let extraction = state.router().extract(&text, tokens).await?;

    let path = state.renderer().render(&extraction.response).await?;
    let output_file = path.display().to_string();

    tracing::info!(
        tokens,
        mode = %extraction.mode,
        output_file = %output_file,
        "Processing complete"
    );

    Ok(ProcessResponse {
        tokens,
        mode: extraction.mode,
        response: extraction.response,
        output_file,
    })
}
