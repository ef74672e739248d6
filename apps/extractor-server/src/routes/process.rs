//! PDF processing endpoint

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, Result};
use crate::pipeline::{process_upload, ProcessResponse};
use crate::state::AppState;
use crate::upload::Upload;

/// Multipart field names accepted for the document
const FILE_FIELDS: [&str; 2] = ["file", "pdf"];

/// Upload a PDF and extract applicant information from it
pub async fn process_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>> {
    let upload = read_upload(multipart).await?;
    let response = process_upload(&state, upload).await?;
    Ok(Json(response))
}

/// Pull the first file field out of the form
async fn read_upload(mut multipart: Multipart) -> Result<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        tracing::debug!(
            "Received field: name='{}', filename={:?}, content_type={:?}",
            name,
            file_name,
            content_type
        );

        if !FILE_FIELDS.contains(&name.as_str()) {
            continue;
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        tracing::debug!("Read {} bytes of file data", data.len());

        let upload =
            Upload::new(file_name.unwrap_or_default(), data).with_content_type(content_type);
        return Ok(upload);
    }

    tracing::warn!("No file field found in multipart upload");
    Err(AppError::BadRequest("No file provided".to_string()))
}

/// Body-limit rejections keep their 413; anything else is a malformed form
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload rejected by body limit: {}", e);
        return AppError::PayloadTooLarge(e.body_text());
    }
    tracing::error!("Failed to read multipart field: {}", e);
    AppError::BadRequest(format!("Failed to read upload: {}", e.body_text()))
}
