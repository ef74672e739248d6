//! Upload types

use axum::body::Bytes;

// ============================================================================
// Upload
// ============================================================================

/// A file received from a multipart form, not yet validated
#[derive(Debug, Clone)]
pub struct Upload {
    /// Declared file name (may be empty)
    pub file_name: String,

    /// Declared content type from the multipart part, if any
    pub content_type: Option<String>,

    /// Raw file bytes
    pub data: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Upload validation failures.
///
/// Each variant is a distinct rejection reason; the HTTP layer maps them
/// one-to-one onto status codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes. Maximum size is {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("Filename is required")]
    MissingFilename,

    #[error("File extension not allowed. Allowed: {allowed}")]
    ExtensionNotAllowed { extension: String, allowed: String },

    #[error("Could not verify file type")]
    UnverifiableType,

    #[error("Invalid file type. Expected {expected}, got {detected}")]
    MimeMismatch { expected: String, detected: String },
}

impl ValidationError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingFilename => StatusCode::BAD_REQUEST,
            Self::ExtensionNotAllowed { .. } => StatusCode::BAD_REQUEST,
            Self::UnverifiableType => StatusCode::BAD_REQUEST,
            Self::MimeMismatch { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileTooLarge { .. } => "file_too_large",
            Self::MissingFilename => "missing_filename",
            Self::ExtensionNotAllowed { .. } => "extension_not_allowed",
            Self::UnverifiableType => "unverifiable_type",
            Self::MimeMismatch { .. } => "mime_mismatch",
        }
    }
}
