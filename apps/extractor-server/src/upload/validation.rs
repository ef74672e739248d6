//! Upload validation
//!
//! Runs before any parsing: size ceiling, filename, extension allow-list and
//! magic-byte type detection. The sniffed type must be allowed and must agree
//! with the type implied by the file name and with the declared part type.

use crate::config::UploadConfig;

use super::types::{Upload, ValidationError};

/// Validate an uploaded file. Checks run in a fixed order so the cheapest
/// rejection wins.
pub fn validate_upload(upload: &Upload, config: &UploadConfig) -> Result<(), ValidationError> {
    validate_size(&upload.data, config.max_file_size)?;
    validate_extension(&upload.file_name, &config.allowed_extensions)?;
    validate_mime_type(
        &upload.file_name,
        upload.content_type.as_deref(),
        &upload.data,
        &config.allowed_mime_types,
    )?;
    Ok(())
}

/// Reject content above the size ceiling
pub fn validate_size(data: &[u8], max: usize) -> Result<(), ValidationError> {
    if data.len() > max {
        return Err(ValidationError::FileTooLarge {
            size: data.len(),
            max,
        });
    }
    Ok(())
}

/// Lower-cased extension including the dot, or empty if there is none
pub fn file_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

/// Require a filename whose extension is on the allow-list
pub fn validate_extension(file_name: &str, allowed: &[String]) -> Result<(), ValidationError> {
    if file_name.trim().is_empty() {
        return Err(ValidationError::MissingFilename);
    }

    let extension = file_extension(file_name);
    if !allowed.iter().any(|a| a == &extension) {
        return Err(ValidationError::ExtensionNotAllowed {
            extension,
            allowed: allowed.join(", "),
        });
    }
    Ok(())
}

/// Sniff the content type from magic bytes and compare it with the
/// allow-list, the type the file name claims and the declared part type.
///
/// A missing or `application/octet-stream` declaration carries no claim and
/// is not compared.
pub fn validate_mime_type(
    file_name: &str,
    declared: Option<&str>,
    data: &[u8],
    allowed: &[String],
) -> Result<(), ValidationError> {
    let detected = infer::get(data)
        .map(|kind| kind.mime_type())
        .ok_or(ValidationError::UnverifiableType)?;

    if !allowed.iter().any(|a| a == detected) {
        return Err(ValidationError::MimeMismatch {
            expected: allowed.join(", "),
            detected: detected.to_string(),
        });
    }

    if let Some(guessed) = mime_guess::from_path(file_name).first_raw() {
        if guessed != detected {
            return Err(ValidationError::MimeMismatch {
                expected: guessed.to_string(),
                detected: detected.to_string(),
            });
        }
    }

    if let Some(declared) = declared.and_then(essence) {
        let generic = mime_guess::mime::APPLICATION_OCTET_STREAM.essence_str();
        if !declared.eq_ignore_ascii_case(generic) && !declared.eq_ignore_ascii_case(detected)
        {
            return Err(ValidationError::MimeMismatch {
                expected: declared.to_string(),
                detected: detected.to_string(),
            });
        }
    }

    Ok(())
}

/// `type/subtype` without parameters, or None if blank
fn essence(content_type: &str) -> Option<&str> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    if essence.is_empty() {
        None
    } else {
        Some(essence)
    }
}
