//! Uploaded resume files → plain text.
//!
//! Size limits keep prompts within the model's context budget: files over
//! 1 MiB and texts over 10 000 characters are rejected before any LLM call.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;
pub const MAX_RESUME_CHARS: usize = 10_000;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File size exceeds 1MB. Please upload a smaller file or manually enter your resume information.")]
    TooLarge { size: usize },

    #[error("Resume text is too long. Please upload a shorter resume or manually enter your information.")]
    TooLong { chars: usize },

    #[error("Unsupported file type '{0}'. Please upload a PDF or plain-text resume.")]
    Unsupported(String),

    #[error("The uploaded file contains no readable text.")]
    Empty,

    #[error("Could not read PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Pdf,
    Text,
}

fn detect_kind(file_name: &str, content_type: Option<&str>) -> Result<FileKind, UploadError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match (extension.as_str(), content_type) {
        ("pdf", _) | (_, Some("application/pdf")) => Ok(FileKind::Pdf),
        ("txt" | "text" | "md", _) => Ok(FileKind::Text),
        (_, Some(ct)) if ct.starts_with("text/") => Ok(FileKind::Text),
        ("", None) => Err(UploadError::Unsupported(file_name.to_string())),
        (ext, _) if !ext.is_empty() => Err(UploadError::Unsupported(format!(".{ext}"))),
        (_, ct) => Err(UploadError::Unsupported(ct.unwrap_or(file_name).to_string())),
    }
}

/// Checks the size limit, decodes the file and checks the text-length limit.
pub async fn extract_upload_text(
    file_name: &str,
    content_type: Option<&str>,
    data: Bytes,
) -> Result<String, UploadError> {
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size: data.len() });
    }

    let kind = detect_kind(file_name, content_type)?;
    let text = match kind {
        FileKind::Pdf => {
            run_pdf_extraction(move || {
                pdf_extract::extract_text_from_mem(&data).map_err(|e| format!("{e:?}"))
            })
            .await?
        }
        FileKind::Text => String::from_utf8_lossy(&data).into_owned(),
    };
    debug!(
        "Extracted {} chars from {} ({:?})",
        text.chars().count(),
        file_name,
        kind
    );

    validate_resume_text(&text)?;
    Ok(text)
}

/// PDF parsing is CPU-bound and panics on some malformed files, so it runs on
/// the blocking pool and a panic surfaces as `UploadError::Pdf`.
async fn run_pdf_extraction<F>(extract: F) -> Result<String, UploadError>
where
    F: FnOnce() -> Result<String, String> + Send + 'static,
{
    tokio::task::spawn_blocking(extract)
        .await
        .map_err(|e| UploadError::Pdf(format!("PDF extraction aborted: {e}")))?
        .map_err(UploadError::Pdf)
}

/// Rejects empty text and text over `MAX_RESUME_CHARS`.
pub fn validate_resume_text(text: &str) -> Result<(), UploadError> {
    if text.trim().is_empty() {
        return Err(UploadError::Empty);
    }
    let chars = text.chars().count();
    if chars > MAX_RESUME_CHARS {
        return Err(UploadError::TooLong { chars });
    }
    Ok(())
}
