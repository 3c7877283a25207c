//! Text extraction for uploaded legal documents.
//!
//! One entry point, [`extract_text`], dispatches on the file extension:
//! PDF goes through a scoped temporary file and `pdf-extract`, DOCX through
//! `docx-rs`, TXT through UTF-8 decoding. Unrecognised extensions yield the
//! [`UNSUPPORTED_FORMAT`] sentinel rather than an error, so the caller can
//! still render a message for the upload.

mod docx;
mod pdf;
mod txt;

use thiserror::Error;
use tracing::debug;

/// Sentinel returned for file extensions this system does not parse.
pub const UNSUPPORTED_FORMAT: &str = "Unsupported file format.";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX parse failed: {0}")]
    Docx(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract the text of an uploaded document.
///
/// `file_name` is used only for its extension (case-insensitive). Extraction
/// runs exactly once per upload — no retries; malformed PDF/DOCX content
/// surfaces as an [`ExtractError`] for the caller to render.
pub fn extract_text(bytes: &[u8], file_name: &str) -> Result<String, ExtractError> {
    let ext = file_name.rsplit('.').next().unwrap_or("").to_lowercase();

    let text = match ext.as_str() {
        "pdf" => pdf::extract_pdf(bytes)?,
        "docx" => docx::extract_docx(bytes)?,
        "txt" => txt::extract_txt(bytes),
        other => {
            debug!(extension = %other, "unsupported upload extension");
            UNSUPPORTED_FORMAT.to_string()
        }
    };

    debug!(
        file = %file_name,
        chars = text.len(),
        "extracted document text"
    );
    Ok(text)
}
