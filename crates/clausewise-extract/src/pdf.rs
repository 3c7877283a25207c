//! PDF text extraction through a scoped temporary file.

use std::io::Write;

use crate::ExtractError;

/// Extract the concatenated text of every page, in page order.
///
/// The parser wants a file path, so the upload bytes are spilled to a
/// [`tempfile::NamedTempFile`]; the file is removed on drop whether
/// extraction succeeds or fails.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut tmp = tempfile::NamedTempFile::new()?;
    tmp.write_all(bytes)?;
    tmp.flush()?;

    let text =
        pdf_extract::extract_text(tmp.path()).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(text)
}
