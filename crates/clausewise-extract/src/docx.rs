//! DOCX text extraction.
//!
//! A .docx file is a ZIP of XML parts; `docx-rs` exposes the document tree
//! as Document → Paragraph → Run → Text. We collect the text leaves and
//! join paragraphs with newlines so the clause splitter sees one paragraph
//! per line.

use docx_rs::{DocumentChild, ParagraphChild, RunChild, read_docx};

use crate::ExtractError;

pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = read_docx(bytes).map_err(|e| ExtractError::Docx(format!("{e:?}")))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(para) = child {
            let text = paragraph_text(para);
            if !text.trim().is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Concatenate the text runs of one paragraph. Runs within a paragraph are
/// fragments of the same sentence, so no separator is inserted.
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut parts = Vec::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    parts.push(t.text.clone());
                }
            }
        }
    }
    parts.concat()
}
