//! Extension-based dispatch to the format extractors

use crate::docx::extract_docx;
use crate::error::ReaderError;
use lexcite_domain::Document;
use std::path::Path;
use tracing::debug;

/// Extensions the reader accepts (lower-case, with leading dot)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".docx", ".pdf", ".txt"];

/// Document formats the reader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Plain UTF-8 text
    Text,
    /// Portable Document Format
    Pdf,
    /// Word (OOXML) document
    Docx,
}

impl DocumentFormat {
    /// Pick the format from the path's lower-cased extension
    pub fn from_path(path: &Path) -> Result<Self, ReaderError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "txt" => Ok(DocumentFormat::Text),
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "" => Err(ReaderError::Unsupported("(no extension)".to_string())),
            other => Err(ReaderError::Unsupported(format!(".{}", other))),
        }
    }
}

/// Extract the plain text of a file
///
/// Returns an empty string for files without extractable text.
pub fn extract_text(path: &Path) -> Result<String, ReaderError> {
    let format = DocumentFormat::from_path(path)?;
    debug!("Reading {} as {:?}", path.display(), format);

    match format {
        DocumentFormat::Text => {
            let bytes = std::fs::read(path)?;
            String::from_utf8(bytes).map_err(|e| ReaderError::Encoding(e.to_string()))
        }
        DocumentFormat::Pdf => {
            let bytes = std::fs::read(path)?;
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ReaderError::Pdf(e.to_string()))
        }
        DocumentFormat::Docx => {
            let bytes = std::fs::read(path)?;
            extract_docx(&bytes)
        }
    }
}

/// Read a file into a [`Document`] named after the file
pub fn read_document(path: &Path) -> Result<Document, ReaderError> {
    let text = extract_text(path)?;
    Ok(Document::new(file_name(path), text))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
