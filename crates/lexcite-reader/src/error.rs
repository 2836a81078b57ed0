//! Error types for the document reader

use thiserror::Error;

/// Errors that can occur while reading a document
///
/// Every variant is a per-file read failure: ingestion records it as a
/// warning and moves on to the next file.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// Extension is not one of the supported formats
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    /// File could not be read from disk
    #[error("Read failed: {0}")]
    Read(#[from] std::io::Error),

    /// Text file is not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Encoding(String),

    /// PDF text extraction failed
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// DOCX (OOXML) extraction failed
    #[error("DOCX extraction failed: {0}")]
    Ooxml(String),
}
