//! Lexcite Document Reader
//!
//! Turns a file path into plain text. Dispatch is purely by lower-cased
//! extension; there is no content sniffing.
//!
//! | Extension | Extractor |
//! |-----------|-----------|
//! | `.txt`    | UTF-8 read |
//! | `.pdf`    | `pdf-extract`, pages joined by newlines |
//! | `.docx`   | `zip` + `quick-xml`, one line per non-blank paragraph |
//!
//! A file with no extractable text is not an error: the reader returns an
//! empty string and ingestion decides what to do with it.
//!
//! # Example
//!
//! ```no_run
//! use lexcite_reader::read_document;
//! use std::path::Path;
//!
//! let doc = read_document(Path::new("contracts/msa.docx"))?;
//! println!("{}: {} chars", doc.name, doc.text.chars().count());
//! # Ok::<(), lexcite_reader::ReaderError>(())
//! ```

#![warn(missing_docs)]

mod docx;
mod error;
mod reader;

pub use error::ReaderError;
pub use reader::{extract_text, read_document, DocumentFormat, SUPPORTED_EXTENSIONS};
