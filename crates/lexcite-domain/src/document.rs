//! Document module - the unit handed from the reader to extraction

use serde::{Deserialize, Serialize};

/// A named block of plain text extracted from one source file
///
/// Documents are immutable once created; `name` is the source file name
/// (not the full path) and is the identifier citations refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// File name of the source, e.g. `contract.pdf`
    pub name: String,

    /// Full extracted text
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// True when the document has no non-whitespace text
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcite_domain::Document;
    ///
    /// assert!(Document::new("a.txt", "  \n\t").is_blank());
    /// assert!(!Document::new("a.txt", "Hello").is_blank());
    /// ```
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
