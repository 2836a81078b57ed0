//! Schema module - named extraction schemas

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of an extraction schema
///
/// The built-in schemas are plain variants so that callers match on them at
/// compile time. Additional schemas must be registered explicitly under a
/// [`SchemaKind::Custom`] name; parsing a string never produces one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaKind {
    /// Catch-all schema for any legal document
    General,

    /// Schema tailored to contracts and agreements
    Contract,

    /// Schema registered at runtime under this name
    Custom(String),
}

impl SchemaKind {
    /// Create a custom schema identifier
    pub fn custom(name: impl Into<String>) -> Self {
        SchemaKind::Custom(name.into())
    }

    /// Name used in cache keys and on the command line
    pub fn as_str(&self) -> &str {
        match self {
            SchemaKind::General => "general",
            SchemaKind::Contract => "contract",
            SchemaKind::Custom(name) => name,
        }
    }

    /// The schemas every registry ships with
    pub fn builtin() -> [SchemaKind; 2] {
        [SchemaKind::General, SchemaKind::Contract]
    }
}

impl Default for SchemaKind {
    fn default() -> Self {
        SchemaKind::General
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    /// Parse a built-in schema name
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcite_domain::SchemaKind;
    ///
    /// assert_eq!("Contract".parse::<SchemaKind>(), Ok(SchemaKind::Contract));
    /// assert!("nda".parse::<SchemaKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(SchemaKind::General),
            "contract" => Ok(SchemaKind::Contract),
            other => Err(format!(
                "Unknown schema: '{}'. Available: general, contract",
                other
            )),
        }
    }
}

/// One labeled span inside a few-shot example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleExtraction {
    /// Entity class
    pub class: String,

    /// Exact text from the example passage
    pub text: String,

    /// Annotations
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ExampleExtraction {
    /// Create an example extraction from attribute pairs
    pub fn new<const N: usize>(
        class: impl Into<String>,
        text: impl Into<String>,
        attributes: [(&str, &str); N],
    ) -> Self {
        Self {
            class: class.into(),
            text: text.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// A worked example shown to the extraction provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FewShotExample {
    /// Example passage
    pub text: String,

    /// Expected extractions for the passage
    pub extractions: Vec<ExampleExtraction>,
}

/// Prompt description plus few-shot examples for one schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSchema {
    /// Natural-language description of what to extract
    pub prompt_description: String,

    /// Worked examples
    pub examples: Vec<FewShotExample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_kind_round_trip() {
        for kind in SchemaKind::builtin() {
            assert_eq!(kind.as_str().parse::<SchemaKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_never_yields_custom() {
        assert!("custom".parse::<SchemaKind>().is_err());
        assert!("".parse::<SchemaKind>().is_err());
    }

    #[test]
    fn test_custom_name() {
        let kind = SchemaKind::custom("lease");
        assert_eq!(kind.as_str(), "lease");
        assert_eq!(kind.to_string(), "lease");
    }

    #[test]
    fn test_example_extraction_attributes() {
        let ex = ExampleExtraction::new("party", "Acme", [("role", "buyer")]);
        assert_eq!(ex.attributes.get("role").map(String::as_str), Some("buyer"));
    }
}
