//! Extraction schema registry
//!
//! Every registry starts with the built-in `general` and `contract` schemas.
//! Further schemas are added with [`SchemaRegistry::register`] under a
//! [`SchemaKind::Custom`] name.

use crate::error::ExtractorError;
use lexcite_domain::{ExampleExtraction, ExtractionSchema, FewShotExample, SchemaKind};
use std::collections::BTreeMap;

/// Classes extracted by the `general` schema
pub const CLASSES_GENERAL: [&str; 8] = [
    "date",
    "monetary_amount",
    "party",
    "organization",
    "legal_reference",
    "obligation",
    "deadline",
    "condition",
];

/// Classes extracted by the `contract` schema
pub const CLASSES_CONTRACT: [&str; 10] = [
    "party",
    "effective_date",
    "expiry_date",
    "governing_law",
    "indemnity_cap",
    "liability_limitation",
    "confidentiality_period",
    "notice_period",
    "renewal_terms",
    "assignment_restriction",
];

/// Named extraction schemas
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<SchemaKind, ExtractionSchema>,
}

impl SchemaRegistry {
    /// Registry holding only the built-in schemas
    pub fn builtin() -> Self {
        let mut schemas = BTreeMap::new();
        schemas.insert(SchemaKind::General, general_schema());
        schemas.insert(SchemaKind::Contract, contract_schema());
        Self { schemas }
    }

    /// Add a schema, returning the one it replaced
    pub fn register(&mut self, kind: SchemaKind, schema: ExtractionSchema) -> Option<ExtractionSchema> {
        self.schemas.insert(kind, schema)
    }

    /// Look up a schema
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcite_extractor::SchemaRegistry;
    /// use lexcite_domain::SchemaKind;
    ///
    /// let registry = SchemaRegistry::builtin();
    /// assert!(registry.get(&SchemaKind::Contract).is_ok());
    /// assert!(registry.get(&SchemaKind::custom("lease")).is_err());
    /// ```
    pub fn get(&self, kind: &SchemaKind) -> Result<&ExtractionSchema, ExtractorError> {
        self.schemas
            .get(kind)
            .ok_or_else(|| ExtractorError::UnknownSchema {
                name: kind.as_str().to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered schema names, built-ins first
    pub fn names(&self) -> Vec<String> {
        self.schemas.keys().map(|k| k.as_str().to_string()).collect()
    }

    /// True if `kind` is registered
    pub fn contains(&self, kind: &SchemaKind) -> bool {
        self.schemas.contains_key(kind)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Catch-all schema for any legal document
fn general_schema() -> ExtractionSchema {
    ExtractionSchema {
        prompt_description: "Extract all dates, monetary amounts, party names, organization names, \
            legal references (statutes, case names, contract names), obligations, \
            deadlines, and conditions from this legal document. \
            Each extraction should include the exact text from the source."
            .to_string(),
        examples: vec![
            FewShotExample {
                text: "This Agreement is entered into as of January 15, 2024, \
                    by and between Acme Corporation and Beta Industries LLC. \
                    The total consideration shall be USD 2,500,000. \
                    All disputes shall be governed by the laws of the State of Delaware."
                    .to_string(),
                extractions: vec![
                    ExampleExtraction::new("date", "January 15, 2024", [("context", "agreement date")]),
                    ExampleExtraction::new("party", "Acme Corporation", [("role", "first party")]),
                    ExampleExtraction::new("party", "Beta Industries LLC", [("role", "second party")]),
                    ExampleExtraction::new(
                        "monetary_amount",
                        "USD 2,500,000",
                        [("context", "total consideration")],
                    ),
                    ExampleExtraction::new(
                        "legal_reference",
                        "laws of the State of Delaware",
                        [("type", "governing law")],
                    ),
                ],
            },
            FewShotExample {
                text: "Pursuant to Section 12(b) of the Securities Exchange Act of 1934, \
                    the Borrower shall repay the outstanding principal of EUR 1,000,000 \
                    no later than March 31, 2025. Failure to comply shall constitute \
                    an event of default under Clause 8.2."
                    .to_string(),
                extractions: vec![
                    ExampleExtraction::new(
                        "legal_reference",
                        "Section 12(b) of the Securities Exchange Act of 1934",
                        [("type", "statute")],
                    ),
                    ExampleExtraction::new(
                        "obligation",
                        "the Borrower shall repay the outstanding principal",
                        [("obligor", "Borrower")],
                    ),
                    ExampleExtraction::new(
                        "monetary_amount",
                        "EUR 1,000,000",
                        [("context", "outstanding principal")],
                    ),
                    ExampleExtraction::new(
                        "deadline",
                        "no later than March 31, 2025",
                        [("context", "repayment deadline")],
                    ),
                    ExampleExtraction::new(
                        "condition",
                        "Failure to comply shall constitute an event of default",
                        [("trigger", "non-repayment")],
                    ),
                    ExampleExtraction::new("legal_reference", "Clause 8.2", [("type", "contract clause")]),
                ],
            },
        ],
    }
}

/// Schema tailored for contracts and agreements
fn contract_schema() -> ExtractionSchema {
    ExtractionSchema {
        prompt_description: "Extract key contract terms: parties and their roles, effective date, \
            expiry or termination date, governing law, indemnity cap, liability \
            limitation, confidentiality period, notice period, renewal terms, \
            and assignment restrictions. Extract the exact text from the source."
            .to_string(),
        examples: vec![
            FewShotExample {
                text: "SERVICE AGREEMENT dated 1 April 2024 between GlobalTech Inc. \
                    (\"Provider\") and Meridian Holdings Ltd (\"Client\"). \
                    This Agreement shall remain in force until 31 March 2027 \
                    unless terminated earlier pursuant to Clause 14. \
                    The Provider's total aggregate liability shall not exceed \
                    the fees paid in the preceding 12-month period. \
                    This Agreement shall be governed by English law."
                    .to_string(),
                extractions: vec![
                    ExampleExtraction::new("party", "GlobalTech Inc.", [("role", "Provider")]),
                    ExampleExtraction::new("party", "Meridian Holdings Ltd", [("role", "Client")]),
                    ExampleExtraction::new("effective_date", "1 April 2024", []),
                    ExampleExtraction::new(
                        "expiry_date",
                        "31 March 2027",
                        [("condition", "unless terminated earlier pursuant to Clause 14")],
                    ),
                    ExampleExtraction::new(
                        "liability_limitation",
                        "total aggregate liability shall not exceed the fees paid in the preceding 12-month period",
                        [("party", "Provider")],
                    ),
                    ExampleExtraction::new("governing_law", "English law", []),
                ],
            },
            FewShotExample {
                text: "Either party may assign this Agreement with the prior written \
                    consent of the other party, such consent not to be unreasonably \
                    withheld. Confidential Information shall be protected for a \
                    period of five (5) years following termination. Any notice \
                    required shall be delivered in writing with 30 days advance notice."
                    .to_string(),
                extractions: vec![
                    ExampleExtraction::new(
                        "assignment_restriction",
                        "may assign this Agreement with the prior written consent of the other party",
                        [("condition", "consent not to be unreasonably withheld")],
                    ),
                    ExampleExtraction::new(
                        "confidentiality_period",
                        "five (5) years following termination",
                        [],
                    ),
                    ExampleExtraction::new("notice_period", "30 days advance notice", [("method", "in writing")]),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(registry.names(), vec!["general", "contract"]);
    }

    #[test]
    fn test_builtin_schemas_have_two_examples() {
        let registry = SchemaRegistry::builtin();
        for kind in SchemaKind::builtin() {
            let schema = registry.get(&kind).unwrap();
            assert!(!schema.prompt_description.is_empty());
            assert_eq!(schema.examples.len(), 2);
        }
    }

    #[test]
    fn test_example_extractions_occur_in_example_text() {
        let registry = SchemaRegistry::builtin();
        for kind in SchemaKind::builtin() {
            for example in &registry.get(&kind).unwrap().examples {
                for extraction in &example.extractions {
                    assert!(
                        example.text.contains(&extraction.text),
                        "{:?} not found in {} example",
                        extraction.text,
                        kind
                    );
                }
            }
        }
    }

    #[test]
    fn test_example_classes_belong_to_schema() {
        let registry = SchemaRegistry::builtin();
        let general = registry.get(&SchemaKind::General).unwrap();
        let contract = registry.get(&SchemaKind::Contract).unwrap();

        for e in general.examples.iter().flat_map(|x| &x.extractions) {
            assert!(CLASSES_GENERAL.contains(&e.class.as_str()));
        }
        for e in contract.examples.iter().flat_map(|x| &x.extractions) {
            assert!(CLASSES_CONTRACT.contains(&e.class.as_str()));
        }
    }

    #[test]
    fn test_unknown_schema() {
        let registry = SchemaRegistry::builtin();
        let err = registry.get(&SchemaKind::custom("lease")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown schema: 'lease'. Available: general, contract"
        );
    }

    #[test]
    fn test_register_custom_schema() {
        let mut registry = SchemaRegistry::builtin();
        let lease = ExtractionSchema {
            prompt_description: "Extract rent and term".to_string(),
            examples: vec![],
        };

        assert!(registry.register(SchemaKind::custom("lease"), lease.clone()).is_none());
        assert_eq!(registry.get(&SchemaKind::custom("lease")).unwrap(), &lease);
        assert_eq!(registry.names(), vec!["general", "contract", "lease"]);
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = SchemaRegistry::builtin();
        let replacement = ExtractionSchema {
            prompt_description: "Only parties".to_string(),
            examples: vec![],
        };

        let previous = registry.register(SchemaKind::General, replacement);
        assert!(previous.is_some());
        assert_eq!(
            registry.get(&SchemaKind::General).unwrap().prompt_description,
            "Only parties"
        );
    }
}
