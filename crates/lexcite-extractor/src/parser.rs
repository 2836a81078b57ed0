//! Parse LLM output into span candidates

use crate::error::ExtractorError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// A span proposed by the model, before it is located in the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanCandidate {
    /// Entity class
    pub class: String,
    /// Text the model claims to have found
    pub text: String,
    /// Annotations
    pub attributes: BTreeMap<String, String>,
}

/// Parse LLM JSON response into span candidates
///
/// Items that are not objects with string `class` and `text` fields are
/// skipped with a warning.
pub fn parse_llm_response(response: &str) -> Result<Vec<SpanCandidate>, ExtractorError> {
    // LLMs sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let items = json
        .as_array()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON array".to_string()))?;

    let mut candidates = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match parse_candidate_json(item) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!("Failed to parse extraction {}: {}", idx, e),
        }
    }

    Ok(candidates)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence and, when present, the closing one
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse a single candidate from JSON
fn parse_candidate_json(json: &Value) -> Result<SpanCandidate, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Extraction is not a JSON object".to_string())?;

    let class = obj
        .get("class")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| "Missing or invalid 'class'".to_string())?
        .to_string();

    let text = obj
        .get("text")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing or invalid 'text'".to_string())?
        .to_string();

    let attributes = match obj.get("attributes") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect(),
        Some(_) => return Err("'attributes' must be an object".to_string()),
    };

    Ok(SpanCandidate {
        class,
        text,
        attributes,
    })
}
