//! Configuration for the Extraction Engine

use lexcite_domain::{ExtractionRequest, FewShotExample};
use serde::{Deserialize, Serialize};

/// Default extraction model
pub const DEFAULT_MODEL_ID: &str = "llama3.1";

/// Provider settings passed through to every extraction call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Model identifier handed to the provider
    pub model_id: String,

    /// API key for hosted providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Number of extraction passes per document
    pub passes: u32,

    /// Maximum characters sent to the model in one call
    pub max_char_buffer: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model_id.trim().is_empty() {
            return Err("model_id must not be empty".to_string());
        }
        if self.passes == 0 {
            return Err("passes must be greater than 0".to_string());
        }
        if self.max_char_buffer == 0 {
            return Err("max_char_buffer must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Build the provider request for one document
    pub fn request<'a>(
        &'a self,
        text: &'a str,
        prompt_description: &'a str,
        examples: &'a [FewShotExample],
    ) -> ExtractionRequest<'a> {
        ExtractionRequest {
            text,
            prompt_description,
            examples,
            model_id: &self.model_id,
            api_key: self.api_key.as_deref(),
            passes: self.passes,
            max_char_buffer: self.max_char_buffer,
        }
    }
}

impl Default for ExtractorConfig {
    /// Two passes over 2000-character windows
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_key: None,
            passes: 2,
            max_char_buffer: 2000,
        }
    }
}

impl ExtractorConfig {
    /// Quick preset: a single pass over large windows
    pub fn quick() -> Self {
        Self {
            passes: 1,
            max_char_buffer: 4000,
            ..Self::default()
        }
    }

    /// Thorough preset: more passes over smaller windows for better recall
    pub fn thorough() -> Self {
        Self {
            passes: 3,
            max_char_buffer: 1000,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.passes, 2);
        assert_eq!(config.max_char_buffer, 2000);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::quick().validate().is_ok());
        assert!(ExtractorConfig::thorough().validate().is_ok());
    }

    #[test]
    fn test_invalid_passes() {
        let config = ExtractorConfig {
            passes: 0,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_buffer_and_model() {
        let mut config = ExtractorConfig::default();
        config.max_char_buffer = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.model_id = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig {
            api_key: Some("secret".to_string()),
            ..ExtractorConfig::thorough()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("passes = 5").unwrap();
        assert_eq!(parsed.passes, 5);
        assert_eq!(parsed.model_id, DEFAULT_MODEL_ID);
        assert!(parsed.api_key.is_none());
    }

    #[test]
    fn test_request_borrows_settings() {
        let config = ExtractorConfig {
            api_key: Some("k".to_string()),
            ..ExtractorConfig::default()
        };
        let request = config.request("text", "describe", &[]);
        assert_eq!(request.model_id, DEFAULT_MODEL_ID);
        assert_eq!(request.api_key, Some("k"));
        assert_eq!(request.passes, 2);
    }
}
