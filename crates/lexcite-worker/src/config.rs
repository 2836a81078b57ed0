//! Configuration for background tasks

use lexcite_domain::SchemaKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by the task runner and the loop that polls its results
///
/// # Examples
///
/// ```
/// use lexcite_worker::WorkerConfig;
///
/// let config = WorkerConfig::from_toml(
///     r#"
///     poll_interval_ms = 250
///     provider_timeout_secs = 60
///     extraction_enabled = true
///     schema = "contract"
///     "#,
/// )
/// .unwrap();
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.provider_timeout().unwrap().as_secs(), 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// How often the coordinator drains the result channel (milliseconds)
    pub poll_interval_ms: u64,

    /// Deadline for a single provider call in seconds; unset means unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_timeout_secs: Option<u64>,

    /// Run structured extraction during ingestion
    pub extraction_enabled: bool,

    /// Extraction schema name
    pub schema: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            provider_timeout_secs: None,
            extraction_enabled: false,
            schema: SchemaKind::General.to_string(),
        }
    }
}

impl WorkerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".to_string());
        }
        if self.provider_timeout_secs == Some(0) {
            return Err("provider_timeout_secs must be greater than 0 when set".to_string());
        }
        self.schema_kind().map(|_| ())
    }

    /// Poll interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Provider deadline, if any
    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_secs.map(Duration::from_secs)
    }

    /// The configured schema
    pub fn schema_kind(&self) -> Result<SchemaKind, String> {
        self.schema.parse()
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
