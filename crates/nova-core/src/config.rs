//! Runtime configuration.

use std::{env, time::Duration};

use serde::{Deserialize, Serialize};

pub use crate::layout::LayoutConfig;

/// Storage key under which a session is persisted unless overridden.
pub const DEFAULT_SESSION_KEY: &str = "novaminds_project_cache_v1";

/// Environment variables checked for the hosted-model API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Overrides the hosted-model base URL.
pub const BASE_URL_VAR: &str = "NOVA_GEMINI_BASE_URL";

/// Hosted-model capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; requests fail with a missing-key error when absent
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "planning-model")]
    pub planning_model: String,

    #[serde(rename = "synthesis-model")]
    pub synthesis_model: String,

    #[serde(rename = "validation-model")]
    pub validation_model: String,

    #[serde(rename = "design-model")]
    pub design_model: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Retries for transient HTTP failures (5xx, 429, network)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            planning_model: "gemini-2.5-pro".to_string(),
            synthesis_model: "gemini-2.5-pro".to_string(),
            validation_model: "gemini-2.5-flash".to_string(),
            design_model: "gemini-2.5-flash".to_string(),
            timeout_ms: 300_000,
            max_retries: 2,
        }
    }
}

impl GeminiConfig {
    /// Defaults with the API key and base URL taken from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.trim().is_empty());
        if let Some(base_url) = env::var(BASE_URL_VAR).ok().filter(|url| !url.trim().is_empty()) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::default();
        assert_eq!(config.planning_model, "gemini-2.5-pro");
        assert_eq!(config.validation_model, "gemini-2.5-flash");
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_builders() {
        let config = GeminiConfig::default()
            .with_api_key("secret")
            .with_base_url("http://localhost:9999");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_api_key_never_serialized() {
        let config = GeminiConfig::default().with_api_key("secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"planning-model\""));
    }
}
