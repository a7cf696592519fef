//! Runtime settings for the assistant and its backend.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::kernel::state::DEFAULT_CONFIDENCE_THRESHOLD;

pub const BACKEND_URL_VAR: &str = "PLANITEC_BACKEND_URL";
pub const BACKEND_KEY_VAR: &str = "PLANITEC_BACKEND_KEY";
pub const MATERIALS_TABLE_VAR: &str = "PLANITEC_MATERIALS_TABLE";
pub const CATALOG_FILE_VAR: &str = "PLANITEC_CATALOG_FILE";

const DEFAULT_MATERIALS_TABLE: &str = "materials";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Minimum extractor confidence (exclusive) to open a material dialogue.
    pub confidence_threshold: f32,
    pub submission_delay_ms: u64,
    pub merge_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            submission_delay_ms: 800,
            merge_delay_ms: 600,
        }
    }
}

impl AssistantConfig {
    /// No artificial delays.
    pub fn instant() -> Self {
        Self {
            submission_delay_ms: 0,
            merge_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn submission_delay(&self) -> Duration {
        Duration::from_millis(self.submission_delay_ms)
    }

    pub fn merge_delay(&self) -> Duration {
        Duration::from_millis(self.merge_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub materials_table: String,
}

impl BackendConfig {
    /// `Ok(None)` when no backend URL is configured.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let Some(base_url) = lookup(BACKEND_URL_VAR).filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: BACKEND_URL_VAR,
                value: base_url,
            });
        }
        let api_key = lookup(BACKEND_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(BACKEND_KEY_VAR))?;
        let materials_table = lookup(MATERIALS_TABLE_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MATERIALS_TABLE.to_string());

        Ok(Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            materials_table,
        }))
    }
}

pub fn catalog_file_from_env() -> Option<String> {
    std::env::var(CATALOG_FILE_VAR).ok().filter(|v| !v.trim().is_empty())
}

/// Read a JSON catalog snapshot.
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid catalog JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_no_backend_without_url() {
        assert_eq!(BackendConfig::from_lookup(env(&[])), Ok(None));
    }

    #[test]
    fn test_backend_defaults_table() {
        let config = BackendConfig::from_lookup(env(&[
            (BACKEND_URL_VAR, "https://abc.example.co/"),
            (BACKEND_KEY_VAR, "secret"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.base_url, "https://abc.example.co");
        assert_eq!(config.materials_table, "materials");
    }

    #[test]
    fn test_backend_requires_key() {
        let result = BackendConfig::from_lookup(env(&[(BACKEND_URL_VAR, "https://abc.example.co")]));
        assert_eq!(result, Err(ConfigError::Missing(BACKEND_KEY_VAR)));
    }

    #[test]
    fn test_backend_rejects_bare_host() {
        let result = BackendConfig::from_lookup(env(&[
            (BACKEND_URL_VAR, "abc.example.co"),
            (BACKEND_KEY_VAR, "secret"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_assistant_config_partial_json() {
        let config: AssistantConfig = serde_json::from_str(r#"{"merge_delay_ms": 10}"#).unwrap();
        assert_eq!(config.merge_delay_ms, 10);
        assert_eq!(config.submission_delay_ms, 800);
        assert_eq!(config.confidence_threshold, 0.4);
    }
}
