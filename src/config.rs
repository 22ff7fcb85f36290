// Audit configuration
//
// Reporting knobs only. The attribution rules themselves (first-party
// exclusion, cutoff comparison) are fixed.

use crate::opportunity::DEFAULT_MIN_SUB_ITEM_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating an [`AuditConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the facade audit
///
/// # Example
/// ```
/// use facade_finder::config::AuditConfig;
///
/// let config = AuditConfig::default();
/// assert_eq!(config.min_sub_item_size, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Sub-items below this many bytes are folded into one trailing row.
    ///
    /// Set to 0 to list every resource individually.
    pub min_sub_item_size: u64,

    /// Label of the folded row in reports
    pub other_resources_label: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            min_sub_item_size: DEFAULT_MIN_SUB_ITEM_SIZE,
            other_resources_label: "Other resources".to_string(),
        }
    }
}

impl AuditConfig {
    /// List every attributed resource, no condensation
    pub fn verbose() -> Self {
        Self {
            min_sub_item_size: 0,
            ..Self::default()
        }
    }

    /// Load from a TOML file; missing keys fall back to defaults
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.other_resources_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "other_resources_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
