//! Console configuration

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration shared by the web app and the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Document store origin, e.g. `https://crm.example.com`
    pub api_base_url: String,

    /// Application base prefix stripped before path matching (`/crm`, or empty)
    pub base_prefix: String,

    /// Exception-kind marker that identifies an authentication failure
    pub auth_sentinel: String,

    /// Event bus channel capacity
    pub event_capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            base_prefix: String::new(),
            auth_sentinel: "AuthenticationError".to_string(),
            event_capacity: 64,
        }
    }
}

impl ConsoleConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(CoreError::invalid_config(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
        };
        let config: Self = toml::from_str(&content).map_err(|e| {
            CoreError::invalid_config(format!("{}: {}", path.display(), e.message()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.auth_sentinel.trim().is_empty() {
            return Err(CoreError::invalid_config("auth_sentinel must not be empty"));
        }
        if !self.base_prefix.is_empty()
            && (!self.base_prefix.starts_with('/') || self.base_prefix.ends_with('/'))
        {
            return Err(CoreError::invalid_config(format!(
                "base_prefix must start with '/' and not end with '/': {:?}",
                self.base_prefix
            )));
        }
        Ok(())
    }
}
