// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for rcloadenv.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. rcloadenv.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. RCLOADENV_* env vars
//! 5. CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! Sections are separated by a double underscore so that keys containing
//! a single underscore stay addressable.
//!
//! ```text
//! RCLOADENV_API__ENDPOINT=http://…        → api.endpoint
//! RCLOADENV_API__PAGE_SIZE=50             → api.page_size
//! RCLOADENV_MERGE__OVERRIDE_EXISTING=true → merge.override_existing
//! RCLOADENV_MERGE__ONLY=db-*,cache-host   → merge.only
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::env::merge::{MergeOptions, VariableFilter};
use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{ApiConfig, CredentialsConfig, GlobalConfig, MergeConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Runtime Config API options.
    pub api: ApiConfig,
    /// Credential discovery options.
    pub credentials: CredentialsConfig,
    /// Environment merge options.
    pub merge: MergeConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rcloadenv::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("rcloadenv.toml")
    ///     .with_env_prefix("RCLOADENV")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for an unparseable endpoint,
    /// an empty scope list, or an invalid `only`/`except` pattern.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if let Err(e) = reqwest::Url::parse(&self.api.endpoint) {
            return Err(ConfigError::InvalidValue {
                section: "api".to_string(),
                key: "endpoint".to_string(),
                message: format!("'{}' is not a valid URL: {e}", self.api.endpoint),
            });
        }
        if self.credentials.scopes.is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "credentials".to_string(),
                key: "scopes".to_string(),
                message: "at least one scope is required".to_string(),
            });
        }
        self.merge_options().map(|_| ())
    }

    /// Build the merge options described by the `[merge]` section.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` if a pattern is not a valid glob.
    pub fn merge_options(&self) -> std::result::Result<MergeOptions, ConfigError> {
        let filter = VariableFilter::new(self.merge.only.clone(), self.merge.except.clone())?;
        Ok(MergeOptions::new(self.merge.override_existing, filter))
    }
}
