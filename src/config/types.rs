// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for rcloadenv.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, ApiConfig, CredentialsConfig, MergeConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::auth::RUNTIMECONFIG_SCOPE;
use crate::logging::LogLevel;

/// Default Runtime Config API root.
pub const DEFAULT_ENDPOINT: &str = "https://runtimeconfig.googleapis.com";

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console (stderr) output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. Empty disables file logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::INFO,
            log_file: None,
        }
    }
}

/// Runtime Config API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// API root, without the `v1beta1` version segment.
    pub endpoint: String,
    /// Project to read the config from. Empty means "discover".
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project: String,
    /// Requested page size; 0 leaves it to the server.
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project: String::new(),
            page_size: 0,
        }
    }
}

/// Credential discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialsConfig {
    /// OAuth scopes requested for the access token.
    pub scopes: Vec<String>,
    /// Fall back to the metadata server when nothing else is found.
    pub metadata: bool,
    /// Metadata server host. Empty means `$GCE_METADATA_HOST` or the
    /// well-known `metadata.google.internal`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metadata_host: String,
    /// Token endpoint override for key-file credentials.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token_uri: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            scopes: vec![RUNTIMECONFIG_SCOPE.to_string()],
            metadata: true,
            metadata_host: String::new(),
            token_uri: String::new(),
        }
    }
}

/// How fetched variables are merged into the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// Let remote values replace variables already in the environment.
    pub override_existing: bool,
    /// Only merge variables matching these names or glob patterns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub only: Vec<String>,
    /// Never merge variables matching these names or glob patterns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub except: Vec<String>,
}
