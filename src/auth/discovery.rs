// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Application default credential discovery.
//!
//! Reads only the environment snapshot and the local filesystem. The first
//! source that is present wins; a present but unusable key file is an error
//! rather than a reason to keep looking.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::keyfile::parse_key_file;
use super::metadata::{DEFAULT_METADATA_HOST, MetadataCredentials};
use super::{CredentialProvider, Credentials, SessionOptions, StaticToken};
use crate::core::env::container::Env;
use crate::error::AuthError;

/// Access token handed over directly.
pub const ACCESS_TOKEN_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Variables naming a key file on disk, in lookup order.
pub const KEY_FILE_PATH_VARS: [&str; 3] = [
    "GOOGLE_APPLICATION_CREDENTIALS",
    "GOOGLE_CLOUD_KEYFILE",
    "GCLOUD_KEYFILE",
];

/// Variables holding key file JSON inline, in lookup order.
pub const KEY_FILE_JSON_VARS: [&str; 2] = ["GOOGLE_CLOUD_KEYFILE_JSON", "GCLOUD_KEYFILE_JSON"];

/// Variables naming the project, in lookup order.
pub const PROJECT_VARS: [&str; 2] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];

/// Overrides the metadata server host.
pub const METADATA_HOST_VAR: &str = "GCE_METADATA_HOST";

const WELL_KNOWN_FILE: &str = "application_default_credentials.json";

/// Finds the first available credential source.
///
/// # Errors
///
/// Returns `AuthError::NoCredentials` listing every source tried, or the
/// key file error of the first key file found.
pub fn discover(options: &SessionOptions, env: &Env) -> Result<Credentials, AuthError> {
    let mut tried = Vec::new();

    if let Some(token) = env.get_non_empty(ACCESS_TOKEN_VAR) {
        debug!(source = ACCESS_TOKEN_VAR, "using access token");
        return Ok(Credentials::AccessToken(StaticToken::new(token)));
    }
    tried.push(ACCESS_TOKEN_VAR.to_string());

    for var in KEY_FILE_PATH_VARS {
        if let Some(path) = env.get_non_empty(var) {
            debug!(source = var, path, "using key file");
            return read_key_file(&PathBuf::from(path), options);
        }
        tried.push(var.to_string());
    }

    for var in KEY_FILE_JSON_VARS {
        if let Some(json) = env.get_non_empty(var) {
            debug!(source = var, "using inline key file");
            return parse_key_file(json, var, options.scopes(), options.token_uri());
        }
        tried.push(var.to_string());
    }

    match well_known_file(env) {
        Some(path) if path.is_file() => {
            debug!(path = %path.display(), "using gcloud application default credentials");
            return read_key_file(&path, options);
        }
        Some(path) => tried.push(path.display().to_string()),
        None => tried.push(WELL_KNOWN_FILE.to_string()),
    }

    if options.metadata() {
        let host = options
            .metadata_host()
            .or_else(|| env.get_non_empty(METADATA_HOST_VAR))
            .unwrap_or(DEFAULT_METADATA_HOST);
        debug!(host, "falling back to metadata server");
        return Ok(Credentials::Metadata(MetadataCredentials::new(
            host,
            options.scopes(),
        )));
    }
    tried.push("metadata server (disabled)".to_string());

    Err(AuthError::NoCredentials {
        tried: tried.join(", "),
    })
}

fn read_key_file(path: &Path, options: &SessionOptions) -> Result<Credentials, AuthError> {
    let source_name = path.display().to_string();
    let json = std::fs::read_to_string(path).map_err(|e| AuthError::InvalidKeyFile {
        source_name: source_name.clone(),
        message: e.to_string(),
    })?;
    parse_key_file(&json, &source_name, options.scopes(), options.token_uri())
}

/// Location of the gcloud application default credentials file.
///
/// `$CLOUDSDK_CONFIG` wins; otherwise `%APPDATA%\gcloud` on Windows and
/// `$HOME/.config/gcloud` elsewhere.
#[must_use]
pub fn well_known_file(env: &Env) -> Option<PathBuf> {
    let dir = if let Some(dir) = env.get_non_empty("CLOUDSDK_CONFIG") {
        PathBuf::from(dir)
    } else if cfg!(windows) {
        PathBuf::from(env.get_non_empty("APPDATA")?).join("gcloud")
    } else {
        PathBuf::from(env.get_non_empty("HOME")?)
            .join(".config")
            .join("gcloud")
    };
    Some(dir.join(WELL_KNOWN_FILE))
}

/// Project named without asking the network.
///
/// Order: explicit option, `GOOGLE_CLOUD_PROJECT`, `GCLOUD_PROJECT`, then
/// whatever the credentials carry.
#[must_use]
pub fn project_hint(options: &SessionOptions, env: &Env, credentials: &Credentials) -> Option<String> {
    if let Some(project) = options.project().filter(|p| !p.trim().is_empty()) {
        trace!(project, "project from options");
        return Some(project.to_string());
    }
    for var in PROJECT_VARS {
        if let Some(project) = env.get_non_empty(var) {
            trace!(project, source = var, "project from environment");
            return Some(project.to_string());
        }
    }
    credentials.project_id().map(str::to_string)
}
