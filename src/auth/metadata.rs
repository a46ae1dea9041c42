// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Compute metadata server credentials (GCE, GKE, Cloud Run, ...).

use reqwest::Client;

use super::{AccessToken, CredentialProvider, read_token_response};
use crate::error::AuthError;

/// Metadata server host used when `GCE_METADATA_HOST` is unset.
pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
const PROJECT_PATH: &str = "/computeMetadata/v1/project/project-id";

/// Tokens issued to the default service account of the running instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataCredentials {
    base_url: String,
    scopes: Vec<String>,
}

impl MetadataCredentials {
    /// Credentials served by `host`.
    ///
    /// `host` is either `host[:port]`, reached over plain HTTP, or a full
    /// base URL such as `http://127.0.0.1:8080`.
    #[must_use]
    pub fn new(host: &str, scopes: &[String]) -> Self {
        let host = host.trim_end_matches('/');
        let base_url = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        Self {
            base_url,
            scopes: scopes.to_vec(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Asks the metadata server which project the instance belongs to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Transport` if the server is unreachable and
    /// `AuthError::TokenRequest` on a non-success status.
    pub async fn project_id_from_server(&self, http: &Client) -> Result<String, AuthError> {
        let url = format!("{}{PROJECT_PATH}", self.base_url);
        let response = http
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::TokenRequest {
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body.trim().to_string())
    }
}

impl CredentialProvider for MetadataCredentials {
    fn kind(&self) -> &'static str {
        "metadata"
    }

    fn project_id(&self) -> Option<&str> {
        None
    }

    async fn fetch_token(&self, http: &Client) -> Result<AccessToken, AuthError> {
        let url = format!("{}{TOKEN_PATH}", self.base_url);
        let scopes = self.scopes.join(",");
        let response = http
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .query(&[("scopes", scopes.as_str())])
            .send()
            .await?;
        read_token_response(&url, response).await
    }
}
