// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runtime Configurator variable listing.
//!
//! ```text
//! VariableFetcher::new(&client, endpoint)
//!   .page_size(n)
//!        |
//!        v
//! GET {endpoint}/v1beta1/projects/{p}/configs/{c}/variables
//!     ?returnValues=true [&pageSize=n] [&pageToken=t]
//!        |                         ^
//!        |   nextPageToken         |
//!        +-------------------------+
//!        v
//! Variable { name, text | value }
//!   name  "projects/p/configs/c/variables/db-host" -> "db-host"
//!   text  used verbatim
//!   value base64 -> UTF-8
//!        |
//!        v
//! VariableMapping (BTreeMap short name -> value)
//! ```


use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::auth::{AuthorizedClient, CredentialProvider, ProjectId};
use crate::config::types::DEFAULT_ENDPOINT;
use crate::error::{ConfigError, DecodeError, RcResult, RemoteConfigError};

/// Decoded variables keyed by short name.
pub type VariableMapping = BTreeMap<String, String>;

/// One entry of a `variables.list` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Variable {
    /// Fully qualified resource name.
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Base64-encoded payload.
    #[serde(default)]
    pub value: Option<String>,
}

impl Variable {
    /// Last path segment of the resource name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Returns the variable's value.
    ///
    /// # Errors
    ///
    /// Returns a `DecodeError` if `value` is not base64 or not UTF-8, or if
    /// neither field is present.
    pub fn decode(&self) -> Result<String, DecodeError> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        let Some(value) = &self.value else {
            return Err(DecodeError::MissingValue {
                name: self.short_name().to_string(),
            });
        };
        let bytes = BASE64_STANDARD
            .decode(value)
            .map_err(|source| DecodeError::Base64 {
                name: self.short_name().to_string(),
                source,
            })?;
        String::from_utf8(bytes).map_err(|source| DecodeError::Utf8 {
            name: self.short_name().to_string(),
            source,
        })
    }
}

/// Body of a `variables.list` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVariablesResponse {
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Lists and decodes the variables of one config.
#[derive(Debug)]
pub struct VariableFetcher<'a, P = crate::auth::Credentials> {
    client: &'a AuthorizedClient<P>,
    endpoint: String,
    page_size: u32,
}

impl<'a, P: CredentialProvider> VariableFetcher<'a, P> {
    #[must_use]
    pub fn new(client: &'a AuthorizedClient<P>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            page_size: 0,
        }
    }

    /// Page size hint; 0 leaves it to the server.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// URL of the `variables` collection of a config.
    #[must_use]
    pub fn variables_url(&self, project: &ProjectId, config_name: &str) -> String {
        format!(
            "{}/v1beta1/projects/{project}/configs/{config_name}/variables",
            self.endpoint
        )
    }

    /// Fetches every variable of `config_name`, following pagination.
    ///
    /// # Errors
    ///
    /// Returns `RcError::Authentication` if no token can be obtained,
    /// `RcError::RemoteConfig` for HTTP or response failures and
    /// `RcError::Decode` for a value that cannot be decoded.
    pub async fn fetch(&self, project: &ProjectId, config_name: &str) -> RcResult<VariableMapping> {
        if config_name.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "run".to_string(),
                key: "config_name".to_string(),
            }
            .into());
        }

        let url = self.variables_url(project, config_name);
        let mut mapping = VariableMapping::new();
        let mut seen_tokens = HashSet::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(&url, page_token.as_deref()).await?;
            debug!(count = page.variables.len(), "received variables page");

            for variable in &page.variables {
                let short_name = variable.short_name();
                if short_name.is_empty() {
                    return Err(RemoteConfigError::InvalidResponse {
                        url,
                        message: format!("variable with empty name '{}'", variable.name),
                    }
                    .into());
                }
                let value = variable.decode()?;
                if mapping.insert(short_name.to_string(), value).is_some() {
                    warn!(variable = short_name, "duplicate variable name, keeping the later value");
                }
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if seen_tokens.insert(token.clone()) => page_token = Some(token),
                Some(token) => {
                    warn!(%token, "ignoring repeated page token");
                    break;
                }
                None => break,
            }
        }

        Ok(mapping)
    }

    async fn fetch_page(
        &self,
        url: &str,
        page_token: Option<&str>,
    ) -> RcResult<ListVariablesResponse> {
        let mut request = self
            .client
            .get(url)
            .await?
            .query(&[("returnValues", "true")]);
        if self.page_size > 0 {
            request = request.query(&[("pageSize", self.page_size)]);
        }
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await.map_err(RemoteConfigError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(RemoteConfigError::from)?;
        if !status.is_success() {
            return Err(RemoteConfigError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|e| {
            RemoteConfigError::InvalidResponse {
                url: url.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Fetches `config_name` from the public Runtime Config endpoint.
///
/// # Errors
///
/// See [`VariableFetcher::fetch`].
pub async fn fetch<P: CredentialProvider>(
    client: &AuthorizedClient<P>,
    project: &ProjectId,
    config_name: &str,
) -> RcResult<VariableMapping> {
    VariableFetcher::new(client, DEFAULT_ENDPOINT)
        .fetch(project, config_name)
        .await
}
