// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session builder: ambient credentials and an authorized HTTP client.
//!
//! ```text
//! build_session(&SessionOptions, &Env)
//!        |
//!        v
//!   discovery::discover            (no network)
//!     1. GOOGLE_OAUTH_ACCESS_TOKEN   --> AccessToken
//!     2. key file path env vars      --> ServiceAccount | AuthorizedUser
//!     3. key file JSON env vars      --> ServiceAccount | AuthorizedUser
//!     4. gcloud well-known file      --> ServiceAccount | AuthorizedUser
//!     5. metadata server (optional)  --> Metadata
//!        |
//!        v
//!   project: option > GOOGLE_CLOUD_PROJECT > GCLOUD_PROJECT
//!            > key file project > metadata project-id
//!        |
//!        v
//!   (AuthorizedClient, ProjectId)
//!     token fetched on first request, cached for the run
//! ```

pub mod discovery;
pub mod keyfile;
pub mod metadata;

#[cfg(test)]
mod tests;

use bon::Builder;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::sync::OnceLock;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::Config;
use crate::core::env::container::Env;
use crate::error::{AuthError, RcResult};

use keyfile::{AuthorizedUserCredentials, ServiceAccountCredentials};
use metadata::MetadataCredentials;

/// OAuth scope for reading Runtime Config resources.
pub const RUNTIMECONFIG_SCOPE: &str = "https://www.googleapis.com/auth/cloudruntimeconfig";

/// Global HTTP client - initialized once, reused for token and API calls.
/// Falls back to a basic client if custom configuration fails.
pub fn http_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        let agent = format!("rcloadenv/{}", env!("CARGO_PKG_VERSION"));
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&agent) {
            headers.insert("x-goog-api-client", value);
        }
        Client::builder()
            .user_agent(agent)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// A bearer token and its advertised lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_in: Option<u64>,
}

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self {
            token: token.into(),
            expires_in,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Lifetime in seconds, if the issuer reported one.
    #[must_use]
    pub const fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[hidden]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// OAuth2 token endpoint response, shared by every token source.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.expires_in)
    }
}

/// Reads a token endpoint response, mapping failures to [`AuthError`].
pub(crate) async fn read_token_response(
    url: &str,
    response: reqwest::Response,
) -> Result<AccessToken, AuthError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(AuthError::TokenRequest {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str::<TokenResponse>(&body)
        .map(AccessToken::from)
        .map_err(|e| AuthError::InvalidTokenResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
}

/// A source of access tokens.
pub trait CredentialProvider {
    /// Short label for logs, e.g. `service_account`.
    fn kind(&self) -> &'static str;

    /// Project associated with the credentials, if any.
    fn project_id(&self) -> Option<&str>;

    /// Obtains a fresh access token.
    fn fetch_token(
        &self,
        http: &Client,
    ) -> impl Future<Output = Result<AccessToken, AuthError>> + Send;
}

/// An access token handed over through the environment.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken([hidden])")
    }
}

impl CredentialProvider for StaticToken {
    fn kind(&self) -> &'static str {
        "access_token"
    }

    fn project_id(&self) -> Option<&str> {
        None
    }

    async fn fetch_token(&self, _http: &Client) -> Result<AccessToken, AuthError> {
        Ok(AccessToken::new(self.token.clone(), None))
    }
}

/// Ambient credentials, one variant per discoverable source.
#[derive(Debug, Clone)]
pub enum Credentials {
    AccessToken(StaticToken),
    ServiceAccount(ServiceAccountCredentials),
    AuthorizedUser(AuthorizedUserCredentials),
    Metadata(MetadataCredentials),
}

impl CredentialProvider for Credentials {
    fn kind(&self) -> &'static str {
        match self {
            Self::AccessToken(c) => c.kind(),
            Self::ServiceAccount(c) => c.kind(),
            Self::AuthorizedUser(c) => c.kind(),
            Self::Metadata(c) => c.kind(),
        }
    }

    fn project_id(&self) -> Option<&str> {
        match self {
            Self::AccessToken(c) => c.project_id(),
            Self::ServiceAccount(c) => c.project_id(),
            Self::AuthorizedUser(c) => c.project_id(),
            Self::Metadata(c) => c.project_id(),
        }
    }

    async fn fetch_token(&self, http: &Client) -> Result<AccessToken, AuthError> {
        match self {
            Self::AccessToken(c) => c.fetch_token(http).await,
            Self::ServiceAccount(c) => c.fetch_token(http).await,
            Self::AuthorizedUser(c) => c.fetch_token(http).await,
            Self::Metadata(c) => c.fetch_token(http).await,
        }
    }
}

/// A non-empty project identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectId(String);

impl ProjectId {
    /// # Errors
    ///
    /// Returns `AuthError::NoProject` if `id` is empty or blank.
    pub fn new(id: impl Into<String>) -> Result<Self, AuthError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(AuthError::NoProject);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP client that attaches a bearer token to every request.
///
/// The token is fetched on the first request and reused afterwards; a run
/// never outlives a token.
pub struct AuthorizedClient<P = Credentials> {
    http: Client,
    provider: P,
    token: OnceCell<AccessToken>,
}

impl<P: CredentialProvider> AuthorizedClient<P> {
    #[must_use]
    pub fn new(http: Client, provider: P) -> Self {
        Self {
            http,
            provider,
            token: OnceCell::new(),
        }
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the cached token, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` if the credential source cannot issue a token.
    pub async fn access_token(&self) -> Result<&AccessToken, AuthError> {
        self.token
            .get_or_try_init(|| async {
                debug!(kind = self.provider.kind(), "fetching access token");
                self.provider.fetch_token(&self.http).await
            })
            .await
    }

    /// Starts an authorized GET request.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` if no token can be obtained.
    pub async fn get(&self, url: &str) -> Result<RequestBuilder, AuthError> {
        let token = self.access_token().await?;
        Ok(self.http.get(url).bearer_auth(token.as_str()))
    }
}

impl<P: fmt::Debug> fmt::Debug for AuthorizedClient<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedClient")
            .field("provider", &self.provider)
            .field("token_cached", &self.token.initialized())
            .finish_non_exhaustive()
    }
}

/// Inputs to [`build_session`].
#[derive(Debug, Clone, Builder)]
pub struct SessionOptions {
    /// OAuth scopes for the access token.
    #[builder(default = vec![RUNTIMECONFIG_SCOPE.to_string()])]
    scopes: Vec<String>,
    /// Explicit project; skips project discovery when set.
    project: Option<String>,
    /// Whether the metadata server is tried last.
    #[builder(default = true)]
    metadata: bool,
    /// Metadata host override (`host[:port]` or a full base URL).
    metadata_host: Option<String>,
    /// Token endpoint override for key-file credentials.
    token_uri: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SessionOptions {
    /// Session options from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self::builder()
            .scopes(config.credentials.scopes.clone())
            .maybe_project(non_empty(&config.api.project))
            .metadata(config.credentials.metadata)
            .maybe_metadata_host(non_empty(&config.credentials.metadata_host))
            .maybe_token_uri(non_empty(&config.credentials.token_uri))
            .build()
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    #[must_use]
    pub const fn metadata(&self) -> bool {
        self.metadata
    }

    #[must_use]
    pub fn metadata_host(&self) -> Option<&str> {
        self.metadata_host.as_deref()
    }

    #[must_use]
    pub fn token_uri(&self) -> Option<&str> {
        self.token_uri.as_deref()
    }
}

/// Discovers ambient credentials and the project to read from.
///
/// No token is requested here. The only network call is the metadata
/// `project-id` lookup, made when the metadata server is the credential
/// source and nothing else names a project.
///
/// # Errors
///
/// Returns `RcError::Authentication` if no credentials are found, a key file
/// is unusable, or no project can be determined.
pub async fn build_session(
    options: &SessionOptions,
    env: &Env,
) -> RcResult<(AuthorizedClient, ProjectId)> {
    let credentials = discovery::discover(options, env)?;
    debug!(kind = credentials.kind(), "discovered credentials");

    let http = http_client().clone();
    let project = match discovery::project_hint(options, env, &credentials) {
        Some(project) => project,
        None => match &credentials {
            Credentials::Metadata(metadata) => metadata.project_id_from_server(&http).await?,
            _ => return Err(AuthError::NoProject.into()),
        },
    };
    let project = ProjectId::new(project)?;
    debug!(%project, "resolved project");

    Ok((AuthorizedClient::new(http, credentials), project))
}
