// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! JSON key files: service accounts and gcloud user credentials.
//!
//! ```text
//! { "type": "service_account", ... }
//!   --> RS256 JWT { iss, scope, aud=token_uri, iat, exp }
//!   --> POST token_uri  grant_type=jwt-bearer & assertion=<jwt>
//!
//! { "type": "authorized_user", ... }
//!   --> POST token_uri  grant_type=refresh_token & client_id & ...
//! ```

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AccessToken, CredentialProvider, Credentials, read_token_response};
use crate::error::AuthError;

/// Google's OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for service-account assertions, in seconds.
const ASSERTION_LIFETIME: u64 = 3600;

#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    project_id: Option<String>,
}

#[derive(Deserialize)]
struct AuthorizedUserKey {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    #[serde(default)]
    quota_project_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

#[derive(Deserialize)]
struct KeyFileKind {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Parses a JSON key file into credentials.
///
/// `source_name` only labels errors. `token_uri` overrides whatever
/// endpoint the file names.
///
/// # Errors
///
/// Returns `AuthError::InvalidKeyFile` for malformed JSON, missing fields or
/// an unusable private key, and `AuthError::UnsupportedCredentialType` for
/// any `type` other than `service_account` and `authorized_user`.
pub fn parse_key_file(
    json: &str,
    source_name: &str,
    scopes: &[String],
    token_uri: Option<&str>,
) -> Result<Credentials, AuthError> {
    let invalid = |message: String| AuthError::InvalidKeyFile {
        source_name: source_name.to_string(),
        message,
    };

    let kind: KeyFileKind = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
    match kind.kind.as_deref() {
        Some("service_account") => {
            let key: ServiceAccountKey =
                serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
            let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
                .map_err(|e| invalid(format!("private_key: {e}")))?;
            Ok(Credentials::ServiceAccount(ServiceAccountCredentials {
                client_email: key.client_email,
                signing_key,
                key_id: key.private_key_id,
                token_uri: pick_token_uri(token_uri, key.token_uri),
                project_id: key.project_id.filter(|p| !p.is_empty()),
                scope: scopes.join(" "),
            }))
        }
        Some("authorized_user") => {
            let key: AuthorizedUserKey =
                serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
            Ok(Credentials::AuthorizedUser(AuthorizedUserCredentials {
                client_id: key.client_id,
                client_secret: key.client_secret,
                refresh_token: key.refresh_token,
                token_uri: pick_token_uri(token_uri, key.token_uri),
                quota_project_id: key.quota_project_id.filter(|p| !p.is_empty()),
            }))
        }
        Some(other) => Err(AuthError::UnsupportedCredentialType {
            kind: other.to_string(),
            source_name: source_name.to_string(),
        }),
        None => Err(invalid("missing 'type' field".to_string())),
    }
}

fn pick_token_uri(explicit: Option<&str>, from_file: Option<String>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| from_file.filter(|u| !u.is_empty()))
        .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string())
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

/// Service-account key credentials.
#[derive(Clone)]
pub struct ServiceAccountCredentials {
    client_email: String,
    signing_key: EncodingKey,
    key_id: Option<String>,
    token_uri: String,
    project_id: Option<String>,
    scope: String,
}

impl ServiceAccountCredentials {
    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    #[must_use]
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Signs the JWT-bearer assertion exchanged for an access token.
    fn assertion(&self) -> Result<String, AuthError> {
        let iat = jsonwebtoken::get_current_timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: &self.scope,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key_id);
        Ok(jsonwebtoken::encode(&header, &claims, &self.signing_key)?)
    }
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl CredentialProvider for ServiceAccountCredentials {
    fn kind(&self) -> &'static str {
        "service_account"
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    async fn fetch_token(&self, http: &Client) -> Result<AccessToken, AuthError> {
        let assertion = self.assertion()?;
        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await?;
        read_token_response(&self.token_uri, response).await
    }
}

/// gcloud user credentials (`gcloud auth application-default login`).
#[derive(Clone)]
pub struct AuthorizedUserCredentials {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_uri: String,
    quota_project_id: Option<String>,
}

impl AuthorizedUserCredentials {
    #[must_use]
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }
}

impl fmt::Debug for AuthorizedUserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUserCredentials")
            .field("client_id", &self.client_id)
            .field("token_uri", &self.token_uri)
            .field("quota_project_id", &self.quota_project_id)
            .finish_non_exhaustive()
    }
}

impl CredentialProvider for AuthorizedUserCredentials {
    fn kind(&self) -> &'static str {
        "authorized_user"
    }

    fn project_id(&self) -> Option<&str> {
        self.quota_project_id.as_deref()
    }

    async fn fetch_token(&self, http: &Client) -> Result<AccessToken, AuthError> {
        let response = http
            .post(&self.token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
            ])
            .send()
            .await?;
        read_token_response(&self.token_uri, response).await
    }
}
