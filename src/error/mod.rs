// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                RcError (~24 bytes)
//!                      |
//!   +--------+---------+--------+--------+--------+
//!   |        |         |        |        |        |
//!   v        v         v        v        v        v
//! Auth   Remote     Decode   Launch    Cfg    Io/Other
//!  Box     Box       Box      Box      Box    Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Auth    NoCredentials, NoProject, InvalidKeyFile, TokenRequest
//!   Remote  Http, Transport, InvalidResponse
//!   Decode  Base64, Utf8, MissingValue
//!   Launch  NoCommand, NotFound, Exec, Spawn
//!   Config  ParseError, MissingKey, InvalidValue
//! ```
//!
//! Every error is terminal: nothing is retried, `main` prints it and exits
//! with a non-zero status before any command is launched.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`RcError`].
pub type RcResult<T> = std::result::Result<T, RcError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum RcError {
    /// No usable credentials or project.
    #[error("authentication error: {0}")]
    Authentication(#[from] Box<AuthError>),

    /// The Runtime Config service answered with an error.
    #[error("runtime config error: {0}")]
    RemoteConfig(#[from] Box<RemoteConfigError>),

    /// A variable payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] Box<DecodeError>),

    /// The target command could not be launched.
    #[error("launch error: {0}")]
    Launch(#[from] Box<LaunchError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for RcError {
                fn from(err: $error) -> Self {
                    RcError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    AuthError => Authentication,
    RemoteConfigError => RemoteConfig,
    DecodeError => Decode,
    LaunchError => Launch,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Authentication Errors ---

/// Credential discovery and token acquisition errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Nothing in the discovery order yielded credentials.
    #[error("no ambient credentials found (tried {tried})")]
    NoCredentials { tried: String },

    /// No project could be associated with the credentials.
    #[error(
        "could not determine the project; pass --project or set GOOGLE_CLOUD_PROJECT"
    )]
    NoProject,

    /// A key file was named but could not be used.
    #[error("invalid credentials file '{source_name}': {message}")]
    InvalidKeyFile {
        source_name: String,
        message: String,
    },

    /// The key file has a `type` this tool cannot use.
    #[error("unsupported credentials type '{kind}' in '{source_name}'")]
    UnsupportedCredentialType { kind: String, source_name: String },

    /// The token endpoint rejected the grant.
    #[error("token request to {url} failed with status {status}: {body}")]
    TokenRequest {
        url: String,
        status: u16,
        body: String,
    },

    /// The token endpoint answered with something that is not a token.
    #[error("invalid token response from {url}: {message}")]
    InvalidTokenResponse { url: String, message: String },

    /// Signing the service-account assertion failed.
    #[error("failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Error from reqwest while talking to a token or metadata endpoint.
    #[error("credential endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

// --- Remote Config Errors ---

/// Errors returned while listing variables.
#[derive(Debug, Error)]
pub enum RemoteConfigError {
    /// Non-success HTTP status.
    #[error("http error {status} from {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    /// Error from reqwest library.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the list-variables schema.
    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

// --- Decode Errors ---

/// Errors decoding a variable value.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// `value` is not valid standard base64.
    #[error("variable '{name}' has an invalid base64 value: {source}")]
    Base64 {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Decoded bytes are not UTF-8.
    #[error("variable '{name}' is not valid UTF-8: {source}")]
    Utf8 {
        name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Neither `text` nor `value` was returned.
    #[error("variable '{name}' has neither a text nor a value field")]
    MissingValue { name: String },
}

// --- Launch Errors ---

/// Errors launching the target command.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// No command was given after `--`.
    #[error("no command given")]
    NoCommand,

    /// Executable not found in PATH.
    #[error("command not found: '{command}'")]
    NotFound { command: String },

    /// Process image replacement failed.
    #[error("failed to execute '{command}': {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Spawning the child process failed (non-Unix launch path).
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
