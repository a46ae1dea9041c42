// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for rcloadenv using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! rcloadenv [global options] [run options] [CONFIG_NAME] -- COMMAND [ARGS]...
//! ```

pub mod global;
pub mod run;


use crate::cli::global::GlobalOptions;
use crate::cli::run::RunArgs;
use crate::config::loader::ConfigLoader;
use crate::error::Result;
use clap::Parser;

/// Local config file picked up from the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "rcloadenv.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "RCLOADENV";

/// Runtime Config environment loader
///
/// Loads the variables of a Google Cloud Runtime Config into the
/// environment and runs a command.
#[derive(Debug, Parser)]
#[command(
    name = "rcloadenv",
    author,
    version,
    about = "Load a Runtime Config into the environment and run a command",
    long_about = "rcloadenv Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Fetches every variable of a Runtime Configurator config, turns\n\
                  names like `db-host` into `DB_HOST` and runs the command with\n\
                  them in its environment. Variables already set are left alone\n\
                  unless --override is given.\n\n\
                  Invoking `rcloadenv my-config -- node server.js` runs node with\n\
                  the variables of `my-config` from the ambient project.",
    after_help = "CREDENTIALS:\n\n\
                  Credentials are discovered in this order: GOOGLE_OAUTH_ACCESS_TOKEN,\n\
                  a key file named by GOOGLE_APPLICATION_CREDENTIALS (or\n\
                  GOOGLE_CLOUD_KEYFILE, GCLOUD_KEYFILE), key file JSON in\n\
                  GOOGLE_CLOUD_KEYFILE_JSON (or GCLOUD_KEYFILE_JSON), the gcloud\n\
                  application default credentials file, and finally the metadata\n\
                  server. The project comes from --project, GOOGLE_CLOUD_PROJECT,\n\
                  GCLOUD_PROJECT, the credentials or the metadata server.\n\n\
                  CONFIG FILES:\n\n\
                  `rcloadenv.toml` in the current directory is loaded if present,\n\
                  then every --config file in order. RCLOADENV_* variables override\n\
                  files, e.g. RCLOADENV_API__ENDPOINT=http://localhost:8080."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Config and command
    #[command(flatten)]
    pub run: RunArgs,
}

impl Cli {
    /// Loader with every configuration layer, CLI flags on top.
    ///
    /// # Errors
    ///
    /// Returns an error if a flag cannot be stored as an override.
    pub fn config_loader(&self) -> Result<ConfigLoader> {
        let loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE);
        let loader = self.global.apply(loader)?.with_env_prefix(ENV_PREFIX);
        self.run.apply(loader)
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
