// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! --log-level N     ← Console verbosity (0-6)
//! --file-log-level  ← File verbosity (defaults to --log-level)
//! --log-file FILE   ← global.log_file override
//! --debug           ← Same as --log-level 4
//!
//! Precedence: CLI flags > RCLOADENV_* > --config > rcloadenv.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::loader::ConfigLoader;
use crate::error::Result;
use crate::logging::LogLevel;

/// Options that shape logging and configuration loading.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times; later files win.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, defaults to the console level.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Shorthand for --log-level 4.
    #[arg(short = 'd', long = "debug", conflicts_with = "log_level")]
    pub debug: bool,
}

impl GlobalOptions {
    /// Effective console level requested on the command line, if any.
    #[must_use]
    pub fn console_level(&self) -> Option<u8> {
        self.log_level
            .or_else(|| self.debug.then_some(LogLevel::DEBUG.as_u8()))
    }

    /// Adds the config files and applies the logging flags to `loader`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be stored.
    pub fn apply(&self, mut loader: ConfigLoader) -> Result<ConfigLoader> {
        for path in &self.configs {
            loader = loader.add_toml_file(path);
        }

        if let Some(level) = self.console_level() {
            loader = loader.set("global.output_log_level", u64::from(level))?;
        }

        // file_log_level falls back to the console level if not specified
        if let Some(level) = self.file_log_level.or_else(|| self.console_level()) {
            loader = loader.set("global.file_log_level", u64::from(level))?;
        }

        if let Some(ref path) = self.log_file {
            loader = loader.set("global.log_file", path.display().to_string())?;
        }

        Ok(loader)
    }
}
