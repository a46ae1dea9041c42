// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for loading a config and launching the command.

use clap::Args;
use std::ffi::OsString;

use crate::config::loader::ConfigLoader;
use crate::error::Result;

/// Which config to load and what to run with it.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Runtime config to load. Without one, the command runs with the
    /// current environment.
    #[arg(value_name = "CONFIG_NAME", env = "GOOGLE_RUNTIME_CONFIG_NAME")]
    pub config_name: Option<String>,

    /// Project owning the config (default: discovered from the environment).
    #[arg(short = 'p', long = "project", value_name = "PROJECT")]
    pub project: Option<String>,

    /// Only load these variables (names or globs, comma-separated).
    #[arg(short = 'O', long = "only", value_name = "NAMES", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub only: Vec<String>,

    /// Never load these variables (names or globs, comma-separated).
    #[arg(short = 'E', long = "except", value_name = "NAMES", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub except: Vec<String>,

    /// Let config values replace variables already set in the environment.
    #[arg(short = 'o', long = "override")]
    pub override_existing: bool,

    /// Print `export NAME='value'` lines instead of running a command.
    #[arg(long)]
    pub export: bool,

    /// Command to run, followed by its arguments.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<OsString>,
}

impl RunArgs {
    /// The config name, ignoring an empty one.
    #[must_use]
    pub fn config_name(&self) -> Option<&str> {
        self.config_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Applies the flags that have a config counterpart to `loader`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be stored.
    pub fn apply(&self, mut loader: ConfigLoader) -> Result<ConfigLoader> {
        if let Some(ref project) = self.project {
            loader = loader.set("api.project", project.as_str())?;
        }
        if !self.only.is_empty() {
            loader = loader.set("merge.only", self.only.clone())?;
        }
        if !self.except.is_empty() {
            loader = loader.set("merge.except", self.except.clone())?;
        }
        if self.override_existing {
            loader = loader.set("merge.override_existing", true)?;
        }
        Ok(loader)
    }
}
