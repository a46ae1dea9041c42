// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Launching the target command with the merged environment.
//!
//! ```text
//! LaunchPlan::resolve(command, args, merged env)
//!   which(command) on the merged PATH
//!        |
//!        v
//! launch()
//!   unix:  exec, replaces this process (same PID)
//!   other: spawn, wait, exit with the child's code
//!          console interrupts go to the child
//! ```


use std::convert::Infallible;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::core::env::container::Env;
use crate::error::LaunchError;

/// Search path used when the merged environment has no `PATH`.
#[cfg(unix)]
pub const DEFAULT_SEARCH_PATH: &str = "/bin:/usr/bin";
#[cfg(not(unix))]
pub const DEFAULT_SEARCH_PATH: &str = "";

/// A resolved command, ready to replace the current process.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    command: OsString,
    program: PathBuf,
    args: Vec<OsString>,
    env: Env,
}

impl LaunchPlan {
    /// Resolves `command` against the `PATH` of `env`.
    ///
    /// Commands containing a path separator are taken relative to the
    /// current directory. Without a `PATH`, [`DEFAULT_SEARCH_PATH`] is used.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::NoCommand` for an empty command and
    /// `LaunchError::NotFound` if no executable matches.
    pub fn resolve<I, S>(command: &OsStr, args: I, env: Env) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        if command.is_empty() {
            return Err(LaunchError::NoCommand);
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let program = which::which_in(command, Some(search_path(&env)), cwd).map_err(|e| {
            debug!(command = %command.to_string_lossy(), error = %e, "command lookup failed");
            LaunchError::NotFound {
                command: command.to_string_lossy().into_owned(),
            }
        })?;
        debug!(program = %program.display(), "resolved command");

        Ok(Self {
            command: command.to_os_string(),
            program,
            args: args.into_iter().map(Into::into).collect(),
            env,
        })
    }

    /// Absolute path of the executable.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Environment the command will see.
    #[must_use]
    pub const fn env(&self) -> &Env {
        &self.env
    }

    /// The command as it will be started. Merged variables are applied over
    /// the inherited environment; nothing is removed from it.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).envs(self.env.iter());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.command);
        }
        cmd
    }

    /// Replaces the current process with the command.
    ///
    /// Returns only on failure.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Exec` if the process image cannot be replaced.
    #[cfg(unix)]
    #[allow(clippy::unused_async)]
    pub async fn launch(self) -> Result<Infallible, LaunchError> {
        use std::os::unix::process::CommandExt;

        debug!(program = %self.program.display(), "exec");
        let source = self.to_command().exec();
        Err(LaunchError::Exec {
            command: self.command.to_string_lossy().into_owned(),
            source,
        })
    }

    /// Runs the command and exits with its exit code.
    ///
    /// Returns only on failure.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Spawn` if the child cannot be started or waited on.
    #[cfg(not(unix))]
    pub async fn launch(self) -> Result<Infallible, LaunchError> {
        let command = self.command.to_string_lossy().into_owned();
        let spawn_error = |source| LaunchError::Spawn {
            command: command.clone(),
            source,
        };

        debug!(program = %self.program.display(), "spawn");
        let mut child = tokio::process::Command::from(self.to_command())
            .spawn()
            .map_err(spawn_error)?;

        // The child shares the console and handles interrupts itself.
        let status = loop {
            tokio::select! {
                status = child.wait() => break status.map_err(spawn_error)?,
                _ = tokio::signal::ctrl_c() => debug!("interrupt left to the child"),
            }
        };
        std::process::exit(status.code().unwrap_or(1))
    }
}

/// The `PATH` the command will be looked up on.
fn search_path(env: &Env) -> OsString {
    match env.get("PATH") {
        Some(path) => OsString::from(path),
        // Inherited unchanged, but not valid Unicode.
        None if env.contains("PATH") => std::env::var_os("PATH").unwrap_or_default(),
        None => OsString::from(DEFAULT_SEARCH_PATH),
    }
}
