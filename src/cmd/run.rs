// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Load a config, merge it, and prepare the command.
//!
//! ```text
//! run_command(args, config, ambient)
//!   no COMMAND and no --export --> LaunchError::NoCommand (before any request)
//!   no CONFIG_NAME --> ambient env unchanged
//!   CONFIG_NAME    --> build_session --> fetch --> merge_variables
//!        |
//!        +-- --export --> RunOutcome::Exported("export NAME='value'\n...")
//!        +-- else     --> RunOutcome::Launch(LaunchPlan)
//! ```

use anyhow::Context;
use std::fmt::Write as _;
use tracing::{debug, info, warn};

use crate::auth::{SessionOptions, build_session};
use crate::cli::run::RunArgs;
use crate::config::Config;
use crate::core::env::container::Env;
use crate::core::env::merge::{MergeAction, MergeOptions, MergeOutcome, merge_variables};
use crate::core::process::LaunchPlan;
use crate::error::{LaunchError, Result};
use crate::runtimeconfig::{VariableFetcher, VariableMapping};

/// What `main` should do next.
#[derive(Debug)]
pub enum RunOutcome {
    /// Replace the process with this command.
    Launch(LaunchPlan),
    /// Print this text and exit.
    Exported(String),
}

/// Main handler: everything up to, but excluding, the launch.
///
/// # Errors
///
/// Returns an error if credentials, the project, the config or the command
/// cannot be resolved. Nothing has been launched when this fails.
pub async fn run_command(args: &RunArgs, config: &Config, ambient: &Env) -> Result<RunOutcome> {
    if args.command.is_empty() && !args.export {
        return Err(LaunchError::NoCommand.into());
    }

    let outcome = match args.config_name() {
        Some(config_name) => {
            let variables = load_variables(config_name, config, ambient).await?;
            merge_variables(ambient, &variables, &config.merge_options()?)
        }
        None => {
            debug!("no config name given, keeping the current environment");
            merge_variables(ambient, &VariableMapping::new(), &MergeOptions::default())
        }
    };
    debug!(
        added = outcome.count(MergeAction::Added),
        overridden = outcome.count(MergeAction::Overridden),
        kept = outcome.count(MergeAction::KeptExisting),
        filtered = outcome.count(MergeAction::Filtered),
        "merged config variables"
    );

    if args.export {
        return Ok(RunOutcome::Exported(render_exports(&outcome)));
    }

    let (command, rest) = args.command.split_first().ok_or(LaunchError::NoCommand)?;
    let plan = LaunchPlan::resolve(command, rest.iter().cloned(), outcome.into_env())?;
    Ok(RunOutcome::Launch(plan))
}

/// Fetches and decodes every variable of `config_name`.
///
/// # Errors
///
/// Returns an error if no session can be built or the fetch fails.
pub async fn load_variables(
    config_name: &str,
    config: &Config,
    ambient: &Env,
) -> Result<VariableMapping> {
    let options = SessionOptions::from_config(config);
    let (client, project) = build_session(&options, ambient)
        .await
        .context("failed to set up Google Cloud credentials")?;

    info!("fetching runtime configuration {config_name} from {project}");
    let variables = VariableFetcher::new(&client, config.api.endpoint.as_str())
        .page_size(config.api.page_size)
        .fetch(&project, config_name)
        .await
        .with_context(|| format!("failed to load runtime configuration '{config_name}'"))?;
    debug!(count = variables.len(), "fetched config variables");
    Ok(variables)
}

/// `export` lines for every variable the merge wrote.
///
/// Names a POSIX shell cannot export (such as `DB.HOST`) are skipped with a
/// warning so the remaining lines still take effect.
#[must_use]
pub fn render_exports(outcome: &MergeOutcome) -> String {
    outcome
        .applied()
        .fold(String::new(), |mut out, (name, value)| {
            if is_shell_name(name) {
                let _ = writeln!(out, "export {name}={}", shell_quote(value));
            } else {
                warn!(env = name, "not a valid shell variable name, skipping export");
            }
            out
        })
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_shell_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Single-quotes `value` for POSIX shells.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
