// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Merging fetched config variables into an environment.
//!
//! ```text
//! for (name, value) in VariableMapping (sorted by name):
//!   filter.allows(name)?        no  --> Filtered
//!   key = normalize_name(name)
//!   env.contains(key)?          no  --> Added
//!   override_existing?          yes --> Overridden
//!                               no  --> KeptExisting
//! ```
//!
//! Local values win by default: a variable already present in the
//! environment (or added earlier in the same merge) is never replaced
//! unless `override_existing` is set.

use tracing::debug;
use wax::Program as _;

use super::container::Env;
use crate::error::ConfigError;
use crate::runtimeconfig::VariableMapping;

/// Turns a config variable name into an environment variable name.
///
/// Upper-cases and replaces every `-` with `_`: `my-key` becomes `MY_KEY`.
/// Idempotent: `normalize_name(normalize_name(x)) == normalize_name(x)`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_uppercase().replace('-', "_")
}

/// Selects which variables take part in a merge.
///
/// Patterns are matched against the short variable name as returned by the
/// service (before normalization). A pattern is either an exact name or a
/// glob such as `db-*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableFilter {
    only: Vec<String>,
    except: Vec<String>,
}

impl VariableFilter {
    /// Creates a filter, rejecting patterns that are not valid globs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad pattern.
    pub fn new(only: Vec<String>, except: Vec<String>) -> Result<Self, ConfigError> {
        for (key, patterns) in [("only", &only), ("except", &except)] {
            for pattern in patterns {
                if let Err(e) = wax::Glob::new(pattern) {
                    return Err(ConfigError::InvalidValue {
                        section: "merge".to_string(),
                        key: key.to_string(),
                        message: format!("invalid pattern '{pattern}': {e}"),
                    });
                }
            }
        }
        Ok(Self { only, except })
    }

    /// Returns true if `name` should be merged.
    ///
    /// `except` wins over `only`; an empty `only` list admits everything.
    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        if self.except.iter().any(|p| pattern_matches(p, name)) {
            return false;
        }
        self.only.is_empty() || self.only.iter().any(|p| pattern_matches(p, name))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.only.is_empty() && self.except.is_empty()
    }
}

fn pattern_matches(pattern: &str, name: &str) -> bool {
    pattern == name || wax::Glob::new(pattern).is_ok_and(|glob| glob.is_match(name))
}

/// Options controlling [`merge_variables`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    override_existing: bool,
    filter: VariableFilter,
}

impl MergeOptions {
    #[must_use]
    pub const fn new(override_existing: bool, filter: VariableFilter) -> Self {
        Self {
            override_existing,
            filter,
        }
    }

    #[must_use]
    pub const fn override_existing(&self) -> bool {
        self.override_existing
    }

    #[must_use]
    pub const fn filter(&self) -> &VariableFilter {
        &self.filter
    }
}

/// What happened to one config variable during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// The variable was not in the environment and has been set.
    Added,
    /// The variable was in the environment and has been replaced.
    Overridden,
    /// The variable was already in the environment and kept its value.
    KeptExisting,
    /// The variable was excluded by `only`/`except`.
    Filtered,
}

/// A per-variable merge record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeDecision {
    /// Name as returned by the config service.
    pub name: String,
    /// Normalized environment variable name.
    pub env_name: String,
    pub action: MergeAction,
}

/// Result of [`merge_variables`].
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    env: Env,
    decisions: Vec<MergeDecision>,
}

impl MergeOutcome {
    /// The merged environment.
    #[must_use]
    pub const fn env(&self) -> &Env {
        &self.env
    }

    #[must_use]
    pub fn into_env(self) -> Env {
        self.env
    }

    #[must_use]
    pub fn decisions(&self) -> &[MergeDecision] {
        &self.decisions
    }

    /// Variables this merge wrote (added or overridden), with their values.
    pub fn applied(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decisions
            .iter()
            .filter(|d| matches!(d.action, MergeAction::Added | MergeAction::Overridden))
            .filter_map(|d| {
                self.env
                    .get(&d.env_name)
                    .map(|value| (d.env_name.as_str(), value))
            })
    }

    /// Number of variables with the given action.
    #[must_use]
    pub fn count(&self, action: MergeAction) -> usize {
        self.decisions.iter().filter(|d| d.action == action).count()
    }
}

/// Merges config variables into a copy of `base`.
#[must_use]
pub fn merge_variables(
    base: &Env,
    variables: &VariableMapping,
    options: &MergeOptions,
) -> MergeOutcome {
    let mut env = base.clone();
    let mut decisions = Vec::with_capacity(variables.len());

    for (name, value) in variables {
        let env_name = normalize_name(name);

        let action = if !options.filter.allows(name) {
            debug!(variable = %name, "skipping config variable");
            MergeAction::Filtered
        } else if !env.contains(&env_name) {
            debug!(variable = %name, env = %env_name, "setting envvar");
            env.set(env_name.clone(), value.clone());
            MergeAction::Added
        } else if options.override_existing {
            debug!(variable = %name, env = %env_name, "overriding envvar");
            env.set(env_name.clone(), value.clone());
            MergeAction::Overridden
        } else {
            debug!(variable = %name, env = %env_name, "envvar already set");
            MergeAction::KeptExisting
        };

        decisions.push(MergeDecision {
            name: name.clone(),
            env_name,
            action,
        });
    }

    MergeOutcome { env, decisions }
}
