// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment variable management.
//!
//! # Architecture
//!
//! ```text
//! current_env() --> Env (copy-on-write BTreeMap<EnvKey, String>)
//!                    |
//!                    v
//! merge_variables(base, VariableMapping, MergeOptions)
//!   normalize_name: "db-host" -> "DB_HOST"
//!   filter:   only / except (names or globs)
//!   existing: kept, unless override_existing
//!                    |
//!                    v
//!              MergeOutcome { env, decisions }
//! ```
//!
//! - **Case-insensitive keys on Windows**, case-sensitive elsewhere
//! - **Copy-on-write**: the merged env shares the ambient snapshot until
//!   the first variable is added

pub mod container;
pub mod merge;
pub mod types;


/// Captures the current process environment.
///
/// A value that is not valid Unicode is recorded by name only, so it still
/// counts as set when merging. Names that are not valid Unicode are skipped;
/// no normalized config name can match them. The launcher applies the
/// merged env on top of the inherited one, so the child receives both.
#[must_use]
pub fn current_env() -> container::Env {
    let mut env = container::Env::new();
    for (key, value) in std::env::vars_os() {
        let Ok(key) = key.into_string() else {
            continue;
        };
        match value.into_string() {
            Ok(value) => env.set(key, value),
            Err(_) => env.mark_non_unicode(key),
        };
    }
    env
}
