// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Types for environment variable management.
//!
//! ```text
//! EnvKey:  case-insensitive on Windows (PATH == Path == path),
//!          case-sensitive elsewhere (FOO != foo)
//! EnvData: BTreeMap<EnvKey, String> for deterministic order,
//!          plus the names of inherited non-Unicode values
//! ```

use std::collections::{BTreeMap, BTreeSet};

/// An environment variable key that compares the way the host OS does.
#[derive(Debug, Clone, Eq)]
pub(super) struct EnvKey(String);

impl EnvKey {
    pub(super) fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub(super) fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(windows)]
    fn folded(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

#[cfg(windows)]
impl PartialEq for EnvKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

#[cfg(not(windows))]
impl PartialEq for EnvKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for EnvKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(windows)]
impl Ord for EnvKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.folded().cmp(&other.folded())
    }
}

#[cfg(not(windows))]
impl Ord for EnvKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// Shared environment data for copy-on-write semantics.
#[derive(Debug, Clone, Default)]
pub(super) struct EnvData {
    vars: BTreeMap<EnvKey, String>,
    non_unicode: BTreeSet<EnvKey>,
}

impl EnvData {
    pub(super) const fn from_vars(vars: BTreeMap<EnvKey, String>) -> Self {
        Self {
            vars,
            non_unicode: BTreeSet::new(),
        }
    }

    pub(super) const fn vars(&self) -> &BTreeMap<EnvKey, String> {
        &self.vars
    }

    pub(super) const fn vars_mut(&mut self) -> &mut BTreeMap<EnvKey, String> {
        &mut self.vars
    }

    pub(super) const fn non_unicode(&self) -> &BTreeSet<EnvKey> {
        &self.non_unicode
    }

    pub(super) const fn non_unicode_mut(&mut self) -> &mut BTreeSet<EnvKey> {
        &mut self.non_unicode
    }
}
