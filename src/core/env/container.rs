// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment variable struct and copy-on-write implementation.
//!
//! ```text
//! Env (copy-on-write)
//! data: Arc<EnvData>
//! clone shares the Arc; set/remove go through Arc::make_mut
//!
//! non-Unicode entries: name only, contains() == true, get() == None
//! ```

use super::types::{EnvData, EnvKey};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A set of environment variables with copy-on-write semantics.
///
/// Cloning is cheap: the merged environment starts as a clone of the
/// ambient snapshot and only copies the map on the first write.
#[derive(Debug, Clone, Default)]
pub struct Env {
    data: Arc<EnvData>,
}

impl PartialEq for Env {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
            || (self.to_map() == other.to_map()
                && self.data.non_unicode() == other.data.non_unicode())
    }
}

impl Env {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment from a map of variables.
    #[must_use]
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        let data = EnvData::from_vars(vars.into_iter().map(|(k, v)| (EnvKey::new(k), v)).collect());
        Self {
            data: Arc::new(data),
        }
    }

    /// Sets an environment variable, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let data = Arc::make_mut(&mut self.data);
        let key = EnvKey::new(key.into());
        // Re-insert so the stored spelling follows the latest write.
        data.vars_mut().remove(&key);
        data.non_unicode_mut().remove(&key);
        data.vars_mut().insert(key, value.into());
        self
    }

    /// Records a variable that is set, but whose value is not valid Unicode.
    ///
    /// The value stays with the inherited process environment. The name
    /// counts as present for [`contains`](Self::contains) and is not
    /// yielded by [`iter`](Self::iter).
    pub fn mark_non_unicode(&mut self, key: impl Into<String>) -> &mut Self {
        let data = Arc::make_mut(&mut self.data);
        let key = EnvKey::new(key.into());
        data.vars_mut().remove(&key);
        data.non_unicode_mut().insert(key);
        self
    }

    /// Gets an environment variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data
            .vars()
            .get(&EnvKey::new(key))
            .map(String::as_str)
    }

    /// Returns true if the variable is set (even to an empty or non-Unicode
    /// value).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        let key = EnvKey::new(key);
        self.data.vars().contains_key(&key) || self.data.non_unicode().contains(&key)
    }

    /// Returns the value if it is set and not empty.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Removes an environment variable.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        if self.contains(key) {
            let data = Arc::make_mut(&mut self.data);
            let key = EnvKey::new(key);
            data.vars_mut().remove(&key);
            data.non_unicode_mut().remove(&key);
        }
        self
    }

    /// Returns all environment variables as a map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.data
            .vars()
            .iter()
            .map(|(k, v)| (k.as_str().to_owned(), v.clone()))
            .collect()
    }

    /// Returns an iterator over environment variables.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .vars()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true if no variables are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.vars().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.vars().len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
