//! Token to original-value association.
//!
//! A [`Mapping`] is the only state that crosses from redaction to
//! restoration. Whoever holds it can reverse every token it contains, so its
//! `Debug` output hides the original values outside of tests.

use std::{
    collections::{btree_map, BTreeMap},
    fmt,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reversible association from placeholder tokens to the text they replaced.
///
/// Serializes as a flat JSON object: `{"US_SSN_0001": "123-45-6789"}`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    entries: BTreeMap<String, String>,
}

impl Mapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `token` to `original`.
    ///
    /// Re-binding a token to the same value is a no-op; binding it to a
    /// different value is an [`Error::TokenCollision`].
    pub fn insert(&mut self, token: impl Into<String>, original: impl Into<String>) -> Result<()> {
        let token = token.into();
        let original = original.into();
        match self.entries.entry(token) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(original);
                Ok(())
            }
            btree_map::Entry::Occupied(entry) if *entry.get() == original => Ok(()),
            btree_map::Entry::Occupied(entry) => Err(Error::TokenCollision {
                token: entry.key().clone(),
            }),
        }
    }

    /// Folds `other` into `self`.
    ///
    /// Mappings minted by one allocator never collide. On a collision nothing
    /// from `other` is applied.
    pub fn merge(&mut self, other: Mapping) -> Result<()> {
        if let Some(token) = other.entries.iter().find_map(|(token, original)| {
            self.entries
                .get(token)
                .filter(|existing| *existing != original)
                .map(|_| token.clone())
        }) {
            return Err(Error::TokenCollision { token });
        }
        self.entries.extend(other.entries);
        Ok(())
    }

    /// Returns the original value behind `token`.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    /// Returns true if `token` is bound.
    pub fn contains_token(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Number of bound tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no token is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the bound tokens in sorted order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over `(token, original)` pairs in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(token, original)| (token.as_str(), original.as_str()))
    }

    /// Length in bytes of the longest token, or zero for an empty mapping.
    pub fn longest_token_len(&self) -> usize {
        self.entries.keys().map(String::len).max().unwrap_or(0)
    }
}

impl IntoIterator for Mapping {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Mapping
where
    K: Into<String>,
    V: Into<String>,
{
    /// Later pairs win when a token repeats.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(token, original)| (token.into(), original.into()))
                .collect(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

#[cfg(not(any(test, feature = "testing")))]
impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.keys().map(|token| (token, "[REDACTED]")))
            .finish()
    }
}
