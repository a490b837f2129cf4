//! Type-safe identifier wrappers.
//!
//! Hosts address worlds by name. Wrapping the name keeps world identifiers
//! from being mixed up with the other strings a command carries (action
//! keywords, temporal values).

use core::fmt;

use serde::{Deserialize, Serialize};

/// The name of a game world, as the host knows it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldName(String);

impl WorldName {
    /// Wrap a world name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the inner [`String`].
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WorldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorldName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for WorldName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for WorldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
