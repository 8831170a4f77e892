//! Entry identifiers.
//!
//! Entries are identified by their citation key. The newtype centralizes
//! validation and formatting instead of passing bare strings between
//! crates.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building an entry ID.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The citation key was empty.
    #[error("citation key must not be empty")]
    Empty,

    /// The citation key contained whitespace.
    #[error("citation key must not contain whitespace: {0:?}")]
    Whitespace(String),
}

/// A stable entry identity: the citation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Creates an entry ID from a citation key.
    pub fn new(key: impl Into<String>) -> Result<Self, IdError> {
        let key = key.into();

        if key.is_empty() {
            return Err(IdError::Empty);
        }
        if key.chars().any(char::is_whitespace) {
            return Err(IdError::Whitespace(key));
        }

        Ok(Self(key))
    }

    /// The citation key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntryId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_key_round_trips() {
        let id: EntryId = "Smith2020".parse().unwrap();
        assert_eq!(id.as_str(), "Smith2020");
        assert_eq!(id.to_string(), "Smith2020");
    }

    #[test]
    fn invalid_keys_error() {
        assert_eq!("".parse::<EntryId>(), Err(IdError::Empty));
        assert!(matches!(
            "smith 2020".parse::<EntryId>(),
            Err(IdError::Whitespace(_))
        ));
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<EntryId, _> = serde_json::from_str("\"Smith2020\"");
        assert!(ok.is_ok());

        let bad: Result<EntryId, _> = serde_json::from_str("\"smith 2020\"");
        assert!(bad.is_err());
    }
}
