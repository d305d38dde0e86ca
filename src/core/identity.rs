//! Budget identity using prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// A unique budget identifier (`BGT-<ULID>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BudgetId {
    ulid: Ulid,
}

impl BudgetId {
    pub const PREFIX: &'static str = "BGT";

    /// Create a new, time-ordered id
    pub fn new() -> Self {
        Self { ulid: Ulid::new() }
    }

    /// Get the ULID component
    pub fn ulid(&self) -> Ulid {
        self.ulid
    }

    /// Parse a BudgetId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    /// Abbreviated form for tables
    pub fn short(&self) -> String {
        let s = self.to_string();
        format!("{}...", &s[..13])
    }
}

impl Default for BudgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BudgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", Self::PREFIX, self.ulid)
    }
}

impl FromStr for BudgetId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix_str, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        if !prefix_str.eq_ignore_ascii_case(Self::PREFIX) {
            return Err(IdParseError::InvalidPrefix(prefix_str.to_string()));
        }

        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { ulid })
    }
}

impl Serialize for BudgetId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BudgetId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing budget IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid budget prefix: '{0}' (expected BGT)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in budget ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}
