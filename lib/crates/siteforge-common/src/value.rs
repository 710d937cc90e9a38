use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single value stored in the configuration file.
///
/// Flags are persisted as bare TOML booleans, everything else as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Flag(bool),
    Text(String),
}

/// Errors raised when a raw answer cannot be turned into a [`ConfigValue`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid value for {key}: '{value}' is not a yes/no answer")]
    NotAFlag { key: String, value: String },

    #[error("invalid value for {key}: '{value}'\n\nValid values: {valid}")]
    NotAChoice {
        key: String,
        value: String,
        valid: String,
    },
}

impl ConfigValue {
    /// The value as text. Flags render as `true` / `false`.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Flag(b) => b.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Interpret the value as a flag. Text values accept the usual yes/no
    /// spellings so hand-edited files keep working.
    #[must_use]
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Text(s) => parse_flag(s).unwrap_or(false),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parse a yes/no answer.
#[must_use]
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}
