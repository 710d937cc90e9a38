//! Domain types for the persisted server configuration.
//!
//! Pure functions only — no I/O, no filesystem access.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use siteforge_common::{CONFIGURE_OPTIONS, ConfigValue, ConfiguredOption, DefaultContext};

use crate::domain::error::ConfigError;

/// Resolved host configuration: one value per registry option.
///
/// Built once at session start and handed by reference to every component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl ServerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration holding the registry default of every option.
    #[must_use]
    pub fn defaults(ctx: &DefaultContext) -> Self {
        let values = CONFIGURE_OPTIONS
            .iter()
            .map(|o| (o.name.to_string(), o.default_value(ctx)))
            .collect();
        Self { values }
    }

    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Text of `key`, empty when unset.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.values.get(key).map(ConfigValue::as_text).unwrap_or_default()
    }

    /// Flag value of `key`, `false` when unset.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(ConfigValue::as_flag)
    }

    /// Path value of `key`, `None` when unset or empty.
    #[must_use]
    pub fn path(&self, key: &str) -> Option<PathBuf> {
        let raw = self.text(key);
        (!raw.is_empty()).then(|| PathBuf::from(raw))
    }

    /// Overlay `other` on top of `self`; keys present in `other` win.
    pub fn merge(&mut self, other: ServerConfig) {
        self.values.extend(other.values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // ── Typed accessors for the keys the installer reads ─────────────────

    #[must_use]
    pub fn usergroup(&self) -> String {
        self.text("usergroup")
    }

    #[must_use]
    pub fn sites_base(&self) -> Option<PathBuf> {
        self.path("sites_base")
    }

    #[must_use]
    pub fn supervisor_dir(&self) -> Option<PathBuf> {
        self.path("supervisor_dir")
    }

    #[must_use]
    pub fn env_link(&self) -> String {
        non_empty_or(self.text("env_link"), "env")
    }

    #[must_use]
    pub fn repos_link(&self) -> String {
        non_empty_or(self.text("repos_link"), "repositories")
    }

    #[must_use]
    pub fn branch(&self) -> String {
        non_empty_or(self.text("branch"), "master")
    }

    #[must_use]
    pub fn db_engine(&self) -> String {
        non_empty_or(self.text("db_engine"), "sqlite3")
    }

    /// Values as template context: text values as strings, flags as booleans.
    #[must_use]
    pub fn to_context(&self) -> serde_json::Map<String, serde_json::Value> {
        self.values
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    ConfigValue::Flag(b) => serde_json::Value::Bool(*b),
                    ConfigValue::Text(s) => serde_json::Value::String(s.clone()),
                };
                (k.clone(), value)
            })
            .collect()
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() { fallback.to_string() } else { value }
}

/// Validates a configuration key against the option registry.
///
/// # Errors
///
/// Returns an error if the key is not a registered option.
pub fn validate_config_key(key: &str) -> Result<&'static ConfiguredOption> {
    siteforge_common::find_option(key).ok_or_else(|| {
        ConfigError::UnknownKey {
            key: key.to_string(),
            valid: CONFIGURE_OPTIONS
                .iter()
                .map(|o| o.name)
                .collect::<Vec<_>>()
                .join(", "),
        }
        .into()
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
