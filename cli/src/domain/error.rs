//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Installer errors ──────────────────────────────────────────────────────────

/// Failures that abort an installer session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstallerError {
    /// An external command exited non-zero. The command itself is expected
    /// to have explained why on the terminal.
    #[error("{command} ended with return code {}", display_code(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error(
        "You don't belong to the {group} user group.  Maybe you want to run:\nsudo adduser `whoami` {group}"
    )]
    MissingGroup { group: String },
}

#[allow(clippy::ref_option)]
fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none (killed by signal)".to_string(), |c| c.to_string())
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to the persisted server configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("This server is not yet configured. Did you run `siteforge configure`?")]
    NotConfigured,

    #[error("No write permission for {path}")]
    NoWritePermission { path: String },

    #[error("Cannot --clone without --shared-env")]
    MissingSharedEnv,

    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },
}

// ── Site errors ───────────────────────────────────────────────────────────────

/// Errors related to site creation input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteError {
    #[error("Unknown application '{name}'.\n\nKnown applications: {valid}")]
    UnknownApp { name: String, valid: String },

    #[error("Unknown repository '{0}'. Run 'siteforge list' to see the catalogue.")]
    UnknownRepo(String),

    #[error("Repository '{0}' has no source location to clone from.")]
    NotCloneable(String),

    #[error("Unknown database engine '{name}'.\n\nSupported engines: {valid}")]
    UnknownEngine { name: String, valid: String },

    #[error("Invalid site name '{0}': must match ^[a-z][a-z0-9_]*$")]
    InvalidName(String),

    #[error("Refusing to pass {what} containing quotes, `$`, backslashes or control characters to the shell")]
    UnsafeShellValue { what: String },
}
