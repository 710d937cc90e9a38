//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod database;
pub mod error;
pub mod pending;
pub mod permissions;
pub mod shell;
pub mod site;

pub use config::{ServerConfig, validate_config_key};
pub use error::{ConfigError, InstallerError, SiteError};
pub use pending::PendingActions;
pub use site::{SiteLayout, validate_site_name};
