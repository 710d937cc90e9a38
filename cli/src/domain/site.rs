//! Site naming and on-disk layout.
//!
//! Pure functions only — no I/O, no filesystem access.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::domain::config::ServerConfig;
use crate::domain::error::{ConfigError, SiteError};

/// Site names become directory names, Python package names and database
/// names; the rule keeps all three valid.
pub static SITE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid regex")
});

/// Validates a site name.
///
/// # Errors
///
/// Returns an error if the name does not match [`SITE_NAME_RE`].
pub fn validate_site_name(name: &str) -> Result<()> {
    if !SITE_NAME_RE.is_match(name) {
        return Err(SiteError::InvalidName(name.to_string()).into());
    }
    Ok(())
}

/// Where the pieces of one site live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub name: String,
    /// `<sites_base>/<local_prefix>/<name>`.
    pub project_dir: PathBuf,
    /// `<project_dir>/<env_link>`; a symlink when a shared env is used.
    pub env_dir: PathBuf,
    /// `<env_dir>/<repos_link>`.
    pub repos_dir: PathBuf,
    /// Central log directory, linked as `<project_dir>/log` by privileged sessions.
    pub log_target: Option<PathBuf>,
}

impl SiteLayout {
    /// Layout of site `name` under the configured bases.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is invalid or `sites_base` is unset.
    pub fn new(cfg: &ServerConfig, name: &str) -> Result<Self> {
        validate_site_name(name)?;
        let sites_base = cfg.sites_base().ok_or(ConfigError::NotConfigured)?;
        let project_dir = local_root(cfg, &sites_base).join(name);
        let env_dir = project_dir.join(cfg.env_link());
        let repos_dir = env_dir.join(cfg.repos_link());
        let log_target = cfg.path("log_base").map(|base| base.join(name));
        Ok(Self {
            name: name.to_string(),
            project_dir,
            env_dir,
            repos_dir,
            log_target,
        })
    }

    /// Settings module of the site (`lino_local.mysite.settings`).
    #[must_use]
    pub fn settings_module(&self, cfg: &ServerConfig) -> String {
        format!("{}.{}.settings", local_prefix(cfg), self.name)
    }

    /// Name of the supervisor program serving the site.
    #[must_use]
    pub fn uwsgi_program(&self) -> String {
        format!("{}-uwsgi", self.name)
    }

    #[must_use]
    pub fn linod_program(&self) -> String {
        format!("linod_{}", self.name)
    }
}

fn local_prefix(cfg: &ServerConfig) -> String {
    let prefix = cfg.text("local_prefix");
    if prefix.is_empty() { "lino_local".to_string() } else { prefix }
}

/// Directory holding the server-wide local settings package.
#[must_use]
pub fn local_root(cfg: &ServerConfig, sites_base: &Path) -> PathBuf {
    sites_base.join(local_prefix(cfg))
}
