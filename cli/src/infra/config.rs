//! Infrastructure implementation of the `ConfigStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::ServerConfig;

/// Environment variable naming a single configuration file to use instead
/// of the system and user files.
pub const CONFIG_ENV: &str = "SITEFORGE_CONFIG";
pub const SYSTEM_CONFIG: &str = "/etc/siteforge/siteforge.conf";
pub const USER_CONFIG: &str = ".siteforge.conf";

const HEADER: &str = "# generated by siteforge\n";

/// Production implementation of `ConfigStore` using TOML files on disk.
///
/// Reading merges the system file and the user file (user wins).
pub struct TomlConfigStore {
    system: PathBuf,
    user: Option<PathBuf>,
    /// `system` is the only file, for every session.
    single: bool,
}

impl TomlConfigStore {
    #[must_use]
    pub fn new(system: PathBuf, user: Option<PathBuf>) -> Self {
        Self {
            system,
            user,
            single: false,
        }
    }

    /// Store honouring `SITEFORGE_CONFIG`, else the standard locations.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::single(PathBuf::from(path));
        }
        Self::new(
            PathBuf::from(SYSTEM_CONFIG),
            dirs::home_dir().map(|h| h.join(USER_CONFIG)),
        )
    }

    /// Store reading and writing exactly one file.
    #[must_use]
    pub fn single(path: PathBuf) -> Self {
        Self {
            system: path,
            user: None,
            single: true,
        }
    }

    fn candidates(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.system.as_path()).chain(self.user.as_deref())
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<Option<ServerConfig>> {
        let mut merged: Option<ServerConfig> = None;
        for path in self.candidates().filter(|p| p.exists()) {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let cfg: ServerConfig = toml::from_str(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded configuration");
            merged.get_or_insert_with(ServerConfig::new).merge(cfg);
        }
        Ok(merged)
    }

    fn found_paths(&self) -> Vec<PathBuf> {
        self.candidates()
            .filter(|p| p.exists())
            .map(Path::to_path_buf)
            .collect()
    }

    fn target_path(&self, privileged: bool) -> Result<PathBuf> {
        if privileged || self.single {
            return Ok(self.system.clone());
        }
        self.user
            .clone()
            .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
    }

    fn save(&self, config: &ServerConfig, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let body = toml::to_string(config).context("cannot serialize config")?;
        std::fs::write(path, format!("{HEADER}{body}"))
            .with_context(|| format!("cannot write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote configuration");
        Ok(())
    }
}
