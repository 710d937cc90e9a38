use std::path::Path;

use anyhow::{Context, Result};

use super::Installer;
use crate::domain::permissions::mode_correction;

impl Installer<'_> {
    /// Make room for a new file or directory at `path`.
    ///
    /// Returns `true` when nothing is there or the user agreed to remove
    /// what is there; `false` leaves `path` untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails or the terminal cannot be read.
    pub fn check_overwrite(&self, path: &Path) -> Result<bool> {
        let fs = self.ports.fs;
        if !fs.exists(path) {
            return Ok(true);
        }
        if fs.is_dir(path) && !fs.is_symlink(path) {
            if self.confirm(&format!("Overwrite existing directory {}?", path.display()), true)? {
                fs.remove_dir_all(path)?;
                return Ok(true);
            }
        } else if self.confirm(&format!("Overwrite existing file {}?", path.display()), true)? {
            fs.remove_file(path)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Write `content` to `path` unless the user refuses to overwrite an
    /// existing entry. The new file gets normalised permissions.
    ///
    /// # Errors
    ///
    /// Filesystem errors propagate unchanged.
    pub fn write_file(&self, path: &Path, content: &str, executable: bool) -> Result<bool> {
        if !self.check_overwrite(path)? {
            tracing::info!(path = %path.display(), "kept existing file");
            return Ok(false);
        }
        self.ports.fs.write(path, content)?;
        tracing::debug!(path = %path.display(), "wrote file");
        let _guard = self.force_batch();
        self.check_permissions(path, executable)?;
        Ok(true)
    }

    /// Bring group owner (privileged sessions only) and mode bits of `path`
    /// in line with what the web server needs. Applying it twice changes
    /// nothing the second time.
    ///
    /// # Errors
    ///
    /// Filesystem and host errors propagate unchanged.
    pub fn check_permissions(&self, path: &Path, executable: bool) -> Result<()> {
        let fs = self.ports.fs;
        if self.privileged {
            let wanted = self.config.usergroup();
            let current = self.ports.host.group_of(path)?;
            if !wanted.is_empty()
                && current != wanted
                && self.confirm(&format!("Set group owner for {}", path.display()), true)?
            {
                self.ports
                    .host
                    .set_group(path, &wanted)
                    .with_context(|| format!("cannot change group of {}", path.display()))?;
            }
        }
        let current = fs.mode(path)?;
        if let Some(target) = mode_correction(current, fs.is_dir(path), executable) {
            let msg = format!(
                "Set mode for {} from {current:o} to {target:o}",
                path.display()
            );
            if self.confirm(&msg, true)? {
                fs.set_permissions(path, target)?;
            }
        }
        Ok(())
    }

    /// Create `path` (after confirmation) when it is missing, then normalise
    /// its permissions. Returns `false` when the user declined creation.
    ///
    /// # Errors
    ///
    /// Filesystem errors propagate unchanged.
    pub fn ensure_dir(&self, path: &Path, what: &str) -> Result<bool> {
        let fs = self.ports.fs;
        if !fs.exists(path) {
            if !self.confirm(&format!("Create {what} {}?", path.display()), true)? {
                return Ok(false);
            }
            fs.create_dir_all(path)?;
        }
        self.check_permissions(path, false)?;
        Ok(true)
    }
}
