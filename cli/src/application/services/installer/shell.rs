use std::path::Path;

use anyhow::Result;

use super::Installer;
use crate::domain::InstallerError;
use crate::domain::shell::in_env;

impl Installer<'_> {
    /// Run one command line after confirmation (default: yes).
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::CommandFailed`] when the command exits
    /// non-zero, or an error if the shell cannot be spawned.
    pub fn run(&self, command: &str) -> Result<()> {
        self.run_at(command, None)
    }

    /// Like [`Installer::run`], with `cwd` as working directory.
    ///
    /// # Errors
    ///
    /// See [`Installer::run`].
    pub fn run_at(&self, command: &str, cwd: Option<&Path>) -> Result<()> {
        if !self.confirm(&format!("run {command}"), true)? {
            tracing::info!(command, "command declined");
            return Ok(());
        }
        self.ports.reporter.step(command);
        tracing::debug!(command, cwd = ?cwd, "running command");
        let status = self.ports.shell.run(command, cwd)?;
        if !status.success() {
            return Err(InstallerError::CommandFailed {
                command: command.to_string(),
                code: status.code(),
            }
            .into());
        }
        Ok(())
    }

    /// Run `command` inside the virtual environment at `env`.
    ///
    /// # Errors
    ///
    /// See [`Installer::run`].
    pub fn run_in_env(&self, env: &Path, command: &str) -> Result<()> {
        self.run(&in_env(env, command))
    }

    /// Run `command` inside the virtual environment at `env`, from `cwd`.
    ///
    /// # Errors
    ///
    /// See [`Installer::run`].
    pub fn run_in_env_at(&self, env: &Path, command: &str, cwd: &Path) -> Result<()> {
        self.run_at(&in_env(env, command), Some(cwd))
    }
}
