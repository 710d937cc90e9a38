use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Value, json};
use siteforge_common::RepoDescriptor;

use super::Installer;
use crate::domain::database::{DatabaseEngine, DbCredentials};
use crate::domain::shell::{create_venv, editable_install, shallow_clone};
use crate::domain::{InstallerError, SiteError};

/// Name of the helper script generated into every virtual environment.
pub const ENV_HELPER: &str = "pull.sh";

impl Installer<'_> {
    /// Template context: every configuration value plus `extra`.
    #[must_use]
    pub fn context(&self, extra: Value) -> Value {
        let mut ctx = self.config.to_context();
        if let Value::Object(map) = extra {
            ctx.extend(map);
        }
        Value::Object(ctx)
    }

    /// Render template `name` against `context`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown templates or rendering failures.
    pub fn render(&self, name: &str, context: &Value) -> Result<String> {
        self.ports
            .templates
            .render(name, context)
            .with_context(|| format!("rendering template {name}"))
    }

    /// Shallow clone of `repo` into `repos_dir`, skipped when the target
    /// directory already exists.
    ///
    /// # Errors
    ///
    /// Returns an error for repositories without a source location or when
    /// `git` fails.
    pub fn clone_repo(&self, repo: &RepoDescriptor, repos_dir: &Path) -> Result<()> {
        let url = repo
            .git_repo
            .ok_or_else(|| SiteError::NotCloneable(repo.nickname.to_string()))?;
        if self.ports.fs.exists(&repos_dir.join(repo.nickname)) {
            self.ports.reporter.step(&format!(
                "No need to clone {} : directory exists.",
                repo.package_name
            ));
            return Ok(());
        }
        self.run_at(
            &shallow_clone(url, &self.config.branch(), repo.nickname),
            Some(repos_dir),
        )
    }

    /// Editable install of the clone of `repo` into the environment `env`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::CommandFailed`] when `pip` fails.
    pub fn install_repo(&self, repo: &RepoDescriptor, env: &Path, repos_dir: &Path) -> Result<()> {
        self.run_in_env(env, &editable_install(&repos_dir.join(repo.nickname)))
    }

    /// Make sure a virtual environment exists at `path`.
    ///
    /// An existing path counts as done. Otherwise, after confirmation, the
    /// directory and environment are created and the helper script is
    /// written. Returns `false` when the user declined.
    ///
    /// # Errors
    ///
    /// Filesystem and command failures propagate.
    pub fn ensure_virtualenv(&self, path: &Path) -> Result<bool> {
        let fs = self.ports.fs;
        let helper = helper_path(path);
        if fs.exists(path) {
            if fs.exists(&helper) {
                let _guard = self.force_batch();
                self.check_permissions(&helper, true)?;
            }
            return Ok(true);
        }
        if !self.confirm(&format!("Create virtualenv in {}", path.display()), true)? {
            return Ok(false);
        }
        let _guard = self.force_batch();
        fs.create_dir_all(path)?;
        self.check_permissions(path, false)?;
        self.run(&create_venv(path))?;
        if !fs.exists(&helper) {
            let content = self.render(
                ENV_HELPER,
                &self.context(json!({ "env_dir": path.display().to_string() })),
            )?;
            if let Some(bin) = helper.parent() {
                fs.create_dir_all(bin)?;
            }
            self.write_file(&helper, &content, true)?;
        }
        Ok(true)
    }

    /// Non-privileged users must belong to `group`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::MissingGroup`] naming the group.
    pub fn check_usergroup(&self, group: &str) -> Result<()> {
        if self.privileged {
            return Ok(());
        }
        if self.ports.host.current_groups()?.iter().any(|g| g == group) {
            return Ok(());
        }
        Err(InstallerError::MissingGroup {
            group: group.to_string(),
        }
        .into())
    }

    /// Create database user and database through `engine`.
    ///
    /// # Errors
    ///
    /// Returns an error for unquotable credentials or failing commands.
    pub fn setup_database(
        &self,
        engine: &dyn DatabaseEngine,
        database: &str,
        creds: &DbCredentials,
    ) -> Result<()> {
        let mut commands = engine.setup_user(creds)?;
        commands.extend(engine.setup_database(database, &creds.user)?);
        if commands.is_empty() {
            self.ports
                .reporter
                .step(&format!("No setup needed for {}", engine.descriptor().name));
            return Ok(());
        }
        for command in &commands {
            self.run(command)?;
        }
        Ok(())
    }

    /// Write a supervisor program block and request a supervisor restart.
    ///
    /// # Errors
    ///
    /// Returns an error when `supervisor_dir` is not configured or the
    /// write fails.
    pub fn write_supervisor_conf(&self, filename: &str, content: &str) -> Result<bool> {
        let dir = self
            .config
            .supervisor_dir()
            .context("supervisor_dir is not configured")?;
        let written = self.write_file(&dir.join(filename), content, false)?;
        self.request_restart("supervisor");
        Ok(written)
    }

    /// Write a log rotation rule for `logfile`.
    ///
    /// # Errors
    ///
    /// Rendering and filesystem errors propagate.
    pub fn write_logrotate_conf(&self, filename: &str, logfile: &Path) -> Result<bool> {
        let content = self.render(
            "logrotate.conf",
            &self.context(json!({ "logfile": logfile.display().to_string() })),
        )?;
        self.write_file(&self.paths.logrotate_dir.join(filename), &content, false)
    }
}

fn helper_path(env: &Path) -> PathBuf {
    env.join("bin").join(ENV_HELPER)
}
