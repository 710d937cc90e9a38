//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anyhow::Result;

use crate::domain::ServerConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Runs one shell command line to completion with the terminal attached.
///
/// Output is not captured: the invoked process explains its own failure.
pub trait ShellRunner {
    /// Run `command_line` through the shell, optionally in `cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the shell cannot be spawned. A non-zero exit
    /// is reported through the returned status.
    fn run(&self, command_line: &str, cwd: Option<&Path>) -> Result<ExitStatus>;
}

// ── Host Port ─────────────────────────────────────────────────────────────────

/// Facts about and changes to the local host that need the OS user database.
pub trait HostSystem {
    /// Whether the effective user is the superuser.
    fn is_privileged(&self) -> bool;
    /// Name of the group owning `path`.
    fn group_of(&self, path: &Path) -> Result<String>;
    /// Change the group owner of `path`.
    fn set_group(&self, path: &Path, group: &str) -> Result<()>;
    /// Names of the groups the calling user belongs to.
    fn current_groups(&self) -> Result<Vec<String>>;
    /// Whether the calling user may write to `path`.
    fn can_write(&self, path: &Path) -> bool;
    /// Whether `program` is found on `PATH`.
    fn has_program(&self, program: &str) -> bool;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Raw filesystem operations used by the installer.
pub trait LocalFs {
    /// True for files, directories and dangling symlinks alike.
    fn exists(&self, path: &Path) -> bool;
    /// Follows symlinks.
    fn is_dir(&self, path: &Path) -> bool;
    fn is_symlink(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Permission bits of `path` (`st_mode & 0o7777`), following symlinks.
    fn mode(&self, path: &Path) -> Result<u32>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
    /// Create `link` pointing at `target`.
    fn symlink(&self, target: &Path, link: &Path) -> Result<()>;
}

// ── Prompt Port ───────────────────────────────────────────────────────────────

/// Interactive terminal input.
pub trait Prompter {
    /// Print `message` without a trailing newline.
    fn show(&self, message: &str) -> Result<()>;
    /// Block until a single key is pressed.
    fn read_key(&self) -> Result<char>;
    /// Print the end of the current line.
    fn answer(&self, text: &str) -> Result<()>;
    /// Ask for a line of text.
    fn input(&self, prompt: &str, default: &str) -> Result<String>;
    /// Ask to pick one of `choices`; returns its index.
    fn select(&self, prompt: &str, choices: &[&str], default: usize) -> Result<usize>;
    /// Ask a yes/no question that accepts the default on Enter.
    fn toggle(&self, prompt: &str, default: bool) -> Result<bool>;
}

// ── Template Port ─────────────────────────────────────────────────────────────

/// Renders a named template against a JSON context.
pub trait TemplateRenderer {
    /// # Errors
    ///
    /// Returns an error for unknown template names or rendering failures.
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Persistence of the server configuration record.
pub trait ConfigStore {
    /// The merged stored configuration, or `None` if no file exists.
    fn load(&self) -> Result<Option<ServerConfig>>;
    /// Files that were found and read by [`ConfigStore::load`].
    fn found_paths(&self) -> Vec<PathBuf>;
    /// File `configure` writes to.
    fn target_path(&self, privileged: bool) -> Result<PathBuf>;
    fn save(&self, config: &ServerConfig, path: &Path) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
