//! Application context — unified state passed to every command handler.
//!
//! `AppContext` owns the production adapters once; commands borrow them as
//! `HostPorts` for the installer.

use anyhow::Result;

use crate::application::ports::ProgressReporter;
use crate::application::services::installer::HostPorts;
use crate::infra::command_runner::SystemShell;
use crate::infra::config::TomlConfigStore;
use crate::infra::fs::OsFs;
use crate::infra::host::NixHost;
use crate::infra::prompt::TerminalPrompter;
use crate::infra::templates::EmbeddedTemplates;
use crate::output::OutputContext;

/// Environment variable forcing batch mode for every command.
pub const BATCH_ENV: &str = "SITEFORGE_BATCH";

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    pub config_store: TomlConfigStore,
    pub shell: SystemShell,
    pub host: NixHost,
    pub fs: OsFs,
    pub prompter: TerminalPrompter,
    pub templates: EmbeddedTemplates,
    /// Set when `SITEFORGE_BATCH` is present; commands add their own `--batch`.
    pub batch_env: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded templates fail to load.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            mode,
            config_store: TomlConfigStore::from_env(),
            shell: SystemShell::default(),
            host: NixHost,
            fs: OsFs,
            prompter: TerminalPrompter::new(),
            templates: EmbeddedTemplates::new()?,
            batch_env: std::env::var_os(BATCH_ENV).is_some(),
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Whether a command asked for `--batch` runs without prompts.
    #[must_use]
    pub fn batch(&self, flag: bool) -> bool {
        flag || self.batch_env
    }

    /// Borrow the production adapters for an installer session.
    #[must_use]
    pub fn ports<'a>(&'a self, reporter: &'a dyn ProgressReporter) -> HostPorts<'a> {
        HostPorts {
            shell: &self.shell,
            host: &self.host,
            fs: &self.fs,
            prompter: &self.prompter,
            templates: &self.templates,
            reporter,
        }
    }
}
