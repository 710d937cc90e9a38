//! The installer session: a linear script of confirmable host mutations.
//!
//! One [`Installer`] exists per command invocation. Steps consult the
//! confirmation gate, skip privileged work when not running as root and
//! accumulate package installs and service restarts until [`Installer::finish`]
//! flushes them once.

mod deferred;
mod files;
mod gate;
mod shell;
mod steps;

use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use crate::application::ports::{
    HostSystem, LocalFs, ProgressReporter, Prompter, ShellRunner, TemplateRenderer,
};
use crate::domain::{PendingActions, ServerConfig};

pub use gate::BatchGuard;
pub use steps::ENV_HELPER;

/// The collaborators an installer session drives.
#[derive(Clone, Copy)]
pub struct HostPorts<'a> {
    pub shell: &'a dyn ShellRunner,
    pub host: &'a dyn HostSystem,
    pub fs: &'a dyn LocalFs,
    pub prompter: &'a dyn Prompter,
    pub templates: &'a dyn TemplateRenderer,
    pub reporter: &'a dyn ProgressReporter,
}

/// Fixed system locations written by privileged sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPaths {
    pub logrotate_dir: PathBuf,
    pub nginx_available: PathBuf,
    pub nginx_enabled: PathBuf,
    pub monit_dir: PathBuf,
    pub local_bin: PathBuf,
    pub supervisor_log: PathBuf,
}

impl Default for SystemPaths {
    fn default() -> Self {
        Self {
            logrotate_dir: PathBuf::from("/etc/logrotate.d"),
            nginx_available: PathBuf::from("/etc/nginx/sites-available"),
            nginx_enabled: PathBuf::from("/etc/nginx/sites-enabled"),
            monit_dir: PathBuf::from("/etc/monit/conf.d"),
            local_bin: PathBuf::from("/usr/local/bin"),
            supervisor_log: PathBuf::from("/var/log/supervisor/supervisord.log"),
        }
    }
}

pub struct Installer<'a> {
    ports: HostPorts<'a>,
    config: &'a ServerConfig,
    paths: SystemPaths,
    batch: Cell<bool>,
    privileged: bool,
    pending: RefCell<PendingActions>,
}

impl<'a> Installer<'a> {
    /// Start a session. Privilege is read here, once.
    #[must_use]
    pub fn new(ports: HostPorts<'a>, config: &'a ServerConfig, batch: bool) -> Self {
        let privileged = ports.host.is_privileged();
        tracing::debug!(batch, privileged, "installer session started");
        Self {
            ports,
            config,
            paths: SystemPaths::default(),
            batch: Cell::new(batch),
            privileged,
            pending: RefCell::new(PendingActions::new()),
        }
    }

    /// Use other system locations (for tests and unusual hosts).
    #[must_use]
    pub fn with_system_paths(mut self, paths: SystemPaths) -> Self {
        self.paths = paths;
        self
    }

    #[must_use]
    pub fn system_paths(&self) -> &SystemPaths {
        &self.paths
    }

    #[must_use]
    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    #[must_use]
    pub fn is_batch(&self) -> bool {
        self.batch.get()
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        self.config
    }

    #[must_use]
    pub fn ports(&self) -> HostPorts<'a> {
        self.ports
    }

    /// Snapshot of what `finish` would flush.
    #[must_use]
    pub fn pending(&self) -> PendingActions {
        self.pending.borrow().clone()
    }

    /// Gate for privileged-only steps: `false` (after a notice) when the
    /// session is not privileged.
    pub fn require_privilege(&self, what: &str) -> bool {
        if self.privileged {
            return true;
        }
        self.ports
            .reporter
            .warn(&format!("Skipped {what} because you aren't root."));
        tracing::info!(what, "privileged step skipped");
        false
    }
}
