use anyhow::Result;

use super::Installer;
use crate::domain::InstallerError;
use crate::domain::shell::{apt_install, restart_service, restart_service_fallback};

impl Installer<'_> {
    /// Remember system packages to install at the end of the session.
    /// `packages` is a whitespace-separated list.
    pub fn request_packages(&self, packages: &str) {
        tracing::debug!(packages, "packages requested");
        self.pending.borrow_mut().request_packages(packages);
    }

    /// Remember a service to restart at the end of the session.
    pub fn request_restart(&self, service: &str) {
        tracing::debug!(service, "restart requested");
        self.pending.borrow_mut().request_restart(service);
    }

    /// End the session: one combined package install, then the requested
    /// restarts. Sessions that are not privileged only report what they
    /// did not do.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::CommandFailed`] when the package manager
    /// fails, or when a service fails to restart with both mechanisms.
    pub fn finish(self) -> Result<()> {
        let (packages, services) = self.pending.borrow_mut().drain();
        if !self.privileged {
            if !packages.is_empty() {
                self.ports.reporter.warn(&format!(
                    "Note that the following system packages were not installed because you aren't root:\n{}",
                    packages.join(" ")
                ));
            }
            if !services.is_empty() {
                tracing::info!(services = %services.join(" "), "restarts skipped");
            }
            return Ok(());
        }

        if !packages.is_empty() {
            tracing::info!(count = packages.len(), "installing system packages");
            self.run(&apt_install(&packages, self.batch.get()))?;
        }
        if !services.is_empty()
            && self.confirm(&format!("Restart services {}", services.join(" ")), true)?
        {
            let _guard = self.force_batch();
            for service in &services {
                self.restart(service)?;
            }
        }
        Ok(())
    }

    fn restart(&self, service: &str) -> Result<()> {
        match self.run(&restart_service(service)) {
            Err(e)
                if matches!(
                    e.downcast_ref::<InstallerError>(),
                    Some(InstallerError::CommandFailed { .. })
                ) =>
            {
                self.ports
                    .reporter
                    .warn(&format!("{e}; trying systemctl instead"));
                self.run(&restart_service_fallback(service))
            }
            other => other,
        }
    }
}
