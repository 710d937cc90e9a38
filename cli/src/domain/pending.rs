//! Deferred action accumulator.
//!
//! Steps of a session request system packages and service restarts as they
//! go; nothing runs until the session flushes. Duplicates collapse.

use std::collections::BTreeSet;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingActions {
    packages: BTreeSet<String>,
    services: BTreeSet<String>,
}

impl PendingActions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every whitespace-separated name in `packages`.
    pub fn request_packages(&mut self, packages: &str) {
        self.packages
            .extend(packages.split_whitespace().map(str::to_string));
    }

    pub fn request_restart(&mut self, service: &str) {
        let service = service.trim();
        if !service.is_empty() {
            self.services.insert(service.to_string());
        }
    }

    #[must_use]
    pub fn packages(&self) -> &BTreeSet<String> {
        &self.packages
    }

    #[must_use]
    pub fn services(&self) -> &BTreeSet<String> {
        &self.services
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.services.is_empty()
    }

    /// Take everything accumulated so far, leaving the accumulator empty.
    pub fn drain(&mut self) -> (Vec<String>, Vec<String>) {
        let packages = std::mem::take(&mut self.packages).into_iter().collect();
        let services = std::mem::take(&mut self.services).into_iter().collect();
        (packages, services)
    }
}
