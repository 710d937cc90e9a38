use std::cell::Cell;

use anyhow::Result;

use super::Installer;

const YES: &str = "yY";
const NO: &str = "nN";

/// Restores the previous batch mode when dropped.
#[must_use = "batch mode is restored as soon as the guard is dropped"]
pub struct BatchGuard<'s> {
    batch: &'s Cell<bool>,
    previous: bool,
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.batch.set(self.previous);
    }
}

impl Installer<'_> {
    /// Ask before acting.
    ///
    /// Batch sessions answer `default` without any I/O. Interactive sessions
    /// require an explicit `y` or `n`; every other key is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    pub fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        if self.batch.get() {
            return Ok(default);
        }
        let prompter = self.ports.prompter;
        prompter.show(&format!("{message} [y or n]"))?;
        loop {
            let key = prompter.read_key()?;
            if YES.contains(key) {
                prompter.answer(" Yes")?;
                return Ok(true);
            }
            if NO.contains(key) {
                prompter.answer(" No")?;
                return Ok(false);
            }
        }
    }

    /// Run gated actions without asking until the guard is dropped.
    pub fn force_batch(&self) -> BatchGuard<'_> {
        BatchGuard {
            batch: &self.batch,
            previous: self.batch.replace(true),
        }
    }

    /// Run `f` with a forced-batch scope around it.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`; batch mode is restored either way.
    pub fn batched<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let _guard = self.force_batch();
        f(self)
    }
}
