//! Infrastructure implementation of the `ShellRunner` port.
//!
//! `SystemShell` hands each command line to `/bin/sh -c` with the terminal
//! attached, so package managers and prompts like `mysql -p` can talk to
//! the user directly.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

use crate::application::ports::ShellRunner;

/// Production `ShellRunner` — blocking, inherits stdio, no timeout.
pub struct SystemShell {
    shell: String,
}

impl SystemShell {
    #[must_use]
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new("/bin/sh")
    }
}

impl ShellRunner for SystemShell {
    fn run(&self, command_line: &str, cwd: Option<&Path>) -> Result<ExitStatus> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command_line)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        tracing::debug!(shell = %self.shell, command_line, "spawning");
        let status = cmd
            .status()
            .with_context(|| format!("failed to spawn {} for: {command_line}", self.shell))?;
        tracing::debug!(code = ?status.code(), "command exited");
        Ok(status)
    }
}
