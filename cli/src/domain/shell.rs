//! Command lines issued by the installer.
//!
//! Every external effect is a single shell command line.

use std::path::Path;

use crate::domain::error::SiteError;

/// One combined package-manager invocation. Batch sessions add `-y`.
#[must_use]
pub fn apt_install(packages: &[String], batch: bool) -> String {
    let mut cmd = String::from("apt-get install ");
    if batch {
        cmd.push_str("-y ");
    }
    cmd.push_str(&packages.join(" "));
    cmd
}

/// Prefix `command` with the activation of the virtual environment at `env`.
#[must_use]
pub fn in_env(env: &Path, command: &str) -> String {
    format!(". {}/bin/activate && {command}", env.display())
}

/// Shallow, single-branch clone into `dest`.
#[must_use]
pub fn shallow_clone(url: &str, branch: &str, dest: &str) -> String {
    format!("git clone --depth 1 -b {branch} {url} {dest}")
}

#[must_use]
pub fn editable_install(path: &Path) -> String {
    format!("pip install -e {}", path.display())
}

#[must_use]
pub fn pip_install(packages: &str) -> String {
    format!("pip install {packages}")
}

#[must_use]
pub fn create_venv(path: &Path) -> String {
    format!("python3 -m venv {}", path.display())
}

#[must_use]
pub fn restart_service(service: &str) -> String {
    format!("service {service} restart")
}

/// Second attempt when the SysV wrapper fails.
#[must_use]
pub fn restart_service_fallback(service: &str) -> String {
    format!("systemctl restart {service}")
}

/// Reject values that would break out of the quoting used by the database
/// engines' command lines.
///
/// # Errors
///
/// Returns [`SiteError::UnsafeShellValue`] when `value` contains a quote,
/// a backtick, a backslash, `$` or a control character. `$` is still
/// expanded inside the double quotes around the SQL text.
pub fn ensure_quotable(value: &str, what: &str) -> Result<(), SiteError> {
    if value.contains(['"', '\'', '`', '\\', '$']) || value.chars().any(char::is_control) {
        return Err(SiteError::UnsafeShellValue {
            what: what.to_string(),
        });
    }
    Ok(())
}
