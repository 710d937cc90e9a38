//! Shared test helpers: exit statuses, configurations and temporary hosts.

#![allow(dead_code, clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use siteforge_cli::application::services::installer::SystemPaths;
use siteforge_cli::domain::ServerConfig;
use siteforge_common::DefaultContext;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

// ── Configurations ───────────────────────────────────────────────────────────

pub fn defaults_for(home: &Path, privileged: bool) -> DefaultContext {
    DefaultContext {
        privileged,
        home: home.to_path_buf(),
        virtual_env: None,
    }
}

/// Registry defaults with every base directory moved under `root`.
pub fn config_in(root: &Path) -> ServerConfig {
    let mut cfg = ServerConfig::defaults(&defaults_for(root, false));
    cfg.set("sites_base", path_text(&root.join("sites")));
    cfg.set("log_base", path_text(&root.join("log")));
    cfg.set("backups_base", path_text(&root.join("backups")));
    cfg.set("supervisor_dir", path_text(&root.join("supervisor")));
    cfg.set("usergroup", "www-data");
    cfg.set("db_engine", "sqlite3");
    cfg
}

/// System locations under `root`, created on disk.
pub fn system_paths_in(root: &Path) -> SystemPaths {
    let paths = SystemPaths {
        logrotate_dir: root.join("etc/logrotate.d"),
        nginx_available: root.join("etc/nginx/sites-available"),
        nginx_enabled: root.join("etc/nginx/sites-enabled"),
        monit_dir: root.join("etc/monit/conf.d"),
        local_bin: root.join("usr/local/bin"),
        supervisor_log: root.join("var/log/supervisor/supervisord.log"),
    };
    for dir in [
        &paths.logrotate_dir,
        &paths.nginx_available,
        &paths.nginx_enabled,
        &paths.monit_dir,
        &paths.local_bin,
    ] {
        std::fs::create_dir_all(dir).expect("create system dir");
    }
    std::fs::create_dir_all(root.join("supervisor")).expect("create supervisor dir");
    paths
}

pub fn path_text(path: &Path) -> String {
    path.display().to_string()
}

pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).expect("stat").permissions().mode() & 0o7777
}

pub fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).expect("chmod");
}

pub fn write(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write");
    path.to_path_buf()
}
