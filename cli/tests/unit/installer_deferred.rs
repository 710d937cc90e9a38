//! Deferred package installs and service restarts flushed by `finish`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use siteforge_cli::application::services::installer::Installer;
use siteforge_cli::domain::{InstallerError, ServerConfig};

use crate::mocks::{FakeHost, Harness, RecordingShell};

#[test]
fn test_finish_installs_all_packages_once_sorted() {
    let h = Harness::new(FakeHost::root());
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, true);

    i.request_packages("nginx supervisor");
    i.request_packages("sqlite3 nginx");
    i.finish().unwrap();

    assert_eq!(
        h.shell.commands(),
        vec!["apt-get install -y nginx sqlite3 supervisor".to_string()]
    );
}

#[test]
fn test_interactive_install_omits_assume_yes() {
    let h = Harness::new(FakeHost::root()).with_keys("y");
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, false);

    i.request_packages("git");
    i.finish().unwrap();

    assert_eq!(h.shell.commands(), vec!["apt-get install git".to_string()]);
}

#[test]
fn test_each_service_restarts_once() {
    let h = Harness::new(FakeHost::root());
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, true);

    i.request_restart("supervisor");
    i.request_restart("nginx");
    i.request_restart("nginx");
    i.finish().unwrap();

    assert_eq!(
        h.shell.commands(),
        vec![
            "service nginx restart".to_string(),
            "service supervisor restart".to_string(),
        ]
    );
}

#[test]
fn test_restart_confirmation_covers_all_services() {
    // One answer for the combined question; the restarts themselves run batched.
    let h = Harness::new(FakeHost::root()).with_keys("y");
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, false);

    i.request_restart("nginx");
    i.request_restart("supervisor");
    i.finish().unwrap();

    assert_eq!(
        h.prompter.shown(),
        vec!["Restart services nginx supervisor [y or n]".to_string()]
    );
    assert_eq!(h.shell.commands().len(), 2);
}

#[test]
fn test_declined_restart_runs_nothing() {
    let h = Harness::new(FakeHost::root()).with_keys("n");
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, false);

    i.request_restart("nginx");
    i.finish().unwrap();

    assert!(h.shell.commands().is_empty());
}

#[test]
fn test_failed_restart_falls_back_to_systemctl() {
    let h = Harness::new(FakeHost::root())
        .with_shell(RecordingShell::new().failing_on("service nginx restart", 1));
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, true);

    i.request_restart("nginx");
    i.finish().unwrap();

    assert_eq!(
        h.shell.commands(),
        vec![
            "service nginx restart".to_string(),
            "systemctl restart nginx".to_string(),
        ]
    );
    assert!(
        h.reporter
            .warnings()
            .iter()
            .any(|w| w.contains("trying systemctl instead")),
        "got: {:?}",
        h.reporter.warnings()
    );
}

#[test]
fn test_restart_fails_when_both_mechanisms_fail() {
    let h = Harness::new(FakeHost::root()).with_shell(
        RecordingShell::new()
            .failing_on("service nginx", 1)
            .failing_on("systemctl restart nginx", 5),
    );
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, true);

    i.request_restart("nginx");
    let err = i.finish().unwrap_err();

    assert!(matches!(
        err.downcast_ref::<InstallerError>(),
        Some(InstallerError::CommandFailed { code: Some(5), .. })
    ));
}

#[test]
fn test_failed_install_aborts_before_restarts() {
    let h = Harness::new(FakeHost::root())
        .with_shell(RecordingShell::new().failing_on("apt-get install", 100));
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, true);

    i.request_packages("nginx");
    i.request_restart("nginx");
    let err = i.finish().unwrap_err();

    assert!(err.to_string().contains("return code 100"), "got: {err}");
    assert_eq!(h.shell.commands().len(), 1);
}

#[test]
fn test_unprivileged_finish_only_reports() {
    let h = Harness::new(FakeHost::unprivileged());
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, true);

    i.request_packages("nginx monit");
    i.request_restart("nginx");
    i.finish().unwrap();

    assert!(h.shell.commands().is_empty());
    let warnings = h.reporter.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("because you aren't root"));
    assert!(warnings[0].ends_with("monit nginx"), "got: {}", warnings[0]);
}

#[test]
fn test_empty_finish_runs_nothing() {
    let h = Harness::new(FakeHost::root());
    let cfg = ServerConfig::new();

    Installer::new(h.ports(), &cfg, true).finish().unwrap();

    assert!(h.shell.commands().is_empty());
    assert!(h.reporter.warnings().is_empty());
}

#[test]
fn test_pending_snapshot_reflects_requests() {
    let h = Harness::new(FakeHost::root());
    let cfg = ServerConfig::new();
    let i = Installer::new(h.ports(), &cfg, true);

    i.request_packages("redis-server");
    i.request_restart("supervisor");

    let pending = i.pending();
    assert!(pending.packages().contains("redis-server"));
    assert!(pending.services().contains("supervisor"));
}
