//! The `configure` workflow against a temporary host.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::path::Path;

use siteforge_cli::application::ports::ConfigStore;
use siteforge_cli::application::services::Outcome;
use siteforge_cli::application::services::configure::{ConfigureRequest, configure};
use siteforge_cli::application::services::installer::SystemPaths;
use siteforge_cli::domain::ConfigError;
use siteforge_cli::infra::config::TomlConfigStore;
use siteforge_common::{ConfigValue, KNOWN_REPOS};

use crate::helpers::{defaults_for, path_text, system_paths_in, write};
use crate::mocks::{FakeHost, Harness};

fn store_in(root: &Path) -> TomlConfigStore {
    TomlConfigStore::single(root.join("conf").join("siteforge.conf"))
}

fn request(root: &Path, batch: bool, privileged: bool) -> ConfigureRequest {
    let mut given = BTreeMap::new();
    given.insert("sites_base".to_string(), ConfigValue::from(path_text(&root.join("sites"))));
    ConfigureRequest {
        batch,
        given,
        defaults: defaults_for(root, privileged),
        paths: SystemPaths::default(),
    }
}

fn give(req: &mut ConfigureRequest, key: &str, value: impl Into<ConfigValue>) {
    req.given.insert(key.to_string(), value.into());
}

fn saved(root: &Path) -> String {
    std::fs::read_to_string(root.join("conf").join("siteforge.conf")).expect("config file")
}

#[test]
fn test_unprivileged_batch_configure_writes_workspace() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = Harness::new(FakeHost::unprivileged());
    let store = store_in(dir.path());

    let outcome = configure(h.ports(), &store, &request(dir.path(), true, false)).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    let text = saved(dir.path());
    assert!(text.starts_with("# generated by siteforge"), "got: {text}");
    assert!(text.contains(&format!("sites_base = \"{}\"", path_text(&dir.path().join("sites")))));

    let package = dir.path().join("sites").join("lino_local");
    assert!(package.join("__init__.py").is_file());
    let settings = std::fs::read_to_string(package.join("settings.py")).unwrap();
    assert!(settings.contains("TIME_ZONE = \"Europe/Brussels\""));

    let aliases = std::fs::read_to_string(dir.path().join(".siteforge_bash_aliases")).unwrap();
    assert!(aliases.contains(&path_text(&package)), "got: {aliases}");
    assert!(aliases.contains("alias pp='per_project'"));

    assert!(h.shell.commands().is_empty(), "got: {:?}", h.shell.commands());
}

#[test]
fn test_unprivileged_configure_skips_system_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = Harness::new(FakeHost::unprivileged());
    let store = store_in(dir.path());

    configure(h.ports(), &store, &request(dir.path(), true, false)).unwrap();

    let warnings = h.reporter.warnings();
    assert!(
        warnings
            .iter()
            .any(|w| w == "Skipped creating log_base /var/log/lino because you aren't root."),
        "got: {warnings:?}"
    );
    assert!(
        warnings.iter().any(|w| w.contains("were not installed because you aren't root")),
        "got: {warnings:?}"
    );
}

#[test]
fn test_declined_start_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = Harness::new(FakeHost::unprivileged()).with_keys("n");
    let store = store_in(dir.path());

    let outcome = configure(h.ports(), &store, &request(dir.path(), false, false)).unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(store.load().unwrap().is_none());
    assert!(!dir.path().join("sites").exists());
    assert_eq!(
        h.prompter.shown(),
        vec!["Start configuring your system using above options? [y or n]".to_string()]
    );
}

#[test]
fn test_interactive_configure_skips_root_only_questions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = Harness::new(FakeHost::unprivileged()).with_keys("n");
    let store = store_in(dir.path());

    configure(h.ports(), &store, &request(dir.path(), false, false)).unwrap();

    let asked = h.prompter.asked();
    assert!(asked.iter().any(|q| q.starts_with("- usergroup (")));
    assert!(asked.iter().any(|q| q.starts_with("- db_engine (")));
    assert!(!asked.iter().any(|q| q.starts_with("- webdav (")));
    assert!(!asked.iter().any(|q| q.starts_with("- log_base (")));
}

#[test]
fn test_interactive_answers_are_stored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let elsewhere = dir.path().join("elsewhere");
    // Spare keys: how many mode fixes are offered depends on the umask.
    let h = Harness::new(FakeHost::unprivileged()).with_keys("yyyyyyyyyy");
    // sites_base is asked first.
    h.prompter.push_input(&format!("{}/", path_text(&elsewhere)));
    let store = store_in(dir.path());

    let outcome = configure(h.ports(), &store, &request(dir.path(), false, false)).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(
        h.prompter.asked().first().map(String::as_str),
        Some("- sites_base (Base directory for sites on this server)")
    );
    let cfg = store.load().unwrap().unwrap();
    assert_eq!(cfg.sites_base(), Some(elsewhere.clone()));
    assert!(elsewhere.join("lino_local").join("settings.py").is_file());
}

#[test]
fn test_stored_values_are_reused() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(&dir.path().join("conf/siteforge.conf"), "usergroup = \"staff\"\n");
    let h = Harness::new(FakeHost::unprivileged());
    let store = store_in(dir.path());

    configure(h.ports(), &store, &request(dir.path(), true, false)).unwrap();

    assert!(saved(dir.path()).contains("usergroup = \"staff\""));
}

#[test]
fn test_command_line_beats_stored_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(&dir.path().join("conf/siteforge.conf"), "usergroup = \"staff\"\n");
    let h = Harness::new(FakeHost::unprivileged());
    let store = store_in(dir.path());
    let mut req = request(dir.path(), true, false);
    give(&mut req, "usergroup", "devs");

    configure(h.ports(), &store, &req).unwrap();

    let cfg = store.load().unwrap().unwrap();
    assert_eq!(cfg.usergroup(), "devs");
}

#[test]
fn test_unwritable_config_location_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = Harness::new(FakeHost::unprivileged().read_only());
    let store = store_in(dir.path());

    let err = configure(h.ports(), &store, &request(dir.path(), true, false)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::NoWritePermission { .. })
    ));
}

#[test]
fn test_clone_requires_shared_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = Harness::new(FakeHost::unprivileged());
    let store = store_in(dir.path());
    let mut req = request(dir.path(), true, false);
    give(&mut req, "clone", true);

    let err = configure(h.ports(), &store, &req).unwrap_err();

    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::MissingSharedEnv)
    );
}

#[test]
fn test_clone_installs_every_cloneable_repository() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = Harness::new(FakeHost::unprivileged());
    let store = store_in(dir.path());
    let env = dir.path().join("env");
    let repos = dir.path().join("repositories");
    let mut req = request(dir.path(), true, false);
    give(&mut req, "clone", true);
    give(&mut req, "shared_env", path_text(&env));
    give(&mut req, "repos_base", path_text(&repos));

    configure(h.ports(), &store, &req).unwrap();

    let cloneable = KNOWN_REPOS.iter().filter(|r| r.git_repo.is_some()).count();
    let commands = h.shell.commands();
    assert_eq!(commands[0], format!("python3 -m venv {}", env.display()));
    assert_eq!(commands.iter().filter(|c| c.starts_with("git clone")).count(), cloneable);
    assert_eq!(commands.iter().filter(|c| c.contains("pip install -e")).count(), cloneable);
    assert!(
        h.shell
            .calls()
            .iter()
            .filter(|(c, _)| c.starts_with("git clone"))
            .all(|(_, cwd)| cwd.as_deref() == Some(repos.as_path()))
    );

    let aliases = std::fs::read_to_string(dir.path().join(".siteforge_bash_aliases")).unwrap();
    assert!(aliases.contains(&path_text(&repos)));
}

#[test]
fn test_privileged_batch_configure_flushes_once_per_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = system_paths_in(dir.path());
    let h = Harness::new(FakeHost::root());
    let store = store_in(dir.path());
    let mut req = request(dir.path(), true, true);
    give(&mut req, "log_base", path_text(&dir.path().join("log")));
    give(&mut req, "backups_base", path_text(&dir.path().join("backups")));
    give(&mut req, "supervisor_dir", path_text(&dir.path().join("supervisor")));
    req.paths = paths.clone();

    let outcome = configure(h.ports(), &store, &req).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    let commands = h.shell.commands();
    assert_eq!(commands[0], "apt-get update -y");
    assert_eq!(commands[1], "apt-get upgrade -y");
    let installs: Vec<_> = commands.iter().filter(|c| c.starts_with("apt-get install")).collect();
    assert_eq!(installs.len(), 1, "got: {commands:?}");
    assert!(installs[0].starts_with("apt-get install -y "));
    assert!(installs[0].contains(" nginx "));
    assert!(installs[0].contains("mysql-server"));
    assert!(installs[0].contains("redis-server"));
    assert!(commands.contains(&"service mysql restart".to_string()));
    assert!(commands.contains(&"mysql_secure_installation".to_string()));
    assert_eq!(commands.last().map(String::as_str), Some("service supervisor restart"));

    assert!(dir.path().join("log").is_dir());
    assert!(dir.path().join("backups").is_dir());
    assert!(paths.logrotate_dir.join("supervisor.conf").is_file());
    assert!(dir.path().join("supervisor/libreoffice.conf").is_file());
    assert!(!dir.path().join(".siteforge_bash_aliases").exists());
}
