//! Application service — host configuration use-case.
//!
//! Resolves every registry option, stores the result and provisions the
//! host in two installer sessions: system packages first, then the shared
//! workspace that needs them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::json;
use siteforge_common::{
    CONFIGURE_OPTIONS, ConfigValue, ConfiguredOption, DefaultContext, KNOWN_REPOS, ValueType,
};

use crate::application::ports::ConfigStore;
use crate::application::services::Outcome;
use crate::application::services::installer::{HostPorts, Installer, SystemPaths};
use crate::domain::database::engine;
use crate::domain::shell::ensure_quotable;
use crate::domain::site::local_root;
use crate::domain::{ConfigError, ServerConfig};

const BASE_PACKAGES: &[&str] = &[
    "git subversion python3 python3-dev python3-setuptools python3-pip python3-venv supervisor",
    "libffi-dev libssl-dev",
    "build-essential",
    "swig",
];

const CERTBOT_RENEW: &str = "echo \"0 0,12 * * * root python3 -c 'import random; import time; time.sleep(random.random() * 3600)' && certbot renew -q\" | tee -a /etc/crontab > /dev/null";

/// Input of the `configure` workflow.
#[derive(Debug, Clone)]
pub struct ConfigureRequest {
    pub batch: bool,
    /// Values given on the command line, keyed by option name.
    pub given: BTreeMap<String, ConfigValue>,
    pub defaults: DefaultContext,
    pub paths: SystemPaths,
}

/// Configure this host.
///
/// # Errors
///
/// Returns an error when the configuration file cannot be written, a
/// command fails or a filesystem operation fails.
pub fn configure(
    ports: HostPorts<'_>,
    store: &dyn ConfigStore,
    request: &ConfigureRequest,
) -> Result<Outcome> {
    let privileged = ports.host.is_privileged();
    let target = store.target_path(privileged)?;
    ports.reporter.step(&format!(
        "This will write to configuration file {}",
        target.display()
    ));
    ensure_writable(ports, &target)?;

    let stored = store.load()?.unwrap_or_default();
    let config = resolve_options(ports, &stored, request, privileged)?;

    let system =
        Installer::new(ports, &config, request.batch).with_system_paths(request.paths.clone());
    if !system.confirm("Start configuring your system using above options?", true)? {
        return Ok(Outcome::Cancelled);
    }
    store.save(&config, &target)?;
    ports
        .reporter
        .success(&format!("Wrote config file {}", target.display()));

    provision_system(&system)?;
    system.finish()?;

    let workspace =
        Installer::new(ports, &config, request.batch).with_system_paths(request.paths.clone());
    provision_workspace(&workspace, &request.defaults.home)?;
    workspace.finish()?;

    ports.reporter.success("siteforge configure completed.");
    Ok(Outcome::Completed)
}

fn ensure_writable(ports: HostPorts<'_>, target: &Path) -> Result<()> {
    if let Some(dir) = target.parent() {
        if !ports.fs.exists(dir) {
            ports.fs.create_dir_all(dir)?;
        }
        if !ports.host.can_write(dir) {
            return Err(ConfigError::NoWritePermission {
                path: dir.display().to_string(),
            }
            .into());
        }
    }
    if ports.fs.exists(target) && !ports.host.can_write(target) {
        return Err(ConfigError::NoWritePermission {
            path: target.display().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Command line first, then the stored file, then the registry default.
/// Interactive sessions confirm each value; root-only options are not
/// asked for when not privileged.
fn resolve_options(
    ports: HostPorts<'_>,
    stored: &ServerConfig,
    request: &ConfigureRequest,
    privileged: bool,
) -> Result<ServerConfig> {
    let mut config = ServerConfig::new();
    for option in CONFIGURE_OPTIONS {
        let current = request
            .given
            .get(option.name)
            .or_else(|| stored.get(option.name))
            .cloned()
            .unwrap_or_else(|| option.default_value(&request.defaults));
        let value = if request.batch || (option.root_only && !privileged) {
            current
        } else {
            ask(ports, option, &current)?
        };
        config.set(option.name, value);
    }
    Ok(config)
}

fn ask(ports: HostPorts<'_>, option: &ConfiguredOption, current: &ConfigValue) -> Result<ConfigValue> {
    let prompt = format!("- {} ({})", option.name, option.help);
    let prompter = ports.prompter;
    match option.value_type {
        ValueType::Flag => Ok(prompter.toggle(&prompt, current.as_flag())?.into()),
        ValueType::Choice(list) => {
            let choices = list();
            let text = current.as_text();
            let default = choices.iter().position(|c| *c == text).unwrap_or(0);
            let picked = prompter.select(&prompt, &choices, default)?;
            Ok(choices.get(picked).copied().unwrap_or_default().into())
        }
        ValueType::Text | ValueType::Path => {
            let answer = prompter.input(&prompt, &current.as_text())?;
            Ok(option.parse(&answer)?)
        }
    }
}

fn provision_system(i: &Installer<'_>) -> Result<()> {
    let cfg = i.config();
    if i.is_privileged() && i.confirm("Upgrade the system?", true)? {
        i.batched(|i| {
            i.run("apt-get update -y")?;
            i.run("apt-get upgrade -y")
        })?;
    }

    for packages in BASE_PACKAGES {
        i.request_packages(packages);
    }
    if i.is_privileged() {
        i.request_packages("nginx uwsgi-plugin-python3");
        i.request_packages("logrotate");
        i.request_restart("nginx");
    }
    if cfg.flag("devtools") {
        i.request_packages("swig graphviz sqlite3");
    }
    if cfg.flag("monit") {
        i.request_packages("monit");
    }
    if cfg.flag("redis") {
        i.request_packages("redis-server");
    }
    if let Some(db) = engine(&cfg.db_engine()) {
        let descriptor = db.descriptor();
        i.request_packages(&descriptor.system_packages.join(" "));
        if let Some(service) = descriptor.service_name {
            i.request_restart(service);
        }
    }
    if cfg.flag("appy") {
        i.request_packages("libreoffice python3-uno");
        i.request_packages("tidy");
        i.request_restart("supervisor");
    }
    if cfg.flag("ldap") {
        i.request_packages("slapd ldap-utils");
    }

    for key in ["log_base", "backups_base"] {
        let Some(path) = cfg.path(key) else {
            i.ports().reporter.warn(&format!("{key} is empty, nothing to create"));
            continue;
        };
        if i.require_privilege(&format!("creating {key} {}", path.display())) {
            i.ensure_dir(&path, key)?;
        }
    }
    Ok(())
}

fn provision_workspace(i: &Installer<'_>, home: &Path) -> Result<()> {
    let cfg = i.config();
    let reporter = i.ports().reporter;
    let mut go_bases: Vec<PathBuf> = Vec::new();

    if cfg.flag("clone") {
        reporter.step("Installing repositories for shared-env...");
        let env = cfg.path("shared_env").ok_or(ConfigError::MissingSharedEnv)?;
        i.ensure_virtualenv(&env)?;
        let repos_base = cfg
            .path("repos_base")
            .unwrap_or_else(|| env.join(cfg.repos_link()));
        i.ensure_dir(&repos_base, "base directory for repositories")?;
        let repos: Vec<_> = KNOWN_REPOS.iter().filter(|r| r.git_repo.is_some()).collect();
        if i.confirm(&format!("Clone repositories to {}?", repos_base.display()), true)? {
            i.batched(|i| repos.iter().try_for_each(|r| i.clone_repo(r, &repos_base)))?;
        }
        if i.confirm(&format!("Install cloned repositories to {}?", env.display()), true)? {
            i.batched(|i| {
                repos
                    .iter()
                    .try_for_each(|r| i.install_repo(r, &env, &repos_base))
            })?;
        }
        go_bases.push(repos_base);
    }

    if let Some(sites_base) = cfg.sites_base() {
        i.ensure_dir(&sites_base, "base directory for sites")?;
        let package = local_root(cfg, &sites_base);
        if i.ensure_dir(&package, "shared settings package")? {
            let settings = i.render("local_settings.py", &i.context(json!({})))?;
            i.batched(|i| i.write_file(&package.join("__init__.py"), "", false))?;
            i.write_file(&package.join("settings.py"), &settings, false)?;
        }
        go_bases.push(package);
    }

    if !i.is_privileged() {
        let path = home.join(".siteforge_bash_aliases");
        let bases: Vec<String> = go_bases.iter().map(|p| p.display().to_string()).collect();
        let content = i.render(
            "bash_aliases.sh",
            &i.context(json!({ "go_bases": bases.join(" ") })),
        )?;
        if i.write_file(&path, &content, false)? {
            reporter.step(
                "add ~/.siteforge_bash_aliases to your bashrc file for some cool bash shortcut commands",
            );
        }
        return Ok(());
    }

    provision_services(i)
}

fn provision_services(i: &Installer<'_>) -> Result<()> {
    let cfg = i.config();
    let paths = i.system_paths().clone();
    let reporter = i.ports().reporter;

    i.write_logrotate_conf("supervisor.conf", &paths.supervisor_log)?;

    if cfg.flag("monit") {
        let check = i.render("healthcheck.sh", &i.context(json!({})))?;
        i.write_file(&paths.local_bin.join("healthcheck.sh"), &check, true)?;
        let monit = i.render(
            "monit.conf",
            &i.context(json!({ "healthcheck": paths.local_bin.join("healthcheck.sh").display().to_string() })),
        )?;
        i.write_file(&paths.monit_dir.join("siteforge.conf"), &monit, false)?;
    }

    if cfg.flag("appy") {
        let content = i.render("libreoffice_supervisor.conf", &i.context(json!({})))?;
        i.write_supervisor_conf("libreoffice.conf", &content)?;
    }

    if let Some(db) = engine(&cfg.db_engine()) {
        for command in db.after_provisioning() {
            i.run(&command)?;
        }
    }

    if cfg.flag("https") {
        if i.ports().host.has_program("certbot") {
            reporter.step("certbot already installed");
        } else if i.confirm("Install certbot?", true)? {
            let email = cfg.text("admin_email");
            ensure_quotable(&email, "an email address")?;
            i.batched(|i| {
                i.run("apt-get install -y certbot python3-certbot-nginx")?;
                i.run(&format!("certbot register --agree-tos -m {email} -n"))
            })?;
        }
        if i.confirm("Set up automatic certificate renewal?", true)? {
            i.run(CERTBOT_RENEW)?;
        }
    }

    if cfg.flag("ldap") {
        i.run("dpkg-reconfigure slapd")?;
    }
    Ok(())
}
