//! Application service — site creation use-case.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use serde_json::{Value, json};
use siteforge_common::{RepoDescriptor, app_names, engine_names, find_repo};

use crate::application::ports::ConfigStore;
use crate::application::services::Outcome;
use crate::application::services::installer::{HostPorts, Installer, SystemPaths};
use crate::domain::database::{DatabaseEngine, DbCredentials, engine};
use crate::domain::shell::pip_install;
use crate::domain::{ConfigError, ServerConfig, SiteError, SiteLayout, validate_site_name};

const PASSWORD_LEN: usize = 16;

/// Input of the `startsite` workflow. `None` fields fall back to the
/// stored configuration.
#[derive(Debug, Clone, Default)]
pub struct StartsiteRequest {
    pub appname: String,
    pub prjname: String,
    pub batch: bool,
    /// Nicknames of repositories to clone and install in development mode.
    pub dev_repos: Vec<String>,
    pub shared_env: Option<PathBuf>,
    pub server_url: Option<String>,
    pub db_engine: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub paths: SystemPaths,
}

/// Answers gathered before anything is created.
struct SiteAnswers {
    server_url: String,
    admin_name: String,
    admin_email: String,
    creds: DbCredentials,
}

/// Create a new site on this host.
///
/// # Errors
///
/// Returns an error when the host is not configured, the input is invalid,
/// the user is missing the shared group, or a step fails.
pub fn startsite(
    ports: HostPorts<'_>,
    store: &dyn ConfigStore,
    request: &StartsiteRequest,
) -> Result<Outcome> {
    let mut config: ServerConfig = store.load()?.ok_or(ConfigError::NotConfigured)?;
    let app = find_app(&request.appname)?;
    validate_site_name(&request.prjname)?;
    let dev_repos = request
        .dev_repos
        .iter()
        .map(|nick| find_repo(nick).ok_or_else(|| SiteError::UnknownRepo(nick.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(name) = &request.db_engine {
        config.set("db_engine", name.as_str());
    }
    if let Some(env) = &request.shared_env {
        config.set("shared_env", env.display().to_string());
    }
    let db_name = config.db_engine();
    let db = engine(&db_name).ok_or_else(|| SiteError::UnknownEngine {
        name: db_name.clone(),
        valid: engine_names().join(", "),
    })?;

    let i = Installer::new(ports, &config, request.batch).with_system_paths(request.paths.clone());
    i.check_usergroup(&config.usergroup())?;

    let layout = SiteLayout::new(&config, &request.prjname)?;
    if !i.check_overwrite(&layout.project_dir)? {
        return Ok(Outcome::Cancelled);
    }

    let answers = gather(&i, request)?;
    ports.reporter.step(&format!(
        "Creating a new site into {} using {} ...",
        layout.project_dir.display(),
        app.nickname
    ));
    if !i.confirm(&format!("OK to create {}?", layout.project_dir.display()), true)? {
        return Ok(Outcome::Cancelled);
    }

    let env = config.path("shared_env");
    let env_dir = env.clone().unwrap_or_else(|| layout.env_dir.clone());
    let ctx = site_context(&i, app, &layout, &env_dir, &answers);

    if !prepare_env(&i, &layout, env.as_deref())? {
        return Ok(Outcome::Cancelled);
    }
    write_project(&i, &layout, &ctx)?;
    install_packages(&i, app, &dev_repos, db.as_ref(), &env_dir, &layout.repos_dir)?;

    if i.require_privilege("web server and supervisor configuration") {
        configure_web(&i, &layout, &ctx)?;
    }

    i.setup_database(db.as_ref(), &layout.name, &answers.creds)?;
    i.run_in_env_at(&env_dir, "python manage.py prep --noinput", &layout.project_dir)?;
    i.run_in_env_at(
        &env_dir,
        "python manage.py collectstatic --noinput",
        &layout.project_dir,
    )?;
    i.finish()?;

    ports.reporter.success(&format!(
        "The new site {} has been created.",
        layout.name
    ));
    Ok(Outcome::Completed)
}

fn find_app(name: &str) -> Result<&'static RepoDescriptor> {
    find_repo(name)
        .filter(|r| r.settings_module.is_some())
        .ok_or_else(|| {
            SiteError::UnknownApp {
                name: name.to_string(),
                valid: app_names().join(", "),
            }
            .into()
        })
}

/// Random alphanumeric password for a new database user.
#[must_use]
pub fn generate_password() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LEN)
        .map(char::from)
        .collect()
}

fn gather(i: &Installer<'_>, request: &StartsiteRequest) -> Result<SiteAnswers> {
    let cfg = i.config();
    let prjname = &request.prjname;
    let mut server_url = request
        .server_url
        .clone()
        .unwrap_or_else(|| format!("https://{prjname}.{}", cfg.text("server_domain")));
    let mut admin_name = cfg.text("admin_name");
    let mut admin_email = cfg.text("admin_email");
    let mut db_user = request
        .db_user
        .clone()
        .unwrap_or_else(|| cfg.text("db_user"));
    if db_user.is_empty() {
        db_user.clone_from(prjname);
    }
    let mut db_password = request
        .db_password
        .clone()
        .unwrap_or_else(|| cfg.text("db_password"));

    if !i.is_batch() {
        let prompter = i.ports().prompter;
        server_url = prompter.input("Server URL", &server_url)?;
        admin_name = prompter.input("Administrator's full name", &admin_name)?;
        admin_email = prompter.input("Administrator's email address", &admin_email)?;
        db_user = prompter.input("Database user name", &db_user)?;
        db_password = prompter.input("Database user password", &db_password)?;
    }
    if db_password.is_empty() {
        db_password = generate_password();
    }
    Ok(SiteAnswers {
        server_url,
        admin_name,
        admin_email,
        creds: DbCredentials {
            user: db_user,
            password: db_password,
        },
    })
}

fn site_context(
    i: &Installer<'_>,
    app: &RepoDescriptor,
    layout: &SiteLayout,
    env_dir: &Path,
    answers: &SiteAnswers,
) -> Value {
    let cfg = i.config();
    i.context(json!({
        "prjname": layout.name,
        "project_dir": layout.project_dir.display().to_string(),
        "env_dir": env_dir.display().to_string(),
        "repos_dir": layout.repos_dir.display().to_string(),
        "log_dir": layout.project_dir.join("log").display().to_string(),
        "settings_module": layout.settings_module(cfg),
        "appname": app.nickname,
        "app_settings": app.settings_module.unwrap_or_default(),
        "server_url": answers.server_url,
        "admin_name": answers.admin_name,
        "admin_email": answers.admin_email,
        "db_engine": cfg.db_engine(),
        "db_name": layout.name,
        "db_user": answers.creds.user,
        "db_password": answers.creds.password,
        "uwsgi_program": layout.uwsgi_program(),
        "linod_program": layout.linod_program(),
        "privileged": i.is_privileged(),
    }))
}

fn write_project(i: &Installer<'_>, layout: &SiteLayout, ctx: &Value) -> Result<()> {
    let fs = i.ports().fs;
    let dir = &layout.project_dir;
    fs.create_dir_all(dir)?;
    i.check_permissions(dir, false)?;
    let nginx_dir = dir.join("nginx");
    fs.create_dir_all(&nginx_dir)?;
    i.check_permissions(&nginx_dir, false)?;

    let name = &layout.name;
    let files: [(&str, PathBuf, bool); 6] = [
        ("site_settings.py", dir.join("settings.py"), false),
        ("manage.py", dir.join("manage.py"), true),
        ("wsgi.py", dir.join("wsgi.py"), false),
        ("nginx_site.conf", nginx_dir.join(format!("{name}.conf")), false),
        ("uwsgi.ini", nginx_dir.join(format!("{name}_uwsgi.ini")), false),
        ("uwsgi_supervisor.conf", nginx_dir.join(format!("{name}-uwsgi.conf")), false),
    ];
    i.batched(|i| {
        i.write_file(&dir.join("__init__.py"), "", false)?;
        for (template, path, executable) in &files {
            let content = i.render(template, ctx)?;
            i.write_file(path, &content, *executable)?;
        }
        Ok(())
    })?;

    let log = dir.join("log");
    match (&layout.log_target, i.is_privileged()) {
        (Some(target), true) => {
            if i.ensure_dir(target, "log directory")? {
                fs.symlink(target, &log)?;
            }
        }
        _ => {
            fs.create_dir_all(&log)?;
            i.check_permissions(&log, false)?;
        }
    }
    let media = dir.join("media");
    fs.create_dir_all(&media)?;
    i.check_permissions(&media, false)
}

/// Runs before any project file is written. Returns `false`, with
/// nothing created, when the user declined creating the environment.
fn prepare_env(i: &Installer<'_>, layout: &SiteLayout, shared: Option<&Path>) -> Result<bool> {
    let Some(shared) = shared else {
        return i.ensure_virtualenv(&layout.env_dir);
    };
    if !i.ensure_virtualenv(shared)? {
        return Ok(false);
    }
    let fs = i.ports().fs;
    fs.create_dir_all(&layout.project_dir)?;
    if !fs.exists(&layout.env_dir) {
        fs.symlink(shared, &layout.env_dir)?;
    }
    Ok(true)
}

fn install_packages(
    i: &Installer<'_>,
    app: &RepoDescriptor,
    dev_repos: &[&RepoDescriptor],
    db: &dyn DatabaseEngine,
    env: &Path,
    repos_dir: &Path,
) -> Result<()> {
    i.batched(|i| {
        if !dev_repos.is_empty() {
            i.ports().fs.create_dir_all(repos_dir)?;
            for repo in dev_repos {
                i.clone_repo(repo, repos_dir)?;
                i.install_repo(repo, env, repos_dir)?;
            }
        }
        if !dev_repos.iter().any(|r| r.nickname == app.nickname) {
            let package = if app.package_name.is_empty() {
                app.app_package().unwrap_or(app.nickname)
            } else {
                app.package_name
            };
            i.run_in_env(env, &pip_install(package))?;
        }
        let drivers = db.descriptor().driver_packages;
        if !drivers.is_empty() {
            i.run_in_env(env, &pip_install(&drivers.join(" ")))?;
        }
        if i.is_privileged() {
            i.run_in_env(env, &pip_install("-U uwsgi"))?;
        }
        Ok(())
    })
}

fn configure_web(i: &Installer<'_>, layout: &SiteLayout, ctx: &Value) -> Result<()> {
    let paths = i.system_paths().clone();
    let fs = i.ports().fs;
    let filename = format!("{}.conf", layout.name);

    let available = paths.nginx_available.join(&filename);
    let enabled = paths.nginx_enabled.join(&filename);
    let nginx = i.render("nginx_site.conf", ctx)?;
    if i.write_file(&available, &nginx, false)? && i.check_overwrite(&enabled)? {
        fs.symlink(&available, &enabled)?;
    }
    i.request_restart("nginx");

    let uwsgi = i.render("uwsgi_supervisor.conf", ctx)?;
    i.write_supervisor_conf(&format!("{}.conf", layout.uwsgi_program()), &uwsgi)?;
    if i.config().flag("linod") {
        let linod = i.render("linod_supervisor.conf", ctx)?;
        i.write_supervisor_conf(&format!("{}.conf", layout.linod_program()), &linod)?;
    }
    if let Some(target) = &layout.log_target {
        i.write_logrotate_conf(&filename, &target.join("lino.log"))?;
    }
    Ok(())
}
