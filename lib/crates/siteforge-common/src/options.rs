//! Registry of host-level settings written by `siteforge configure`.
//!
//! Every entry becomes one key of the configuration file and one
//! command-line option of the `configure` command.

use std::path::PathBuf;

use crate::value::{ConfigValue, ValueError, parse_flag};
use crate::{catalog, db};

/// Facts about the running session that registry defaults depend on.
#[derive(Debug, Clone)]
pub struct DefaultContext {
    pub privileged: bool,
    pub home: PathBuf,
    /// Value of `VIRTUAL_ENV` when the tool runs inside an activated environment.
    pub virtual_env: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub enum ValueType {
    Text,
    Path,
    Flag,
    Choice(fn() -> Vec<&'static str>),
}

#[derive(Debug, Clone, Copy)]
pub enum OptionDefault {
    Text(&'static str),
    Flag(bool),
    Computed(fn(&DefaultContext) -> ConfigValue),
}

#[derive(Debug, Clone, Copy)]
pub struct ConfiguredOption {
    /// Key in the configuration file (`sites_base`).
    pub name: &'static str,
    pub default: OptionDefault,
    pub help: &'static str,
    /// Not asked for when the session is not privileged.
    pub root_only: bool,
    pub value_type: ValueType,
}

const fn opt(
    name: &'static str,
    default: OptionDefault,
    help: &'static str,
    root_only: bool,
    value_type: ValueType,
) -> ConfiguredOption {
    ConfiguredOption {
        name,
        default,
        help,
        root_only,
        value_type,
    }
}

fn sites_base(ctx: &DefaultContext) -> ConfigValue {
    if ctx.privileged {
        "/usr/local/lino".into()
    } else {
        ctx.home.join("lino").display().to_string().into()
    }
}

fn shared_env(ctx: &DefaultContext) -> ConfigValue {
    ctx.virtual_env.clone().unwrap_or_default().into()
}

fn repos_base(ctx: &DefaultContext) -> ConfigValue {
    if ctx.virtual_env.as_deref().is_none_or(str::is_empty) {
        return "".into();
    }
    if ctx.privileged {
        "/usr/local/lino/repositories".into()
    } else {
        ctx.home.join("lino").join("repositories").display().to_string().into()
    }
}

fn when_privileged(ctx: &DefaultContext) -> ConfigValue {
    ctx.privileged.into()
}

fn unless_privileged(ctx: &DefaultContext) -> ConfigValue {
    (!ctx.privileged).into()
}

fn db_engine(ctx: &DefaultContext) -> ConfigValue {
    if ctx.privileged { "mysql" } else { "sqlite3" }.into()
}

use OptionDefault::{Computed, Flag, Text};

/// Declaration order is the order in which `configure` asks its questions.
#[rustfmt::skip]
pub static CONFIGURE_OPTIONS: &[ConfiguredOption] = &[
    opt("sites_base", Computed(sites_base), "Base directory for sites on this server", false, ValueType::Path),
    opt("local_prefix", Text("lino_local"), "Prefix for local server-wide importable packages", true, ValueType::Text),
    opt("shared_env", Computed(shared_env), "Directory with shared virtualenv", false, ValueType::Path),
    opt("repos_base", Computed(repos_base), "Base directory for shared code repositories", false, ValueType::Path),
    opt("clone", Flag(false), "Clone all contributor repositories and install them to the shared-env", false, ValueType::Flag),
    opt("branch", Text("master"), "The git branch to use for --clone", false, ValueType::Text),
    opt("webdav", Flag(true), "Whether to enable webdav on new sites", true, ValueType::Flag),
    opt("backups_base", Text("/var/backups/lino"), "Base directory for backups", true, ValueType::Path),
    opt("log_base", Text("/var/log/lino"), "Base directory for log files", true, ValueType::Path),
    opt("usergroup", Text("www-data"), "User group for files to be shared with the web server", false, ValueType::Text),
    opt("supervisor_dir", Text("/etc/supervisor/conf.d"), "Directory for supervisor config files", true, ValueType::Path),
    opt("env_link", Text("env"), "Link to virtualenv (relative to project dir)", false, ValueType::Text),
    opt("repos_link", Text("repositories"), "Link to code repositories (relative to virtualenv)", false, ValueType::Text),
    opt("appy", Computed(when_privileged), "Whether this server provides appypod and LibreOffice", true, ValueType::Flag),
    opt("redis", Computed(when_privileged), "Whether this server provides redis", true, ValueType::Flag),
    opt("devtools", Computed(unless_privileged), "Whether to install development tools (build docs and run tests)", false, ValueType::Flag),
    opt("server_domain", Text("localhost"), "Domain name of this server", false, ValueType::Text),
    opt("https", Flag(false), "Whether this server uses secure http", true, ValueType::Flag),
    opt("ldap", Flag(false), "Whether this server works as an LDAP server", true, ValueType::Flag),
    opt("monit", Flag(false), "Whether this server uses monit", true, ValueType::Flag),
    opt("db_engine", Computed(db_engine), "Default database engine for new sites", false, ValueType::Choice(db::engine_names)),
    opt("db_port", Text(""), "Default database port to use for new sites", false, ValueType::Text),
    opt("db_host", Text("localhost"), "Default database host name for new sites", false, ValueType::Text),
    opt("db_user", Text(""), "Default database user name for new sites. Leave empty to use the project name", false, ValueType::Text),
    opt("db_password", Text(""), "Default database password for new sites. Leave empty to generate a secure password", false, ValueType::Text),
    opt("admin_name", Text("Joe Dow"), "The full name of the server administrator", false, ValueType::Text),
    opt("admin_email", Text("joe@example.com"), "The email address of the server administrator", false, ValueType::Text),
    opt("time_zone", Text("Europe/Brussels"), "The TIME_ZONE to set on new sites", false, ValueType::Text),
    opt("linod", Flag(true), "Whether new sites use linod", true, ValueType::Flag),
    opt("languages", Text("en"), "The languages to set on new sites", false, ValueType::Text),
    opt("front_end", Text("lino.modlib.extjs"), "The front end to use on new sites", false, ValueType::Choice(catalog::front_ends)),
];

#[must_use]
pub fn find_option(name: &str) -> Option<&'static ConfiguredOption> {
    CONFIGURE_OPTIONS.iter().find(|o| o.name == name)
}

impl ConfiguredOption {
    /// Command-line spelling of the option (`sites-base`).
    #[must_use]
    pub fn flag_name(&self) -> String {
        self.name.replace('_', "-")
    }

    #[must_use]
    pub fn is_flag(&self) -> bool {
        matches!(self.value_type, ValueType::Flag)
    }

    #[must_use]
    pub fn choices(&self) -> Option<Vec<&'static str>> {
        match self.value_type {
            ValueType::Choice(list) => Some(list()),
            _ => None,
        }
    }

    #[must_use]
    pub fn default_value(&self, ctx: &DefaultContext) -> ConfigValue {
        match self.default {
            OptionDefault::Text(s) => ConfigValue::from(s),
            OptionDefault::Flag(b) => ConfigValue::Flag(b),
            OptionDefault::Computed(f) => f(ctx),
        }
    }

    /// Turn a raw answer into a value of the right kind. Trailing slashes
    /// are stripped from text and path answers.
    pub fn parse(&self, raw: &str) -> Result<ConfigValue, ValueError> {
        match self.value_type {
            ValueType::Flag => parse_flag(raw).map(ConfigValue::Flag).ok_or_else(|| {
                ValueError::NotAFlag {
                    key: self.name.to_string(),
                    value: raw.to_string(),
                }
            }),
            ValueType::Choice(list) => {
                let valid = list();
                if valid.contains(&raw) {
                    Ok(ConfigValue::from(raw))
                } else {
                    Err(ValueError::NotAChoice {
                        key: self.name.to_string(),
                        value: raw.to_string(),
                        valid: valid.join(", "),
                    })
                }
            }
            ValueType::Text | ValueType::Path => {
                let trimmed = raw.trim().trim_end_matches('/');
                if trimmed.is_empty() && raw.trim().starts_with('/') {
                    Ok(ConfigValue::from("/"))
                } else {
                    Ok(ConfigValue::from(trimmed))
                }
            }
        }
    }
}

#[cfg(feature = "clap")]
mod cli_args {
    use clap::builder::PossibleValuesParser;
    use clap::{Arg, ArgAction, ArgMatches};

    use super::{ConfiguredOption, ValueType};
    use crate::value::ConfigValue;

    impl ConfiguredOption {
        /// Arguments declaring this option on a clap command. Flags get a
        /// `--x` / `--no-x` pair.
        #[must_use]
        pub fn clap_args(&self) -> Vec<Arg> {
            let long = self.flag_name();
            match self.value_type {
                ValueType::Flag => vec![
                    Arg::new(self.name)
                        .long(long.clone())
                        .action(ArgAction::SetTrue)
                        .help(self.help),
                    Arg::new(format!("no_{}", self.name))
                        .long(format!("no-{long}"))
                        .action(ArgAction::SetTrue)
                        .conflicts_with(self.name)
                        .hide(true),
                ],
                ValueType::Choice(list) => vec![
                    Arg::new(self.name)
                        .long(long)
                        .value_parser(PossibleValuesParser::new(list()))
                        .help(self.help),
                ],
                ValueType::Text | ValueType::Path => vec![
                    Arg::new(self.name)
                        .long(long)
                        .value_name(self.name.to_ascii_uppercase())
                        .help(self.help),
                ],
            }
        }

        /// The value given on the command line, if any.
        #[must_use]
        pub fn from_matches(&self, matches: &ArgMatches) -> Option<ConfigValue> {
            if self.is_flag() {
                if matches.get_flag(self.name) {
                    return Some(ConfigValue::Flag(true));
                }
                if matches.get_flag(&format!("no_{}", self.name)) {
                    return Some(ConfigValue::Flag(false));
                }
                return None;
            }
            matches
                .get_one::<String>(self.name)
                .and_then(|raw| self.parse(raw).ok())
        }
    }
}
