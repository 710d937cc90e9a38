//! `siteforge config` — show and set configuration values.

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use crate::app::AppContext;
use crate::application::ports::{ConfigStore, HostSystem};
use crate::domain::{ConfigError, validate_config_key};
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the stored configuration and where it was read from
    Show,
    /// Set one configuration value
    Set {
        /// Configuration key (e.g. `usergroup`)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or written.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
    }
}

fn show_config(app: &AppContext) -> Result<()> {
    let store = &app.config_store;
    let config = store.load()?.ok_or(ConfigError::NotConfigured)?;
    let paths: Vec<String> = store
        .found_paths()
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    if app.is_json() {
        return json::print(&json!({ "files": paths, "config": config }));
    }
    app.output.header(&format!("Configuration ({})", paths.join(", ")));
    for (key, value) in config.iter() {
        app.output.row(key, 16, &value.to_string());
    }
    Ok(())
}

fn set_config(app: &AppContext, key: &str, raw: &str) -> Result<()> {
    let option = validate_config_key(key)?;
    let value = option.parse(raw)?;

    let store = &app.config_store;
    let mut config = store.load()?.unwrap_or_default();
    config.set(key, value.clone());
    let path = match store.found_paths().pop() {
        Some(path) => path,
        None => store.target_path(app.host.is_privileged())?,
    };
    store.save(&config, &path)?;

    app.output.success(&format!("Set {key} = {value}"));
    Ok(())
}
