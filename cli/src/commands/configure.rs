//! `siteforge configure` — configure this machine to host sites.
//!
//! The option list comes from the registry in `siteforge-common`, so the
//! clap arguments are built at runtime rather than derived.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Args, Command, FromArgMatches};
use siteforge_common::{CONFIGURE_OPTIONS, ConfigValue, DefaultContext};

use crate::app::AppContext;
use crate::application::ports::HostSystem;
use crate::application::services::Outcome;
use crate::application::services::configure::{ConfigureRequest, configure};
use crate::application::services::installer::SystemPaths;
use crate::output::TerminalReporter;

pub const BATCH_HELP: &str = "Whether to run in batch mode, i.e. without asking any questions. \
Don't use this on a machine that is already being used.";

/// Arguments for the configure command.
#[derive(Debug, Clone, Default)]
pub struct ConfigureArgs {
    pub batch: bool,
    /// Options given on the command line, keyed by option name.
    pub given: BTreeMap<String, ConfigValue>,
}

impl FromArgMatches for ConfigureArgs {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let given = CONFIGURE_OPTIONS
            .iter()
            .filter_map(|o| o.from_matches(matches).map(|v| (o.name.to_string(), v)))
            .collect();
        Ok(Self {
            batch: matches.get_flag("batch"),
            given,
        })
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

impl Args for ConfigureArgs {
    fn augment_args(cmd: Command) -> Command {
        let cmd = cmd.arg(
            Arg::new("batch")
                .long("batch")
                .action(ArgAction::SetTrue)
                .help(BATCH_HELP),
        );
        CONFIGURE_OPTIONS
            .iter()
            .flat_map(siteforge_common::ConfiguredOption::clap_args)
            .fold(cmd, |cmd, arg| cmd.arg(arg))
    }

    fn augment_args_for_update(cmd: Command) -> Command {
        Self::augment_args(cmd)
    }
}

/// Run the configure command.
///
/// # Errors
///
/// Returns an error if configuration or provisioning fails.
pub fn run(app: &AppContext, args: &ConfigureArgs) -> Result<()> {
    let reporter = TerminalReporter::new(&app.output);
    let request = ConfigureRequest {
        batch: app.batch(args.batch),
        given: args.given.clone(),
        defaults: DefaultContext {
            privileged: app.host.is_privileged(),
            home: dirs::home_dir().unwrap_or_default(),
            virtual_env: std::env::var("VIRTUAL_ENV").ok(),
        },
        paths: SystemPaths::default(),
    };
    match configure(app.ports(&reporter), &app.config_store, &request)? {
        Outcome::Completed => Ok(()),
        Outcome::Cancelled => {
            app.output.cancelled();
            Ok(())
        }
    }
}
