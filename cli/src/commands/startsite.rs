//! `siteforge startsite` — create a new site.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use clap::builder::PossibleValuesParser;

use crate::app::AppContext;
use crate::application::services::Outcome;
use crate::application::services::startsite::{StartsiteRequest, startsite};
use crate::commands::configure::BATCH_HELP;
use crate::output::TerminalReporter;

/// Arguments for the startsite command.
#[derive(Args, Debug, Clone)]
pub struct StartsiteArgs {
    /// The application to run on the new site
    #[arg(value_name = "APPNAME", value_parser = PossibleValuesParser::new(siteforge_common::app_names()))]
    pub appname: String,

    /// The project name for the new site
    #[arg(value_name = "PRJNAME")]
    pub prjname: String,

    #[arg(long, help = BATCH_HELP)]
    pub batch: bool,

    /// Repositories to clone and install in development mode, e.g. "lino xl"
    #[arg(long, default_value = "")]
    pub dev_repos: String,

    /// Full path of a shared virtualenv to use for this site
    #[arg(long)]
    pub shared_env: Option<PathBuf>,

    /// The URL where this site is published
    #[arg(long)]
    pub server_url: Option<String>,

    /// Database engine of the new site
    #[arg(long, value_parser = PossibleValuesParser::new(siteforge_common::engine_names()))]
    pub db_engine: Option<String>,

    /// Database user name (defaults to the project name)
    #[arg(long)]
    pub db_user: Option<String>,

    /// Database password (generated when empty)
    #[arg(long)]
    pub db_password: Option<String>,
}

/// Run the startsite command.
///
/// # Errors
///
/// Returns an error if the site cannot be created.
pub fn run(app: &AppContext, args: &StartsiteArgs) -> Result<()> {
    let reporter = TerminalReporter::new(&app.output);
    let request = StartsiteRequest {
        appname: args.appname.clone(),
        prjname: args.prjname.clone(),
        batch: app.batch(args.batch),
        dev_repos: args.dev_repos.split_whitespace().map(str::to_string).collect(),
        shared_env: args.shared_env.clone(),
        server_url: args.server_url.clone(),
        db_engine: args.db_engine.clone(),
        db_user: args.db_user.clone(),
        db_password: args.db_password.clone(),
        ..StartsiteRequest::default()
    };
    match startsite(app.ports(&reporter), &app.config_store, &request)? {
        Outcome::Completed => Ok(()),
        Outcome::Cancelled => {
            app.output.cancelled();
            Ok(())
        }
    }
}
