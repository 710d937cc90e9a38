//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Configure a host and create framework sites on it
#[derive(Parser)]
#[command(
    name = "siteforge",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log every command and decision to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Configure this machine to host sites
    Configure(commands::configure::ConfigureArgs),

    /// Create a new site
    Startsite(commands::startsite::StartsiteArgs),

    /// List known applications, front ends and database engines
    List,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;
        if let Command::Version = command {
            commands::version::run(json);
            return Ok(());
        }
        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            json,
        })?;
        match command {
            Command::Configure(args) => commands::configure::run(&app, &args),
            Command::Startsite(args) => commands::startsite::run(&app, &args),
            Command::List => commands::list::run(&app),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => Ok(()),
        }
    }
}
