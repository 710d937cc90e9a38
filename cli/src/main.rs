//! siteforge - configure a host and create framework sites on it

use clap::Parser;
use siteforge_cli::cli::Cli;
use siteforge_cli::output::OutputContext;
use siteforge_cli::output::json::format_error;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;
    let output = OutputContext::new(cli.no_color, cli.quiet);
    if let Err(e) = cli.run() {
        match json.then(|| format_error(&format!("{e:#}"))) {
            Some(Ok(body)) => eprintln!("{body}"),
            _ => output.error(&e.to_string()),
        }
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
