mod application;
mod presentation;

use clap::Parser;
use presentation::cli::Cli;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use xmlpack_core::error::Result;

/// Logs a failed run before handing the error back to the process exit path.
fn log_failure(result: Result<()>) -> Result<()> {
    if let Err(e) = &result {
        tracing::error!(error = %e, "xmlpackdev failed");
    }
    result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    log_failure(application::run(cli))
}
