//! Propane-Watch main entry point
//!
//! This is the command-line interface for the MyFuelPortal tank poller.

use anyhow::{bail, Context};
use clap::Parser;
use propane_watch::config::{load_config, Config};
use propane_watch::output::{print_snapshot, OutputFormat};
use propane_watch::{poll, ErrorKind, PollCoordinator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Propane-Watch: tank telemetry from a MyFuelPortal account
///
/// Propane-Watch logs into your fuel vendor's portal, reads the tank page on a
/// fixed schedule, and prints the latest level, volume, delivery date and
/// price after every poll.
#[derive(Parser, Debug)]
#[command(name = "propane-watch")]
#[command(version)]
#[command(about = "Poll a MyFuelPortal tank page", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run the first refresh, print the reading, and exit
    #[arg(long, conflicts_with = "check_login")]
    once: bool,

    /// Log in once to validate the credentials and exit
    #[arg(long, conflicts_with = "once")]
    check_login: bool,

    /// Output format for readings (text or json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!(
        "Configuration loaded for vendor '{}' ({})",
        config.portal.vendor,
        config.portal.resolved_base_url()
    );

    if cli.check_login {
        handle_check_login(&config).await
    } else {
        handle_poll(&config, cli.once, cli.format).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("propane_watch=info,warn"),
            1 => EnvFilter::new("propane_watch=debug,info"),
            2 => EnvFilter::new("propane_watch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --check-login mode: one login attempt, reported by failure kind
async fn handle_check_login(config: &Config) -> anyhow::Result<()> {
    let mut coordinator = PollCoordinator::from_config(config)?;
    let result = coordinator.client_mut().login().await;

    let client = coordinator.client();
    let account = format!(
        "{} ({}, vendor '{}')",
        client.options().base_url,
        client.credentials().email(),
        client.credentials().vendor()
    );
    coordinator.shutdown();

    match result {
        Ok(()) => {
            println!("✓ Logged in to {}", account);
            Ok(())
        }
        Err(e) => match e.kind() {
            ErrorKind::Authentication => bail!("invalid auth: {}", e.message()),
            ErrorKind::Connection => bail!("cannot connect: {}", e.message()),
            ErrorKind::Parsing => bail!("unexpected login page: {}", e.message()),
        },
    }
}

/// Handles the main polling operation
async fn handle_poll(config: &Config, once: bool, format: OutputFormat) -> anyhow::Result<()> {
    let mut coordinator = PollCoordinator::from_config(config)?;

    if let Err(e) = coordinator.client_mut().login().await {
        coordinator.shutdown();
        return Err(e).context("Initial login failed");
    }

    if let Err(e) = coordinator.first_refresh().await {
        coordinator.shutdown();
        return Err(e).context("Initial refresh failed");
    }
    print_snapshot(&coordinator.snapshot(), format)?;

    if once {
        coordinator.shutdown();
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl-C, shutting down");
    };

    poll::run(&mut coordinator, shutdown, |state| {
        let snapshot = propane_watch::output::Snapshot::from_state(state);
        if let Err(e) = print_snapshot(&snapshot, format) {
            tracing::error!("Failed to print reading: {}", e);
        }
    })
    .await;

    Ok(())
}
