use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pyro_core::{ConfigLoader, HandlerRegistry, Session};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod builtin;
mod presence;

use presence::LogPresence;

#[derive(Parser)]
#[command(name = "pyrorpc", about = "Keep a presence profile up to date")]
#[command(version)]
struct Cli {
    /// Configuration document
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Index of the profile to show first
    #[arg(short, long, default_value_t = 0)]
    profile: usize,

    /// Seconds between reloads, overrides the configuration
    #[arg(short, long)]
    interval: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut loaded = ConfigLoader::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(secs) = cli.interval {
        loaded.config.reload_interval_secs = Some(secs);
    }

    let mut registry = HandlerRegistry::new();
    builtin::register_all(&mut registry).context("Failed to register built-in handlers")?;

    let client = LogPresence::new(&loaded.config.client_id);
    let mut session = Session::from_config(loaded, &registry, Box::new(client))
        .context("Failed to create session")?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutting down");
        }
        on_signal.cancel();
    });

    drive(&mut session, cli.profile, cancel).await
}

/// Start the session, run the update loop until `cancel` fires, then close
///
/// A failed first push leaves the profile active, so the loop still runs
/// and retries it. Any other start failure closes the session and ends.
async fn drive(session: &mut Session, profile: usize, cancel: CancellationToken) -> Result<()> {
    match session.start_with(profile).await {
        Ok(()) => {}
        Err(err) if err.is_recoverable() && session.state().active_profile().is_some() => {
            tracing::warn!(error = %err, "Initial presence update failed, retrying next tick");
        }
        Err(err) => {
            if let Err(close_err) = session.close().await {
                tracing::warn!(error = %close_err, "Failed to close session");
            }
            return Err(err).context("Failed to start session");
        }
    }

    let result = session.run(cancel).await;
    session.close().await.context("Failed to close session")?;
    result.context("Update loop failed")
}
