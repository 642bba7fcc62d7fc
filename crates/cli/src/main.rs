//! Process entry point: loads configuration, wires up the scan loop and
//! the health endpoint, and shuts both down on SIGINT/SIGTERM.

mod scan;

use clap::Parser;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(name = "algo-trade", about = "Prediction-market consensus trading engine")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = algo_trade_core::ConfigLoader::load_from(&cli.config)?;
    config.validate()?;

    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone());

    scan::run(config, shutdown).await
}

/// Spawns a task that cancels `token` on the first SIGINT or SIGTERM,
/// matching the workspace's `CancellationToken`-based shutdown convention.
fn spawn_shutdown_listener(token: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut terminate = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "failed to install SIGTERM handler");
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }

        tracing::info!("shutdown signal received");
        token.cancel();
    });
}
