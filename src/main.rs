//! gh-transport server.
//!
//! Serves the GitHub REST API on a local port by shelling out to an
//! authenticated `gh`.
//!
//! ```text
//!   REST client ──HTTP──▶ gh-transport ──argv/stdin──▶ gh api ──▶ GitHub
//!               ◀─HTTP─── (status, Link, body) ◀─stdout/stderr/exit──
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use gh_transport::config::{load_config, TransportConfig};
use gh_transport::observability::{logging, metrics};
use gh_transport::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "gh-transport")]
#[command(about = "Serve REST requests through the gh command line", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overrides the configuration.
    #[arg(short, long)]
    bind: Option<String>,

    /// Program name or path, overrides the configuration.
    #[arg(short, long)]
    program: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => TransportConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(program) = cli.program {
        config.program.name = program;
    }

    logging::init_tracing(&config.observability.log_level);

    tracing::info!("gh-transport v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        program = %config.program.name,
        bind_address = %config.listener.bind_address,
        timeout_secs = config.program.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&bind_address).await?;

    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
