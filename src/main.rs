//! Edge trace shipper.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐  access log (JSON lines)  ┌──────────────────────────────┐
//!   │ proxy child  │──────────▶ FIFO ─────────▶│ intake: frame → decode       │
//!   └──────────────┘                           └──────────────┬───────────────┘
//!          ▲                                                  │ queue
//!          │ spawn / SIGTERM                                  ▼
//!   ┌──────┴───────┐                           ┌──────────────────────────────┐
//!   │  supervisor  │                           │ worker: translate → POST     │──▶ collector
//!   └──────────────┘                           │         retry every second   │
//!                                              └──────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use edge_trace_shipper::config::{load_config, override_log_level, ConfigError, ShipperConfig};
use edge_trace_shipper::lifecycle::{exit, signals, supervisor, Shutdown, Supervisor};
use edge_trace_shipper::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "edge-trace-shipper")]
#[command(about = "Runs a reverse proxy and ships its access log to a tracing collector", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Command {
    /// Create the channel, start the proxy, and ship its log (default)
    #[default]
    Supervise,
    /// Ship records from an existing channel without starting the proxy
    Ship,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => load_config(path),
        None => Ok(ShipperConfig::default()),
    }
    .and_then(|mut config| {
        if let Some(level) = &cli.log_level {
            override_log_level(&mut config, level).map_err(|e| ConfigError::Validation(vec![e]))?;
        }
        Ok(config)
    });

    let observability = loaded
        .as_ref()
        .map(|config| config.observability.clone())
        .unwrap_or_default();
    logging::init(&observability);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::from(exit::CONFIG_ERROR);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "edge-trace-shipper starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_listener(shutdown.clone());

    let reason = match cli.command.unwrap_or_default() {
        Command::Supervise => Supervisor::new(config, shutdown).run().await,
        Command::Ship => supervisor::ship(config, shutdown).await,
    };

    let code = reason.code();
    tracing::info!(code, reason = ?reason, "Exiting");
    ExitCode::from(code)
}
