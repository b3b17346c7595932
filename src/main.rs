//! Config store server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌───────────────────────────────────────────────┐
//!     ────────────────────┼─▶ http::server (request id, trace, limits)    │
//!                         │        │                                      │
//!                         │        ▼                                      │
//!                         │   http::handlers ──▶ store::ConfigStore       │
//!                         │        │              (store-wide mutex)      │
//!                         │        │                   │ search only      │
//!                         │        │                   ▼                  │
//!                         │        │            store::matcher            │
//!     Client Response     │        ▼                                      │
//!     ◀───────────────────┼── http::response (error kind → status)        │
//!                         └───────────────────────────────────────────────┘
//! ```
//!
//! The listen port comes from `SERVE_PORT` (or `--port`); startup fails
//! with a non-zero exit code when none is configured.

use std::path::PathBuf;

use clap::Parser;

use config_store::config::load_config;
use config_store::lifecycle::startup;
use config_store::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "config-store")]
#[command(about = "In-memory configuration store served over HTTP", long_about = None)]
struct Args {
    /// Port to listen on.
    #[arg(short, long, env = "SERVE_PORT")]
    port: Option<u16>,

    /// Optional TOML configuration file.
    #[arg(short, long, env = "CONFIG_STORE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref(), args.port)?;

    init_logging(&config.observability);
    tracing::info!("config-store v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
