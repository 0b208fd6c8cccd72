//! Shop request log service.
//!
//! ```text
//!   integration under test
//!        │  POST /shop/{id}          GET /shop/{id}/logs
//!        ▼                                  ▲
//!   ┌─────────┐   ┌──────────┐   ┌──────────────────┐
//!   │  http   │──▶│  store   │──▶│ {log_dir}/id.log │
//!   │ server  │◀──│ + codec  │◀──│  one JSON/line   │
//!   └─────────┘   └──────────┘   └──────────────────┘
//!        │              │
//!        ▼              ▼
//!   diagnostics      render (HTML)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use shop_request_log::config::{load_config, AppConfig};
use shop_request_log::lifecycle::{signals, startup, Shutdown};
use shop_request_log::observability::{logging, metrics};
use shop_request_log::HttpServer;

#[derive(Parser)]
#[command(name = "shop-request-log")]
#[command(about = "Records per-shop HTTP requests into append-only JSON logs", long_about = None)]
struct Args {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `storage.log_dir`.
    #[arg(short, long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    let config = startup::apply_overrides(
        config,
        startup::Overrides {
            bind_address: args.bind,
            log_dir: args.log_dir,
        },
    )?;

    logging::init(&config.observability);
    tracing::info!("shop-request-log v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        log_dir = %config.storage.log_dir.display(),
        read_policy = ?config.storage.read_policy,
        request_timeout_secs = config.limits.request_timeout_secs,
        "Configuration loaded"
    );

    startup::prepare_log_dir(&config)?;

    if config.observability.metrics_enabled {
        // Validation already checked the address.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
