//! Development server (v1)
//!
//! Serves the single-page application, compiles stylesheets on request and
//! proxies the client-specific JSON APIs.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser ──▶ CORS ──▶ client override ──▶ path rewrite ──▶ route table
//!                                                                   │
//!        ┌──────────────┬──────────────┬──────────────┬─────────────┤
//!        ▼              ▼              ▼              ▼             ▼
//!   stylesheet     favicon /      vam / recs     static files   SPA index
//!   compiler       config.json    upstream       (+ config
//!                  redirects      proxy          cache header)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use dev_server::config::{load_config, ServerConfig};
use dev_server::observability::{logging, metrics};
use dev_server::{HttpServer, Shutdown};

const DEFAULT_CONFIG: &str = "devserver.toml";

#[derive(Parser)]
#[command(name = "dev-server")]
#[command(about = "Development server for the single-page application", long_about = None)]
struct Cli {
    /// Config file (TOML). Defaults are used when the default file is absent.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Named `[server.<target>]` table to use instead of `[server]`.
    #[arg(short, long)]
    target: Option<String>,

    /// Listening port; overrides config and `PORT`.
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind host; overrides config, `HOST` and `HOSTNAME`.
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path, cli.target.as_deref())?,
        None if PathBuf::from(DEFAULT_CONFIG).is_file() => {
            load_config(DEFAULT_CONFIG.as_ref(), cli.target.as_deref())?
        }
        None => {
            let mut config = ServerConfig::default();
            config.merge_defaults();
            config
        }
    };

    if cli.port.is_some() {
        config.port = cli.port;
    }
    if cli.host.is_some() {
        config.host = cli.host;
    }
    config.apply_env(|key| std::env::var(key).ok());

    logging::init(&config.observability.log_level);
    tracing::info!("dev-server v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        root = %config.root,
        folders = config.folders.len(),
        files = config.files.len(),
        index = %config.index.display(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Listening on http://{}:{}", config.host(), config.port());

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
