//! Organization routing service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ http server ─▶ dispatcher ─▶ route table  │
//!                         │   (axum +        (mount prefix,  (first      │
//!                         │    tower-http)    append slash)   match)     │
//!                         │                        │                     │
//!                         │                        ▼                     │
//!     Client Response     │                  ResourceHandler             │
//!     ◀───────────────────┼── JSON response ◀─ (organization views)      │
//!                         │                                              │
//!                         │  config · observability · lifecycle          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use org_routes::config::{load_config, ServerConfig};
use org_routes::http::HttpServer;
use org_routes::lifecycle::{shutdown_on_signal, Shutdown};
use org_routes::observability::{logging, metrics};
use org_routes::organization::{url_patterns, OrganizationDirectory};

#[derive(Parser)]
#[command(name = "org-routes")]
#[command(about = "Serve the organization route table over HTTP", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("org-routes v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_prefix = %config.routing.mount_prefix,
        append_slash = config.routing.append_slash,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    // Fail fast on a bad route declaration, before any request is served
    let directory = Arc::new(OrganizationDirectory::new());
    let table = Arc::new(url_patterns(directory)?);
    for route in table.routes() {
        tracing::debug!(
            name = route.name(),
            pattern = %route.pattern(),
            handler = route.handler().name(),
            "Route registered"
        );
    }
    tracing::info!(routes = table.len(), "Route table built");

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config, table);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
