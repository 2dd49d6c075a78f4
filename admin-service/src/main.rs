use anyhow::Context;
use cinema_admin::{load_seed_file, shutdown::shutdown_signal, MemoryStore, Metrics, ServiceConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod handlers;
mod service;

use service::AdminService;

#[derive(Parser, Debug)]
#[command(name = "admin-service")]
#[command(about = "Admin dashboard REST API for a cinema chain")]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Config file path (TOML)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Seed data file (JSON)
    #[arg(long = "seed")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config =
        ServiceConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(port) = args.port {
        config.http.port = port;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!(
        "Starting {} on port {}",
        config.application_id, config.http.port
    );

    let store = Arc::new(MemoryStore::new());
    let seed_path = args
        .seed
        .or_else(|| config.seed_file.clone().map(PathBuf::from));
    if let Some(path) = seed_path {
        info!("Loading seed data from {:?}", path);
        let seed = load_seed_file(&path).context("reading seed file")?;
        let loaded = store.load_seed(seed).context("loading seed data")?;
        info!("Seeded {} records", loaded);
    }

    let metrics = Metrics::new().context("registering metrics")?;
    let service = AdminService::new(store, metrics);

    let started = Instant::now();
    let gauges = service.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(15));
        loop {
            tick.tick().await;
            gauges.metrics().update_uptime(started.elapsed());
            gauges.metrics().update_catalog_size(gauges.catalog_len());
        }
    });

    let app = handlers::router(service, config.http.permissive_cors);
    let addr = config.bind_addr()?;
    info!("Admin service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Admin service stopped");
    Ok(())
}
