use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use seedscan_gateway::config::Args;
use seedscan_gateway::state::AppState;
use seedscan_gateway::{metrics, server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // parse cli arguments
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.tracing_level())
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    metrics::init();
    let limits = args.limits();
    let state = Arc::new(AppState::new(limits.clone()));

    let addr = args.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Seed search gateway listening on {}", listener.local_addr()?);
    info!("  GET  /structures, /biomes, /health, /metrics");
    info!("  POST /search");
    info!("  GET  /search/stream (upgrade)");
    info!(
        "Rate limit: {} requests per {} seconds ({} slots)",
        limits.rate_limit,
        limits.rate_window.as_secs(),
        limits.rate_table_size
    );
    info!(
        "Search limits: {} workers, {} results, {} structures, range {}",
        limits.max_workers, limits.max_results, limits.max_structures, limits.max_range
    );

    server::serve_with_shutdown(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received");
    })
    .await?;

    info!("server stopped");
    Ok(())
}
