mod routes;
mod singleton;
mod state;

use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use calgrid_core::{CalgridConfig, DirStore, EventStore, MemoryStore};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "calgrid-server")]
#[command(about = "REST backend for calgrid", version)]
struct Args {
    /// Port to listen on (defaults to the configured port)
    #[arg(long)]
    port: Option<u16>,

    /// Directory of .ics event files (defaults to the configured data_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep events in memory only
    #[arg(long, conflicts_with = "data_dir")]
    in_memory: bool,
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,tower_http=debug"))
        .map_err(|e| anyhow!("invalid RUST_LOG filter: {e}"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let lock = singleton::acquire_lock(&singleton::default_lock_dir()?)?;
    debug!(path = %lock.path().display(), "acquired server lock");

    let config = CalgridConfig::load().context("Failed to load config")?;

    let store: Arc<dyn EventStore> = if args.in_memory {
        info!("using in-memory event store");
        Arc::new(MemoryStore::new())
    } else {
        let dir = args.data_dir.unwrap_or_else(|| config.data_path());
        info!(dir = %dir.display(), "using event directory");
        Arc::new(
            DirStore::open(&dir)
                .with_context(|| format!("Failed to open event directory {}", dir.display()))?,
        )
    };

    let app = routes::app(AppState::new(store));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port.unwrap_or(config.port)));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "calgrid-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("calgrid-server stopped");
    drop(lock);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
