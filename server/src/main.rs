//! fxgate Binary
//!
//! Serves cached FX rates over HTTP.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxgate_server::{app_router, build_state, CacheBackend, LogFormat, ServerConfig};

/// fxgate CLI
#[derive(Parser, Debug)]
#[command(name = "fxgate")]
#[command(about = "Cache-aside FX rate service")]
struct Args {
    /// Listen port (overrides SERVER_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Cache backend (overrides CACHE_BACKEND)
    #[arg(long, value_enum)]
    cache: Option<CacheBackend>,
}

fn init_tracing(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = ServerConfig::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(cache) = args.cache {
        config.cache_backend = cache;
    }

    init_tracing(&config);

    info!("Starting fxgate");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let state = build_state(&config).await?;
    let app = app_router(state, &config);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        listen_addr = %addr,
        base_path = %config.base_path,
        cache_backend = ?config.cache_backend,
        "fxgate running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("fxgate shutdown complete");
    Ok(())
}
