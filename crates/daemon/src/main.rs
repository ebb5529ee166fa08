use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use varun_daemon::{api::AppState, config::DaemonConfig, http, store::InMemoryAssessmentStore};

#[derive(Parser, Debug)]
#[command(name = "varun-daemon", version, about = "Rainwater harvesting assessment API")]
struct Args {
    /// Listen address, e.g. 127.0.0.1:5000
    #[arg(long, default_value = "127.0.0.1:5000")]
    listen: SocketAddr,

    /// Max request body bytes.
    #[arg(long, default_value_t = 64 * 1024)]
    max_body_bytes: usize,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&args.log))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = DaemonConfig {
        listen: args.listen,
        max_body_bytes: args.max_body_bytes,
    };
    info!(?config, "daemon starting");

    let state = AppState::new(Arc::new(InMemoryAssessmentStore::new()), config.clone());
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!(listen = %config.listen, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
