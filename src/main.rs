//! Home pager backend entry point.
//!
//! Startup order: logging, configuration, upstream client (trust bootstrap),
//! router, listener bind, then the lifecycle loop until shutdown.

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use home_pager::http::{router, AppState};
use home_pager::{kube, lifecycle, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "home_pager=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        listen_port = %config.listen_port,
        upstream_timeout = ?config.upstream_timeout,
        "configuration resolved"
    );

    let client = kube::build_client(config.upstream_timeout)?;
    let state = AppState::new(&config, client);
    let app = router(state);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    lifecycle::run(listener, app).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
