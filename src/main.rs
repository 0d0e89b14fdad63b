use anyhow::Result;
use dossier::{
    app_state::AppState, config::Config, db, repositories::ReportRepository, telemetry, web,
};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    let config = Config::from_env()?;
    let pool = db::connect(config.database_url()).await?;
    let repo = ReportRepository::new(pool);
    let state = AppState::from_config(&config, repo)?;

    let app = web::router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Received shutdown signal, shutting down");
}
