use checkin_journal::{router, AppState, Config, HttpChatBackend};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if config.chat.api_key.is_none() {
        warn!("DEEPSEEK_API_KEY is not set; check-ins will fail until it is provided");
    }
    info!(
        model = %config.chat.model,
        base_url = %config.chat.base_url,
        "chat backend configured"
    );

    let addr = config.addr();
    let idle_ttl = config.session_idle_ttl();
    let chat = HttpChatBackend::new(config.chat)?;
    let app = router(AppState::new(Arc::new(chat), idle_ttl));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
    }
    info!("shutting down");
}
