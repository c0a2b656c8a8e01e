use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tripcraft_api::{app, app_config::Config, AppState};
use tripcraft_gateway::WebhookGateway;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tripcraft_api=debug,tripcraft_session=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Tripcraft API on port {}", config.server.port);

    let gateway = WebhookGateway::new(&config.gateway).context("Failed to build trip gateway")?;
    tracing::info!("Trip requests go to {}", gateway.endpoint());

    let app = app(AppState::new(Arc::new(gateway)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
