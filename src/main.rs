use std::sync::Arc;

use anyhow::Context;

use loop_api::identity::AuthServer;
use loop_api::realtime::RealtimeContext;
use loop_api::store::RestStore;
use loop_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up backend and realtime settings.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = loop_api::config::config();
    tracing::info!("Starting Loop API in {:?} mode", config.environment);

    // Environment check logs and continues; a partially configured process
    // still serves whatever it can reach.
    let missing = config.validate();
    if missing.is_empty() {
        tracing::info!("environment configuration complete");
    } else {
        tracing::warn!("missing environment configuration: {}", missing.join(", "));
    }

    let store = Arc::new(
        RestStore::new(&config.backend.url, config.backend.service_key.clone())
            .context("backend store setup")?,
    );
    let identity = Arc::new(
        AuthServer::new(&config.backend.url, config.backend.anon_key.clone())
            .context("identity provider setup")?,
    );
    let mut state = AppState::new(store, identity);

    match RealtimeContext::connect(config.realtime.url.clone()).await {
        Ok(ctx) => {
            tracing::info!("realtime connection established to {}", ctx.url());
            state = state.with_realtime(Arc::new(ctx));
        }
        Err(e) => tracing::warn!("realtime connection unavailable: {}", e),
    }

    let app = loop_api::app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("LOOP_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Loop API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
