pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod state;
pub mod store;

pub use state::AppState;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::realtime::ConnectionState;

/// Build the application router around an explicit dependency set. Tests
/// call this directly with fake stores and identity providers.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(admin_routes())
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/api/admin/bonus", post(admin::bonus::distribute_post))
        .route("/api/admin/quests/:quest_id", post(admin::quest::toggle_post))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/inventory", get(handlers::inventory::list_get))
        .route("/api/loops/interactions", get(handlers::interactions::lookup_get))
        .route("/api/messages/reactions", post(handlers::reactions::react_post))
        .route("/api/users", get(handlers::users::list_get))
        .route("/api/profile", post(handlers::profile::update_post))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Loop API",
            "version": version,
            "description": "Backend API for the Loop social network",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "users": "GET /api/users (public)",
                "profile": "POST /api/profile (bearer)",
                "inventory": "GET /api/inventory (bearer)",
                "interactions": "GET /api/loops/interactions (bearer)",
                "reactions": "POST /api/messages/reactions (bearer)",
                "admin": "POST /api/admin/bonus, POST /api/admin/quests/:quest_id (bearer + admin)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let realtime = match &state.realtime {
        Some(ctx) => match ctx.state() {
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        },
        None => "off",
    };

    match state.store.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "backend": "ok",
                    "realtime": realtime
                }
            })),
        ),
        Err(e) => {
            tracing::error!("backend health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "backend unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "realtime": realtime
                    }
                })),
            )
        }
    }
}
