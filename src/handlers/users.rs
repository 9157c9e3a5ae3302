use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::parse_page_param;
use crate::state::AppState;
use crate::store::{Order, SelectQuery};

pub const DEFAULT_LIMIT: u32 = 5;

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub sort: Option<String>,
    pub limit: Option<String>,
}

/// GET /api/users - public profile listing, no authentication.
///
/// Sort is a whitelist: "followers" orders by follower count, anything else
/// falls back to newest profiles first.
pub async fn list_get(
    State(state): State<AppState>,
    Query(params): Query<UsersQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = parse_page_param(params.limit.as_deref(), DEFAULT_LIMIT);
    let order = match params.sort.as_deref() {
        Some("followers") => Order::desc("followers_count"),
        _ => Order::desc("created_at"),
    };

    let users = state
        .store
        .select(
            SelectQuery::table("profiles")
                .columns("id,bio,avatar_url,is_verified,is_premium,followers_count,created_at")
                .order(order)
                .limit(limit),
        )
        .await?;

    Ok(Json(json!({ "success": true, "users": users })))
}
