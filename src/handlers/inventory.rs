use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::{decode_rows, parse_page_param};
use crate::middleware::auth;
use crate::models::InventoryItem;
use crate::state::AppState;
use crate::store::{Filter, Order, SelectQuery};

pub const DEFAULT_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub category: Option<String>,
    /// Raw strings: bad input falls back to defaults instead of rejecting.
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// GET /api/inventory - the caller's purchased items, newest first.
pub async fn list_get(
    State(state): State<AppState>,
    Query(params): Query<InventoryQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::authenticate(&state, &headers).await?;

    let limit = parse_page_param(params.limit.as_deref(), DEFAULT_LIMIT);
    let offset = parse_page_param(params.offset.as_deref(), 0);

    let mut query = SelectQuery::table("user_inventory")
        .filter(Filter::eq("user_id", identity.id.to_string()))
        .order(Order::desc("purchased_at"))
        .limit(limit)
        .offset(offset);
    if let Some(category) = params.category.as_deref().filter(|c| !c.is_empty()) {
        query = query.filter(Filter::eq("category", category));
    }

    let rows = state.store.select(query).await?;
    let items: Vec<InventoryItem> = decode_rows(rows, "inventory")?;

    // Approximation: a full page reports true even when it was the last one,
    // so the client may issue one extra request that comes back empty.
    let has_more = items.len() as u32 == limit;

    Ok(Json(json!({
        "success": true,
        "items": items,
        "hasMore": has_more
    })))
}
