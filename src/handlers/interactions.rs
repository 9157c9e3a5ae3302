use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::decode_rows;
use crate::middleware::auth;
use crate::models::LoopInteraction;
use crate::state::AppState;
use crate::store::{Filter, SelectQuery};

#[derive(Debug, Deserialize)]
pub struct InteractionsQuery {
    /// Comma-separated loop ids.
    pub loop_ids: Option<String>,
}

/// GET /api/loops/interactions - the caller's interactions with the given
/// loops. An empty or malformed id list short-circuits to an empty result
/// without touching the backend.
pub async fn lookup_get(
    State(state): State<AppState>,
    Query(params): Query<InteractionsQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::authenticate(&state, &headers).await?;

    let loop_ids = parse_loop_ids(params.loop_ids.as_deref());
    if loop_ids.is_empty() {
        return Ok(Json(json!({ "success": true, "interactions": [] })));
    }

    let rows = state
        .store
        .select(
            SelectQuery::table("loop_interactions")
                .columns("loop_id,interaction_type")
                .filter(Filter::eq("user_id", identity.id.to_string()))
                .filter(Filter::in_list(
                    "loop_id",
                    loop_ids.into_iter().map(Value::String).collect(),
                )),
        )
        .await?;
    let interactions: Vec<LoopInteraction> = decode_rows(rows, "loop interaction")?;

    Ok(Json(json!({
        "success": true,
        "interactions": interactions
    })))
}

fn parse_loop_ids(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
