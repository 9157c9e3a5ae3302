use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::decode_row;
use crate::middleware::auth;
use crate::models::Quest;
use crate::state::AppState;
use crate::store::{Filter, UpdateQuery};

/// POST /api/admin/quests/:quest_id - set a quest's active flag.
///
/// Idempotent: repeating the same call leaves the flag unchanged and only
/// touches the update timestamp.
pub async fn toggle_post(
    State(state): State<AppState>,
    Path(quest_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::authenticate(&state, &headers).await?;
    auth::require_admin(&state, &identity).await?;

    let is_active = body
        .get("is_active")
        .and_then(Value::as_bool)
        .ok_or_else(|| ApiError::bad_request("is_active is required"))?;

    let rows = state
        .store
        .update(
            UpdateQuery::table("quests")
                .filter(Filter::eq("id", quest_id.clone()))
                .set("is_active", is_active)
                .set("updated_at", json!(Utc::now())),
        )
        .await?;

    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found(format!("quest {} not found", quest_id)))?;
    let quest: Quest = decode_row(row, "quest")?;

    Ok(Json(json!({
        "quest": quest,
        "message": if is_active { "Quest activated" } else { "Quest deactivated" }
    })))
}
