use axum::{extract::State, http::HeaderMap, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::auth;
use crate::state::AppState;

/// POST /api/admin/bonus - distribute active quest bonuses to eligible users.
///
/// The distribution itself is a stored procedure on the backend; this
/// handler only gates it and reports the count it returns.
pub async fn distribute_post(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::authenticate(&state, &headers).await?;
    auth::require_admin(&state, &identity).await?;

    let result = state
        .store
        .rpc("distribute_quest_bonuses", json!({}))
        .await?;

    // The procedure returns either a bare count or `{"users_count": n}`.
    let users_count = result
        .get("users_count")
        .and_then(Value::as_i64)
        .or_else(|| result.as_i64())
        .unwrap_or(0);

    Ok(Json(json!({
        "success": true,
        "users_count": users_count,
        "message": format!("Bonus distributed to {} users", users_count)
    })))
}
