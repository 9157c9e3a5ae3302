use axum::{extract::State, http::HeaderMap, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::auth;
use crate::state::AppState;
use crate::store::{DeleteQuery, Filter, UpsertQuery};

#[derive(Debug, Deserialize)]
pub struct ReactionBody {
    pub message_id: Option<String>,
    pub emoji: Option<String>,
    /// "add" (default) or "remove".
    pub action: Option<String>,
}

/// POST /api/messages/reactions - add or remove a message reaction.
///
/// Both directions are idempotent set-membership operations keyed on
/// (message_id, user_id, emoji). On success a reaction event is published
/// over the realtime connection when one is available; the store write is
/// the source of truth and publish failures are logged, not surfaced.
pub async fn react_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ReactionBody>,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::authenticate(&state, &headers).await?;

    let message_id = body
        .message_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("message_id is required"))?;
    let emoji = body
        .emoji
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("emoji is required"))?;
    let action = body.action.as_deref().unwrap_or("add");

    let message = match action {
        "add" => {
            state
                .store
                .upsert(
                    UpsertQuery::table("message_reactions")
                        .on_conflict("message_id,user_id,emoji")
                        .set("message_id", message_id)
                        .set("user_id", identity.id.to_string())
                        .set("emoji", emoji),
                )
                .await?;
            "Reaction added"
        }
        "remove" => {
            state
                .store
                .delete(
                    DeleteQuery::table("message_reactions")
                        .filter(Filter::eq("message_id", message_id))
                        .filter(Filter::eq("user_id", identity.id.to_string()))
                        .filter(Filter::eq("emoji", emoji)),
                )
                .await?;
            "Reaction removed"
        }
        other => {
            return Err(ApiError::bad_request(format!(
                "action must be \"add\" or \"remove\", got \"{}\"",
                other
            )))
        }
    };

    if let Some(realtime) = &state.realtime {
        let event = json!({
            "type": "reaction_update",
            "message_id": message_id,
            "user_id": identity.id,
            "emoji": emoji,
            "action": action,
        });
        if let Err(e) = realtime.send(&event) {
            tracing::debug!("skipping realtime publish: {}", e);
        }
    }

    Ok(Json(json!({ "success": true, "message": message })))
}
