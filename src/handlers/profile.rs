use axum::{extract::State, http::HeaderMap, response::Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::decode_row;
use crate::middleware::auth;
use crate::models::Profile;
use crate::state::AppState;
use crate::store::{Filter, UpdateQuery};

/// Every field is optional; only supplied fields are written.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateBody {
    pub bio: Option<String>,
    pub interests: Option<Vec<String>>,
    pub avatar_url: Option<String>,
    pub profile_theme: Option<Value>,
    pub onboarding_completed: Option<bool>,
}

/// POST /api/profile - update the caller's own profile row.
pub async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ProfileUpdateBody>,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::authenticate(&state, &headers).await?;

    let mut query =
        UpdateQuery::table("profiles").filter(Filter::eq("id", identity.id.to_string()));
    if let Some(bio) = body.bio {
        query = query.set("bio", bio);
    }
    if let Some(interests) = body.interests {
        query = query.set("interests", json!(interests));
    }
    if let Some(avatar_url) = body.avatar_url {
        query = query.set("avatar_url", avatar_url);
    }
    if let Some(profile_theme) = body.profile_theme {
        query = query.set("profile_theme", profile_theme);
    }
    if let Some(onboarding_completed) = body.onboarding_completed {
        query = query.set("onboarding_completed", onboarding_completed);
    }
    query = query.set("updated_at", json!(Utc::now()));

    let rows = state.store.update(query).await?;
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    let profile: Profile = decode_row(row, "profile")?;

    Ok(Json(json!({
        "message": "Profile updated",
        "profile": profile
    })))
}
