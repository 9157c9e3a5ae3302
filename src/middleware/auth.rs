//! Front half of the request pipeline: credential extraction, identity
//! resolution, and the admin check for privileged routes.
//!
//! Steps run strictly in order and short-circuit on the first failure; a
//! request without a usable bearer token never reaches the backend.

use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::identity::Identity;
use crate::models;
use crate::state::AppState;
use crate::store::{Filter, SelectQuery};

/// Extract the bearer token from the Authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err(ApiError::unauthorized("Empty bearer token"));
        }
        Ok(token.to_string())
    } else {
        Err(ApiError::unauthorized(
            "Authorization header must use Bearer token format",
        ))
    }
}

/// Pipeline steps 1-2: extract the credential, then resolve it through the
/// identity provider. Provider failures of any kind come back as 401.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let token = extract_bearer(headers)?;
    let identity = state.identity.resolve(&token).await?;
    Ok(identity)
}

/// Pipeline step 3, privileged routes only: fetch the caller's profile and
/// check the admin flag. No profile row means no elevated access.
pub async fn require_admin(state: &AppState, identity: &Identity) -> Result<(), ApiError> {
    let rows = state
        .store
        .select(
            SelectQuery::table("profiles")
                .columns("id,is_admin,role")
                .filter(Filter::eq("id", identity.id.to_string()))
                .limit(1),
        )
        .await?;

    match rows.first() {
        Some(profile) if models::admin_access(profile) => Ok(()),
        _ => Err(ApiError::forbidden("Admin access required")),
    }
}
