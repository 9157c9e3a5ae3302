//! Typed mirrors of rows owned by the hosted backend.
//!
//! These structs never control entity lifetime; they exist so handlers can
//! echo rows back to clients with a checked shape. Unknown columns are kept
//! via `#[serde(flatten)]` where a full row is returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub profile_theme: Option<Value>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub user_id: Uuid,
    pub shop_item_id: String,
    #[serde(default)]
    pub purchased_at: Option<DateTime<Utc>>,
    /// Denormalized shop-item payload carried on the row.
    #[serde(default)]
    pub shop_item: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopInteraction {
    pub loop_id: String,
    pub interaction_type: String,
}

/// Admin determination on a profile row: a boolean `is_admin` flag or a
/// string `role` of "admin". Either form grants access.
pub fn admin_access(profile: &Value) -> bool {
    if profile.get("is_admin").and_then(Value::as_bool) == Some(true) {
        return true;
    }
    matches!(
        profile.get("role").and_then(Value::as_str),
        Some(role) if role.eq_ignore_ascii_case("admin")
    )
}
