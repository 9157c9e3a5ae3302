// Route handlers, one module per resource. Every handler runs the same
// pipeline: credential extraction, identity resolution, authorization where
// required, parameter validation, one delegated store operation, envelope.
pub mod admin;
pub mod interactions;
pub mod inventory;
pub mod profile;
pub mod reactions;
pub mod users;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Parse a caller-supplied pagination parameter. Absent, non-integer, and
/// negative input all fall back to the endpoint default.
pub(crate) fn parse_page_param(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| (0..=i64::from(u32::MAX)).contains(n))
        .map(|n| n as u32)
        .unwrap_or(default)
}

/// Decode one backend row into its typed mirror. A row the backend returns
/// but we cannot read is a server fault, not a client error.
pub(crate) fn decode_row<T: DeserializeOwned>(row: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(row).map_err(|e| {
        tracing::error!("{} row decode failed: {}", what, e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })
}

pub(crate) fn decode_rows<T: DeserializeOwned>(
    rows: Vec<Value>,
    what: &str,
) -> Result<Vec<T>, ApiError> {
    rows.into_iter().map(|row| decode_row(row, what)).collect()
}
