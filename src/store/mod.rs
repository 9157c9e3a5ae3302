pub mod query;
pub mod rest;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use query::{DeleteQuery, Filter, FilterOp, Order, SelectQuery, SortDirection, UpdateQuery, UpsertQuery};
pub use rest::RestStore;

/// Errors from the hosted data store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend rejected request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("unexpected backend payload: {0}")]
    UnexpectedPayload(String),
}

/// Delegation seam to the hosted relational backend.
///
/// Each handler issues exactly one logical operation per request through
/// this trait. Injected as `Arc<dyn DataStore>` so tests can substitute a
/// counting fake.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Filtered, ordered, paginated read. Returns raw rows.
    async fn select(&self, query: SelectQuery) -> Result<Vec<Value>, StoreError>;

    /// Update matching rows, returning the updated representations.
    async fn update(&self, query: UpdateQuery) -> Result<Vec<Value>, StoreError>;

    /// Idempotent insert-or-merge, returning the resulting rows.
    async fn upsert(&self, query: UpsertQuery) -> Result<Vec<Value>, StoreError>;

    /// Delete matching rows. Zero matches is a success.
    async fn delete(&self, query: DeleteQuery) -> Result<(), StoreError>;

    /// Invoke a stored procedure by name.
    async fn rpc(&self, name: &str, args: Value) -> Result<Value, StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn health(&self) -> Result<(), StoreError>;
}
