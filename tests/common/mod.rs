#![allow(dead_code)]

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use loop_api::identity::{Identity, IdentityError, IdentityProvider};
use loop_api::store::{
    DataStore, DeleteQuery, Filter, FilterOp, SelectQuery, StoreError, UpdateQuery, UpsertQuery,
};
use loop_api::AppState;

/// In-memory stand-in for the hosted backend. Counts every delegated call
/// so tests can assert that short-circuited requests never reach it.
pub struct FakeStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    calls: AtomicUsize,
    rpc_names: Mutex<Vec<String>>,
    rpc_result: Mutex<Value>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tables: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            rpc_names: Mutex::new(Vec::new()),
            rpc_result: Mutex::new(Value::Null),
        })
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), rows);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of delegated operations issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rpc_names(&self) -> Vec<String> {
        self.rpc_names.lock().unwrap().clone()
    }

    pub fn set_rpc_result(&self, result: Value) {
        *self.rpc_result.lock().unwrap() = result;
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn matches(row: &Value, filters: &[Filter]) -> bool {
        filters.iter().all(|filter| {
            let cell = row.get(&filter.column).unwrap_or(&Value::Null);
            match filter.op {
                FilterOp::Eq => cell == &filter.value,
                FilterOp::In => match &filter.value {
                    Value::Array(values) => values.contains(cell),
                    _ => false,
                },
            }
        })
    }

    fn compare(a: &Value, b: &Value) -> CmpOrdering {
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal),
            _ => a
                .as_str()
                .unwrap_or_default()
                .cmp(b.as_str().unwrap_or_default()),
        }
    }

    fn project(row: &Value, columns: &Option<String>) -> Value {
        let Some(columns) = columns else {
            return row.clone();
        };
        let Some(object) = row.as_object() else {
            return row.clone();
        };
        let mut projected = serde_json::Map::new();
        for column in columns.split(',').map(str::trim) {
            if let Some(value) = object.get(column) {
                projected.insert(column.to_string(), value.clone());
            }
        }
        Value::Object(projected)
    }
}

#[async_trait]
impl DataStore for FakeStore {
    async fn select(&self, query: SelectQuery) -> Result<Vec<Value>, StoreError> {
        self.count();
        let mut rows: Vec<Value> = self
            .rows(&query.table)
            .into_iter()
            .filter(|row| Self::matches(row, &query.filters))
            .collect();
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = Self::compare(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                match order.direction {
                    loop_api::store::SortDirection::Asc => ordering,
                    loop_api::store::SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        let offset = query.offset.unwrap_or(0) as usize;
        let rows: Vec<Value> = rows.into_iter().skip(offset).collect();
        let rows: Vec<Value> = match query.limit {
            Some(limit) => rows.into_iter().take(limit as usize).collect(),
            None => rows,
        };
        Ok(rows
            .iter()
            .map(|row| Self::project(row, &query.columns))
            .collect())
    }

    async fn update(&self, query: UpdateQuery) -> Result<Vec<Value>, StoreError> {
        self.count();
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(query.table.clone()).or_default();
        let mut updated = Vec::new();
        for row in rows.iter_mut() {
            if Self::matches(row, &query.filters) {
                if let Some(object) = row.as_object_mut() {
                    for (column, value) in &query.changes {
                        object.insert(column.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn upsert(&self, query: UpsertQuery) -> Result<Vec<Value>, StoreError> {
        self.count();
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(query.table.clone()).or_default();
        let conflict_columns: Vec<&str> = query
            .on_conflict
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        let incoming = Value::Object(query.row.clone());

        let existing = rows.iter_mut().find(|row| {
            !conflict_columns.is_empty()
                && conflict_columns
                    .iter()
                    .all(|column| row.get(*column) == incoming.get(*column))
        });
        match existing {
            Some(row) => {
                if let Some(object) = row.as_object_mut() {
                    for (column, value) in &query.row {
                        object.insert(column.clone(), value.clone());
                    }
                }
                Ok(vec![row.clone()])
            }
            None => {
                rows.push(incoming.clone());
                Ok(vec![incoming])
            }
        }
    }

    async fn delete(&self, query: DeleteQuery) -> Result<(), StoreError> {
        self.count();
        let mut tables = self.tables.lock().unwrap();
        if let Some(rows) = tables.get_mut(&query.table) {
            rows.retain(|row| !Self::matches(row, &query.filters));
        }
        Ok(())
    }

    async fn rpc(&self, name: &str, _args: Value) -> Result<Value, StoreError> {
        self.count();
        self.rpc_names.lock().unwrap().push(name.to_string());
        Ok(self.rpc_result.lock().unwrap().clone())
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Identity provider fake: a token table plus a resolution counter.
pub struct FakeIdentity {
    tokens: Mutex<HashMap<String, Identity>>,
    calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tokens: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn register(&self, token: &str, user_id: Uuid) {
        self.tokens.lock().unwrap().insert(
            token.to_string(),
            Identity {
                id: user_id,
                email: None,
            },
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("unknown token".to_string()))
    }
}

/// Router plus handles on its fakes.
pub struct TestApp {
    pub store: Arc<FakeStore>,
    pub identity: Arc<FakeIdentity>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = FakeStore::new();
        let identity = FakeIdentity::new();
        let router = loop_api::app(AppState::new(store.clone(), identity.clone()));
        Self {
            store,
            identity,
            router,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body read failed")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("non-JSON response body")
        };
        (status, body)
    }
}

/// Deterministic user id for fixtures.
pub fn user_id(n: u8) -> Uuid {
    Uuid::from_u128(u128::from(n))
}

/// Seed a profile row whose admin access is controlled by the caller.
pub fn seed_profile(store: &FakeStore, id: Uuid, admin: bool) {
    store.seed(
        "profiles",
        vec![json!({
            "id": id.to_string(),
            "bio": "hello",
            "is_admin": admin,
            "role": if admin { "admin" } else { "member" },
            "followers_count": 0,
            "created_at": "2026-01-01T00:00:00Z",
        })],
    );
}
