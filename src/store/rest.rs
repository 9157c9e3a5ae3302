//! REST client for the hosted relational backend.
//!
//! Speaks the backend's PostgREST-style interface: filters and pagination
//! become query-string pairs, writes ask for `return=representation`, and
//! stored procedures live under `/rest/v1/rpc/:name`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

use super::{DataStore, DeleteQuery, SelectQuery, StoreError, UpdateQuery, UpsertQuery};

pub struct RestStore {
    client: reqwest::Client,
    base: Url,
    service_key: String,
}

impl RestStore {
    /// Build a store rooted at the backend URL, authenticated with the
    /// privileged service key.
    pub fn new(backend_url: &str, service_key: impl Into<String>) -> Result<Self, StoreError> {
        let base = Url::parse(backend_url)
            .map_err(|e| StoreError::UnexpectedPayload(format!("invalid backend URL: {}", e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
            service_key: service_key.into(),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        self.base
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| StoreError::UnexpectedPayload(format!("invalid table path: {}", e)))
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.service_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.service_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }

    async fn rows(response: reqwest::Response) -> Result<Vec<Value>, StoreError> {
        let body: Value = Self::check(response).await?.json().await?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(StoreError::UnexpectedPayload(format!(
                "expected row array, got: {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn select(&self, query: SelectQuery) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .get(self.table_url(&query.table)?)
            .headers(self.headers())
            .query(&query.to_query_pairs())
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn update(&self, query: UpdateQuery) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .patch(self.table_url(&query.table)?)
            .headers(self.headers())
            .header("Prefer", "return=representation")
            .query(&query.to_query_pairs())
            .json(&Value::Object(query.changes.clone()))
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn upsert(&self, query: UpsertQuery) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .post(self.table_url(&query.table)?)
            .headers(self.headers())
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .query(&query.to_query_pairs())
            .json(&Value::Object(query.row.clone()))
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn delete(&self, query: DeleteQuery) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.table_url(&query.table)?)
            .headers(self.headers())
            .query(&query.to_query_pairs())
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn rpc(&self, name: &str, args: Value) -> Result<Value, StoreError> {
        let url = self
            .base
            .join(&format!("rest/v1/rpc/{}", name))
            .map_err(|e| StoreError::UnexpectedPayload(format!("invalid rpc path: {}", e)))?;
        let response = self
            .client
            .post(url)
            .headers(self.headers())
            .json(&args)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn health(&self) -> Result<(), StoreError> {
        let url = self
            .base
            .join("rest/v1/")
            .map_err(|e| StoreError::UnexpectedPayload(format!("invalid health path: {}", e)))?;
        let response = self.client.get(url).headers(self.headers()).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
